//! Purpose: Multiplayer room models.
//! Exports: `ROOM`, `LEGACY_ROOM`, `ROOM_PLAYLIST_ITEM` and value objects.
//! Role: `Room` selects the pre-20220217 layout for older API versions.
//! Invariants: A playlist item nested in a room reads `room_id` from the room when omitted.
use super::{DATETIME, OPT_DATETIME, OPT_FLOAT, OPT_INT};
use crate::core::context::ApiContext;
use crate::core::error::Error;
use crate::core::plan::{ModelDecl, field};
use crate::core::relation::{EntityKind, RelationDecl};
use crate::core::select::Selection;
use crate::core::types::Ty;
use serde_json::{Map, Value};

/// First API version that serves playlist item stats and difficulty ranges.
pub const MODERN_ROOM_VERSION: u32 = 20220217;

fn select_room(_payload: &Map<String, Value>, api: &ApiContext) -> Result<Selection, Error> {
    if api.api_version < MODERN_ROOM_VERSION {
        Ok(Selection::Subclass("LegacyRoom"))
    } else {
        Ok(Selection::Keep)
    }
}

pub static LEGACY_ROOM: ModelDecl = ModelDecl::new("LegacyRoom").fields(&[
    field("id", Ty::Int),
    field("name", Ty::Str),
    field("category", Ty::Named("RoomCategory")),
    field("type", Ty::Named("RoomType")),
    field("user_id", Ty::Int),
    field("starts_at", DATETIME),
    field("ends_at", OPT_DATETIME),
    field("max_attempts", OPT_INT),
    field("participant_count", Ty::Int),
    field("channel_id", Ty::Int),
    field("active", Ty::Bool),
    field("has_password", Ty::Bool),
    field("queue_mode", Ty::Str),
    field("auto_skip", Ty::Bool),
    field("host", Ty::Named("UserCompact")),
    field("playlist", Ty::List(&Ty::Named("RoomPlaylistItem"))),
    field("recent_participants", Ty::List(&Ty::Named("UserCompact"))),
]);

pub static ROOM: ModelDecl = ModelDecl::new("Room")
    .extends("LegacyRoom")
    .fields(&[
        field("playlist_item_stats", Ty::Named("RoomPlaylistItemStats")),
        field("current_playlist_item", Ty::Optional(&Ty::Named("RoomPlaylistItem"))),
        field("difficulty_range", Ty::Named("RoomDifficultyRange")),
    ])
    .select(select_room);

pub static ROOM_PLAYLIST_ITEM_MOD: ModelDecl = ModelDecl::new("RoomPlaylistItemMod").fields(&[
    field("acronym", Ty::Str),
    field("settings", Ty::Map(&Ty::Any)),
]);

pub static ROOM_PLAYLIST_ITEM: ModelDecl = ModelDecl::new("RoomPlaylistItem")
    .fields(&[
        field("id", Ty::Int),
        field("room_id", Ty::Int).inherit_from("Room", "id"),
        field("beatmap_id", Ty::Int),
        field("ruleset_id", Ty::Int),
        field("allowed_mods", Ty::List(&Ty::Named("RoomPlaylistItemMod"))),
        field("required_mods", Ty::List(&Ty::Named("RoomPlaylistItemMod"))),
        field("expired", Ty::Bool),
        field("owner_id", Ty::Int),
        field("playlist_order", OPT_INT),
        field("played_at", OPT_DATETIME),
        field("beatmap", Ty::Named("BeatmapCompact")),
    ])
    .relations(&[
        RelationDecl::foreign("owner", EntityKind::User, "owner_id"),
        RelationDecl::foreign("beatmap", EntityKind::Beatmap, "beatmap_id").embedded("beatmap"),
    ]);

pub static ROOM_PLAYLIST_ITEM_STATS: ModelDecl =
    ModelDecl::new("RoomPlaylistItemStats").fields(&[
        field("count_active", Ty::Int),
        field("count_total", Ty::Int),
        field("ruleset_ids", Ty::List(&Ty::Int)),
    ]);

pub static ROOM_DIFFICULTY_RANGE: ModelDecl = ModelDecl::new("RoomDifficultyRange")
    .fields(&[field("min", OPT_FLOAT), field("max", OPT_FLOAT)]);
