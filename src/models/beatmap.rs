//! Purpose: Beatmap and beatmapset models.
//! Exports: `BEATMAP_COMPACT`, `BEATMAP`, `BEATMAPSET_COMPACT`, `BEATMAPSET` and value objects.
//! Role: Declarations only.
//! Invariants: `beatmapset_id` falls back to the enclosing beatmapset's `id` when a
//!             beatmap is nested inside one and the provider omits it.
use super::{DATETIME, OPT_ANY, OPT_BOOL, OPT_DATETIME, OPT_FLOAT, OPT_INT, OPT_STR};
use crate::core::plan::{ModelDecl, field};
use crate::core::relation::{EntityKind, RelationDecl};
use crate::core::types::Ty;

pub static BEATMAP_COMPACT: ModelDecl = ModelDecl::new("BeatmapCompact")
    .fields(&[
        field("difficulty_rating", Ty::Float),
        field("id", Ty::Int),
        field("mode", Ty::Named("GameMode")),
        field("status", Ty::Named("RankStatus")),
        field("total_length", Ty::Int),
        field("version", Ty::Str),
        field("user_id", Ty::Int),
        field("beatmapset_id", Ty::Int).inherit_from("BeatmapsetCompact", "id"),
        field("_beatmapset", Ty::Optional(&Ty::Named("BeatmapsetCompact"))).wire("beatmapset"),
        field("checksum", OPT_STR),
        field("failtimes", Ty::Optional(&Ty::Named("Failtimes"))),
        field("max_combo", OPT_INT),
    ])
    .relations(&[
        RelationDecl::foreign("expand", EntityKind::Beatmap, "id"),
        RelationDecl::foreign("user", EntityKind::User, "user_id"),
        RelationDecl::foreign("beatmapset", EntityKind::Beatmapset, "beatmapset_id")
            .embedded("_beatmapset"),
    ]);

pub static BEATMAP: ModelDecl = ModelDecl::new("Beatmap")
    .extends("BeatmapCompact")
    .fields(&[
        field("accuracy", Ty::Float),
        field("ar", Ty::Float),
        field("bpm", OPT_FLOAT),
        field("convert", Ty::Bool),
        field("count_circles", Ty::Int),
        field("count_sliders", Ty::Int),
        field("count_spinners", Ty::Int),
        field("cs", Ty::Float),
        field("deleted_at", OPT_DATETIME),
        field("drain", Ty::Float),
        field("hit_length", Ty::Int),
        field("is_scoreable", Ty::Bool),
        field("last_updated", DATETIME),
        field("mode_int", Ty::Int),
        field("passcount", Ty::Int),
        field("playcount", Ty::Int),
        field("ranked", Ty::Named("RankStatus")),
        field("url", Ty::Str),
        field("current_user_playcount", OPT_INT),
        field("owner", Ty::Optional(&Ty::Named("UserCompact"))).wire("user"),
        field("owners", Ty::Optional(&Ty::List(&Ty::Named("BeatmapOwner")))),
        field("_beatmapset", Ty::Optional(&Ty::Named("Beatmapset"))).wire("beatmapset"),
    ])
    .relations(&[RelationDecl::identity("expand")]);

pub static BEATMAPSET_COMPACT: ModelDecl = ModelDecl::new("BeatmapsetCompact")
    .fields(&[
        field("artist", Ty::Str),
        field("artist_unicode", Ty::Str),
        field("covers", Ty::Named("Covers")),
        field("creator", Ty::Str),
        field("favourite_count", Ty::Int),
        field("id", Ty::Int),
        field("nsfw", Ty::Bool),
        field("offset", Ty::Int),
        field("play_count", Ty::Int),
        field("preview_url", Ty::Str),
        field("source", Ty::Str),
        field("status", Ty::Named("RankStatus")),
        field("spotlight", Ty::Bool),
        field("title", Ty::Str),
        field("title_unicode", Ty::Str),
        field("user_id", Ty::Int),
        field("video", Ty::Bool),
        field("current_user_playcount", OPT_INT),
        field("hype", Ty::Optional(&Ty::Named("Hype"))),
        field("beatmaps", Ty::Optional(&Ty::List(&Ty::Named("Beatmap")))),
        field("converts", OPT_ANY),
        field("current_nominations", OPT_ANY),
        field("description", OPT_ANY),
        field("genre", OPT_ANY),
        field("has_favourited", OPT_BOOL),
        field("language", OPT_ANY),
        field("pack_tags", Ty::Optional(&Ty::List(&Ty::Str))),
        field("ratings", Ty::Optional(&Ty::List(&Ty::Int))),
        field("track_id", OPT_INT),
        field("_user", Ty::Optional(&Ty::Named("UserCompact"))).wire("user"),
    ])
    .relations(&[
        RelationDecl::foreign("expand", EntityKind::Beatmapset, "id"),
        RelationDecl::foreign("user", EntityKind::User, "user_id").embedded("_user"),
    ]);

pub static BEATMAPSET: ModelDecl = ModelDecl::new("Beatmapset")
    .extends("BeatmapsetCompact")
    .fields(&[
        field("availability", Ty::Named("Availability")),
        field("bpm", Ty::Float),
        field("can_be_hyped", Ty::Bool),
        field("deleted_at", OPT_DATETIME),
        field("discussion_enabled", Ty::Bool),
        field("discussion_locked", Ty::Bool),
        field("is_scoreable", Ty::Bool),
        field("last_updated", DATETIME),
        field("legacy_thread_url", OPT_STR),
        field("nominations_summary", Ty::Named("Nominations")),
        field("ranked", Ty::Named("RankStatus")),
        field("ranked_date", OPT_DATETIME),
        field("storyboard", Ty::Bool),
        field("submitted_date", OPT_DATETIME),
        field("tags", Ty::Str),
    ])
    .relations(&[RelationDecl::identity("expand")]);

pub static BEATMAP_OWNER: ModelDecl = ModelDecl::new("BeatmapOwner")
    .fields(&[field("id", Ty::Int), field("username", Ty::Str)]);

pub static COVERS: ModelDecl = ModelDecl::new("Covers").fields(&[
    field("cover", Ty::Str),
    field("cover_2x", Ty::Str).wire("cover@2x"),
    field("card", Ty::Str),
    field("card_2x", Ty::Str).wire("card@2x"),
    field("list", Ty::Str),
    field("list_2x", Ty::Str).wire("list@2x"),
    field("slimcover", Ty::Str),
    field("slimcover_2x", Ty::Str).wire("slimcover@2x"),
]);

pub static FAILTIMES: ModelDecl = ModelDecl::new("Failtimes").fields(&[
    field("exit", Ty::Optional(&Ty::List(&Ty::Int))),
    field("fail", Ty::Optional(&Ty::List(&Ty::Int))),
]);

pub static HYPE: ModelDecl = ModelDecl::new("Hype")
    .fields(&[field("current", Ty::Int), field("required", Ty::Int)]);

pub static AVAILABILITY: ModelDecl = ModelDecl::new("Availability").fields(&[
    field("download_disabled", Ty::Bool),
    field("more_information", OPT_STR),
]);

pub static NOMINATIONS: ModelDecl = ModelDecl::new("Nominations").fields(&[
    field("current", Ty::Int),
    field("required_meta", OPT_ANY),
    field("eligible_main_rulesets", Ty::Optional(&Ty::List(&Ty::Named("GameMode")))),
]);

pub static BEATMAP_PLAYCOUNT: ModelDecl = ModelDecl::new("BeatmapPlaycount")
    .fields(&[
        field("beatmap_id", Ty::Int),
        field("_beatmap", Ty::Optional(&Ty::Named("BeatmapCompact"))).wire("beatmap"),
        field("beatmapset", Ty::Optional(&Ty::Named("BeatmapsetCompact"))),
        field("count", Ty::Int),
    ])
    .relations(&[
        RelationDecl::foreign("beatmap", EntityKind::Beatmap, "beatmap_id").embedded("_beatmap")
    ]);

pub static BEATMAPS: ModelDecl =
    ModelDecl::new("Beatmaps").fields(&[field("beatmaps", Ty::List(&Ty::Named("Beatmap")))]);

pub static BEATMAPSET_SEARCH_RESULT: ModelDecl =
    ModelDecl::new("BeatmapsetSearchResult").fields(&[
        field("beatmapsets", Ty::List(&Ty::Named("Beatmapset"))),
        field("cursor", Ty::Optional(&Ty::Named("Cursor"))),
        field("recommended_difficulty", OPT_FLOAT),
        field("error", OPT_STR),
        field("total", Ty::Int),
        field("search", Ty::Any),
        field("cursor_string", OPT_STR),
    ]);
