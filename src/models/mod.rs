//! Purpose: The osu! API v2 model catalogue and the process-wide registry over it.
//! Exports: `CATALOG`, `registry`, and the per-area declaration modules.
//! Role: Static data consumed by `core`; nothing here binds or fetches.
//! Invariants: Every name referenced by a field resolves; `registry().check_all()` proves it.
use crate::core::plan::{Catalog, Registry};
use crate::core::types::Ty;
use std::sync::OnceLock;

pub mod beatmap;
pub mod community;
pub mod enums;
pub mod event;
pub mod multiplayer;
pub mod ranking;
pub mod score;
pub mod user;

pub(crate) const DATETIME: Ty = Ty::Named("Datetime");
pub(crate) const OPT_DATETIME: Ty = Ty::Optional(&DATETIME);
pub(crate) const OPT_INT: Ty = Ty::Optional(&Ty::Int);
pub(crate) const OPT_FLOAT: Ty = Ty::Optional(&Ty::Float);
pub(crate) const OPT_STR: Ty = Ty::Optional(&Ty::Str);
pub(crate) const OPT_BOOL: Ty = Ty::Optional(&Ty::Bool);
pub(crate) const OPT_ANY: Ty = Ty::Optional(&Ty::Any);

pub static CATALOG: Catalog = Catalog {
    models: &[
        &user::USER_COMPACT,
        &user::USER,
        &user::USER_RELATION,
        &user::USER_STATISTICS,
        &user::USER_STATISTICS_RULESETS,
        &user::USER_GRADE_COUNTS,
        &user::USER_LEVEL,
        &user::USER_BADGE,
        &user::RANK_HISTORY,
        &user::RANK_HIGHEST,
        &user::KUDOSU,
        &user::COUNTRY,
        &user::COVER,
        &user::USERS,
        &beatmap::BEATMAP_COMPACT,
        &beatmap::BEATMAP,
        &beatmap::BEATMAPSET_COMPACT,
        &beatmap::BEATMAPSET,
        &beatmap::BEATMAP_OWNER,
        &beatmap::COVERS,
        &beatmap::FAILTIMES,
        &beatmap::HYPE,
        &beatmap::AVAILABILITY,
        &beatmap::NOMINATIONS,
        &beatmap::BEATMAP_PLAYCOUNT,
        &beatmap::BEATMAPS,
        &beatmap::BEATMAPSET_SEARCH_RESULT,
        &score::SCORE,
        &score::LEGACY_SCORE,
        &score::SCORE_MATCH_INFO,
        &score::STATISTICS,
        &score::WEIGHT,
        &score::NON_LEGACY_MOD,
        &score::BEATMAP_USER_SCORE,
        &score::BEATMAP_SCORES,
        &score::SCORES,
        &event::EVENT,
        &event::ACHIEVEMENT_EVENT,
        &event::BEATMAP_PLAYCOUNT_EVENT,
        &event::BEATMAPSET_APPROVE_EVENT,
        &event::BEATMAPSET_DELETE_EVENT,
        &event::BEATMAPSET_REVIVE_EVENT,
        &event::BEATMAPSET_UPDATE_EVENT,
        &event::BEATMAPSET_UPLOAD_EVENT,
        &event::RANK_EVENT,
        &event::RANK_LOST_EVENT,
        &event::USER_SUPPORT_FIRST_EVENT,
        &event::USER_SUPPORT_AGAIN_EVENT,
        &event::USER_SUPPORT_GIFT_EVENT,
        &event::USERNAME_CHANGE_EVENT,
        &event::EVENT_USER_DECL,
        &event::EVENT_BEATMAP_DECL,
        &event::EVENT_BEATMAPSET_DECL,
        &event::EVENT_ACHIEVEMENT,
        &event::EVENTS,
        &event::BEATMAPSET_EVENT,
        &event::BEATMAPSET_EVENT_COMMENT,
        &event::BEATMAPSET_EVENT_COMMENT_NO_POST,
        &event::BEATMAPSET_EVENT_COMMENT_NONE,
        &event::BEATMAPSET_EVENT_COMMENT_CHANGE_STR,
        &event::BEATMAPSET_EVENT_COMMENT_CHANGE_BOOL,
        &event::BEATMAPSET_EVENT_COMMENT_LOVED_REMOVAL,
        &event::BEATMAPSET_EVENT_COMMENT_KUDOSU_CHANGE,
        &event::BEATMAPSET_EVENT_COMMENT_KUDOSU_RECALCULATE,
        &event::BEATMAPSET_EVENT_COMMENT_OWNER_CHANGE,
        &event::BEATMAPSET_EVENT_COMMENT_NOMINATE,
        &event::BEATMAPSET_EVENT_COMMENT_WITH_NOMINATORS,
        &event::BEATMAPSET_EVENT_COMMENT_WITH_SOURCE_USER,
        &event::KUDOSU_VOTE,
        &event::KUDOSU_HISTORY,
        &event::BEATMAPSET_DISCUSSION_POST,
        &event::BEATMAPSET_DISCUSSION,
        &event::MODDING_HISTORY_EVENTS_BUNDLE,
        &community::COMMENT,
        &community::COMMENTABLE_META,
        &community::COMMENT_BUNDLE,
        &community::FORUM,
        &community::FORUMS,
        &community::BUILD,
        &community::VERSIONS,
        &community::UPDATE_STREAM,
        &community::CHANGELOG_ENTRY,
        &community::GITHUB_USER,
        &community::NEWS_POST,
        &community::NEWS_NAVIGATION,
        &community::WIKI_PAGE,
        &community::USER_SEARCH_RESULT,
        &community::WIKI_PAGE_SEARCH_RESULT,
        &community::SEARCH,
        &community::SPOTLIGHT,
        &community::SPOTLIGHTS,
        &multiplayer::LEGACY_ROOM,
        &multiplayer::ROOM,
        &multiplayer::ROOM_PLAYLIST_ITEM_MOD,
        &multiplayer::ROOM_PLAYLIST_ITEM,
        &multiplayer::ROOM_PLAYLIST_ITEM_STATS,
        &multiplayer::ROOM_DIFFICULTY_RANGE,
        &ranking::RANKINGS,
        &ranking::COUNTRY_STATISTICS,
    ],
    enums: &[
        &enums::GAME_MODE,
        &enums::RANK_STATUS,
        &enums::GRADE,
        &enums::EVENT_TYPE,
        &enums::BEATMAPSET_EVENT_TYPE,
        &enums::BEATMAPSET_APPROVAL,
        &enums::MESSAGE_TYPE,
        &enums::ROOM_TYPE,
        &enums::ROOM_CATEGORY,
        &enums::USER_RELATION_TYPE,
        &enums::KUDOSU_ACTION,
    ],
    flags: &[&enums::MOD],
};

/// Shared registry over [`CATALOG`]. Plans are computed on first use and live for the process.
pub fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| Registry::new(&CATALOG))
}

#[cfg(test)]
mod tests {
    use super::{CATALOG, registry};

    #[test]
    fn every_declared_model_resolves() {
        let checked = registry().check_all().expect("catalogue resolves");
        assert_eq!(checked, CATALOG.models.len());
    }

    #[test]
    fn subclasses_inherit_parent_fields() {
        let plan = registry().plan_for("User").expect("user plan");
        assert!(plan.is_a("UserCompact"));
        assert!(plan.field("username").is_some());
        assert!(plan.field("join_date").is_some());

        let beatmap = registry().plan_for("Beatmap").expect("beatmap plan");
        let nested = beatmap.field("_beatmapset").expect("_beatmapset");
        assert_eq!(nested.wire, "beatmapset");
        assert_eq!(nested.owner, "Beatmap");
    }
}
