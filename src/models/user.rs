//! Purpose: User models and the small value objects hanging off them.
//! Exports: `USER_COMPACT`, `USER`, `USER_RELATION`, `USER_STATISTICS` and helpers.
//! Role: Declarations only; binding behavior lives in `core`.
use super::{DATETIME, OPT_BOOL, OPT_DATETIME, OPT_FLOAT, OPT_INT, OPT_STR};
use crate::core::plan::{ModelDecl, field};
use crate::core::relation::{EntityKind, RelationDecl};
use crate::core::types::Ty;

pub static USER_COMPACT: ModelDecl = ModelDecl::new("UserCompact")
    .doc("Minimal user representation embedded in most responses.")
    .fields(&[
        field("avatar_url", Ty::Str),
        field("country_code", Ty::Str),
        field("id", Ty::Int),
        field("is_active", Ty::Bool),
        field("is_bot", Ty::Bool),
        field("is_deleted", Ty::Bool),
        field("is_online", Ty::Bool),
        field("is_supporter", Ty::Bool),
        field("last_visit", OPT_DATETIME),
        field("pm_friends_only", Ty::Bool),
        field("profile_colour", OPT_STR),
        field("username", Ty::Str),
        field("badges", Ty::Optional(&Ty::List(&Ty::Named("UserBadge")))),
        field("beatmap_playcounts_count", OPT_INT),
        field("country", Ty::Optional(&Ty::Named("Country"))),
        field("cover", Ty::Optional(&Ty::Named("Cover"))),
        field("default_group", OPT_STR),
        field("favourite_beatmapset_count", OPT_INT),
        field("follower_count", OPT_INT),
        field("friends", Ty::Optional(&Ty::List(&Ty::Named("UserRelation")))),
        field("graveyard_beatmapset_count", OPT_INT),
        field("groups", Ty::Optional(&Ty::Any)),
        field("is_restricted", OPT_BOOL),
        field("is_silenced", OPT_BOOL),
        field("loved_beatmapset_count", OPT_INT),
        field("mapping_follower_count", OPT_INT),
        field("pending_beatmapset_count", OPT_INT),
        field("previous_usernames", Ty::Optional(&Ty::List(&Ty::Str))),
        field("rank_history", Ty::Optional(&Ty::Named("RankHistory"))),
        field("ranked_beatmapset_count", OPT_INT),
        field("scores_best_count", OPT_INT),
        field("scores_first_count", OPT_INT),
        field("scores_recent_count", OPT_INT),
        field("statistics", Ty::Optional(&Ty::Named("UserStatistics"))),
        field("statistics_rulesets", Ty::Optional(&Ty::Named("UserStatisticsRulesets"))),
        field("support_level", OPT_INT),
        field("unread_pm_count", OPT_INT),
        field("user_achievements", Ty::Optional(&Ty::Any)),
        field("session_verified", OPT_BOOL),
        field("team", Ty::Optional(&Ty::Any)),
    ])
    .relations(&[RelationDecl::foreign("expand", EntityKind::User, "id")]);

pub static USER: ModelDecl = ModelDecl::new("User")
    .extends("UserCompact")
    .doc("Full user profile returned by the user lookup endpoint.")
    .fields(&[
        field("comments_count", Ty::Int),
        field("cover_url", Ty::Str),
        field("discord", OPT_STR),
        field("has_supported", Ty::Bool),
        field("interests", OPT_STR),
        field("join_date", DATETIME),
        field("kudosu", Ty::Named("Kudosu")),
        field("location", OPT_STR),
        field("max_blocks", Ty::Int),
        field("max_friends", Ty::Int),
        field("occupation", OPT_STR),
        field("playmode", Ty::Str),
        field("playstyle", Ty::Optional(&Ty::List(&Ty::Str))),
        field("post_count", Ty::Int),
        field("profile_order", Ty::List(&Ty::Str)),
        field("profile_hue", OPT_INT),
        field("title", OPT_STR),
        field("title_url", OPT_STR),
        field("twitter", OPT_STR),
        field("website", OPT_STR),
        field("scores_pinned_count", Ty::Int),
        field("nominated_beatmapset_count", Ty::Int),
        field("rank_highest", Ty::Optional(&Ty::Named("RankHighest"))),
    ])
    .relations(&[RelationDecl::identity("expand")]);

pub static USER_RELATION: ModelDecl = ModelDecl::new("UserRelation")
    .fields(&[
        field("target_id", Ty::Int),
        field("relation_type", Ty::Named("UserRelationType")),
        field("mutual", Ty::Bool),
        field("target", Ty::Optional(&Ty::Named("UserCompact"))),
    ])
    .relations(&[
        RelationDecl::foreign("target", EntityKind::User, "target_id").embedded("target")
    ]);

pub static USER_STATISTICS: ModelDecl = ModelDecl::new("UserStatistics").fields(&[
    field("count_100", Ty::Int),
    field("count_300", Ty::Int),
    field("count_50", Ty::Int),
    field("count_miss", Ty::Int),
    field("country_rank", OPT_INT),
    field("grade_counts", Ty::Named("UserGradeCounts")),
    field("hit_accuracy", Ty::Float),
    field("is_ranked", Ty::Bool),
    field("level", Ty::Named("UserLevel")),
    field("maximum_combo", Ty::Int),
    field("play_count", Ty::Int),
    field("play_time", OPT_INT),
    field("pp", OPT_FLOAT),
    field("global_rank", OPT_INT),
    field("rank", Ty::Optional(&Ty::Any)),
    field("ranked_score", Ty::Int),
    field("replays_watched_by_others", Ty::Int),
    field("total_hits", Ty::Int),
    field("total_score", Ty::Int),
    field("user", Ty::Optional(&Ty::Named("UserCompact"))),
]);

pub static USER_STATISTICS_RULESETS: ModelDecl =
    ModelDecl::new("UserStatisticsRulesets").fields(&[
        field("osu", Ty::Optional(&Ty::Named("UserStatistics"))),
        field("taiko", Ty::Optional(&Ty::Named("UserStatistics"))),
        field("fruits", Ty::Optional(&Ty::Named("UserStatistics"))),
        field("mania", Ty::Optional(&Ty::Named("UserStatistics"))),
    ]);

pub static USER_GRADE_COUNTS: ModelDecl = ModelDecl::new("UserGradeCounts").fields(&[
    field("ss", Ty::Int),
    field("ssh", Ty::Int),
    field("s", Ty::Int),
    field("sh", Ty::Int),
    field("a", Ty::Int),
]);

pub static USER_LEVEL: ModelDecl = ModelDecl::new("UserLevel")
    .fields(&[field("current", Ty::Int), field("progress", Ty::Int)]);

pub static USER_BADGE: ModelDecl = ModelDecl::new("UserBadge").fields(&[
    field("awarded_at", DATETIME),
    field("description", Ty::Str),
    field("image_url", Ty::Str),
    field("url", Ty::Str),
]);

pub static RANK_HISTORY: ModelDecl = ModelDecl::new("RankHistory")
    .fields(&[field("mode", Ty::Named("GameMode")), field("data", Ty::List(&Ty::Int))]);

pub static RANK_HIGHEST: ModelDecl = ModelDecl::new("RankHighest")
    .fields(&[field("rank", Ty::Int), field("updated_at", DATETIME)]);

pub static KUDOSU: ModelDecl = ModelDecl::new("Kudosu")
    .fields(&[field("total", Ty::Int), field("available", Ty::Int)]);

pub static COUNTRY: ModelDecl = ModelDecl::new("Country")
    .fields(&[field("code", Ty::Str), field("name", Ty::Str)]);

pub static COVER: ModelDecl = ModelDecl::new("Cover").fields(&[
    field("custom_url", OPT_STR),
    field("url", Ty::Str),
    field("id", Ty::Optional(&Ty::Union(&[Ty::Int, Ty::Str]))),
]);

pub static USERS: ModelDecl =
    ModelDecl::new("Users").fields(&[field("users", Ty::List(&Ty::Named("UserCompact")))]);
