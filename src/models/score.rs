//! Purpose: Score models, including the legacy score shape.
//! Exports: `SCORE`, `LEGACY_SCORE`, `SCORE_MATCH_INFO`, `STATISTICS` and wrappers.
//! Role: `Score` picks between the modern and legacy layouts before binding.
//! Invariants: Match scores send `perfect` as an integer; it is normalized to a bool first.
use super::{DATETIME, OPT_DATETIME, OPT_FLOAT, OPT_INT, OPT_STR};
use crate::core::context::ApiContext;
use crate::core::error::Error;
use crate::core::plan::{ModelDecl, field};
use crate::core::relation::{EntityKind, RelationDecl};
use crate::core::scalar::legacy_bool;
use crate::core::select::Selection;
use crate::core::types::Ty;
use serde_json::{Map, Value};

/// First API version that serves the modern score layout.
pub const MODERN_SCORE_VERSION: u32 = 20220705;

fn select_score(payload: &Map<String, Value>, api: &ApiContext) -> Result<Selection, Error> {
    if api.api_version < MODERN_SCORE_VERSION {
        return Ok(Selection::Subclass("LegacyScore"));
    }
    // legacy match scores still show up under modern versions
    if payload.contains_key("mode")
        && payload.contains_key("created_at")
        && !payload.contains_key("legacy_perfect")
    {
        return Ok(Selection::Subclass("LegacyScore"));
    }
    Ok(Selection::Keep)
}

fn normalize_perfect(payload: &mut Map<String, Value>) {
    if let Some(perfect) = payload.get_mut("perfect") {
        legacy_bool(perfect);
    }
}

static SCORE_RELATIONS: &[RelationDecl] = &[
    RelationDecl::foreign("user", EntityKind::User, "user_id").embedded("_user"),
    RelationDecl::foreign("beatmap", EntityKind::Beatmap, "beatmap_id"),
];

pub static SCORE: ModelDecl = ModelDecl::new("Score")
    .doc("Score as served with x-api-version >= 20220705.")
    .fields(&[
        field("id", OPT_INT),
        field("best_id", OPT_INT),
        field("user_id", Ty::Int),
        field("accuracy", Ty::Float),
        field("max_combo", Ty::Int),
        field("statistics", Ty::Named("Statistics")),
        field("pp", OPT_FLOAT),
        field("rank", Ty::Named("Grade")),
        field("passed", Ty::Bool),
        field("current_user_attributes", Ty::Any),
        field("classic_total_score", Ty::Int),
        field("processed", Ty::Bool),
        field("replay", Ty::Bool),
        field("maximum_statistics", Ty::Named("Statistics")),
        field("mods", Ty::List(&Ty::Named("NonLegacyMod"))),
        field("ruleset_id", Ty::Int),
        field("started_at", OPT_DATETIME),
        field("ended_at", DATETIME),
        field("ranked", Ty::Bool),
        field("preserve", Ty::Bool),
        field("beatmap_id", Ty::Int),
        field("build_id", OPT_INT),
        field("has_replay", Ty::Bool),
        field("is_perfect_combo", Ty::Bool),
        field("total_score", Ty::Int),
        field("total_score_without_mods", OPT_INT),
        field("legacy_perfect", Ty::Bool),
        field("legacy_score_id", OPT_INT),
        field("legacy_total_score", Ty::Int),
        field("beatmap", Ty::Optional(&Ty::Named("Beatmap"))),
        field("beatmapset", Ty::Optional(&Ty::Named("BeatmapsetCompact"))),
        field("rank_country", OPT_INT),
        field("rank_global", OPT_INT),
        field("weight", Ty::Optional(&Ty::Named("Weight"))),
        field("_user", Ty::Optional(&Ty::Named("UserCompact"))).wire("user"),
        field("match", Ty::Optional(&Ty::Named("ScoreMatchInfo"))),
        field("type", Ty::Str),
    ])
    .relations(SCORE_RELATIONS)
    .select(select_score)
    .preprocess(normalize_perfect);

pub static LEGACY_SCORE: ModelDecl = ModelDecl::new("LegacyScore")
    .doc("Score layout served before x-api-version 20220705 and by legacy matches.")
    .fields(&[
        field("id", OPT_INT),
        field("best_id", OPT_INT),
        field("user_id", Ty::Int),
        field("accuracy", Ty::Float),
        field("mods", Ty::Named("Mod")),
        field("score", Ty::Int),
        field("max_combo", Ty::Int),
        field("perfect", Ty::Bool),
        field("statistics", Ty::Named("Statistics")),
        field("pp", OPT_FLOAT),
        field("rank", Ty::Named("Grade")),
        field("created_at", DATETIME),
        field("mode", Ty::Named("GameMode")),
        field("mode_int", Ty::Int),
        field("replay", Ty::Bool),
        field("passed", Ty::Bool),
        field("current_user_attributes", Ty::Any),
        field("beatmap", Ty::Optional(&Ty::Named("Beatmap"))),
        field("beatmapset", Ty::Optional(&Ty::Named("BeatmapsetCompact"))),
        field("rank_country", OPT_INT),
        field("rank_global", OPT_INT),
        field("weight", Ty::Optional(&Ty::Named("Weight"))),
        field("_user", Ty::Optional(&Ty::Named("UserCompact"))).wire("user"),
        field("match", Ty::Optional(&Ty::Named("ScoreMatchInfo"))),
        field("type", OPT_STR),
    ])
    .relations(&[RelationDecl::foreign("user", EntityKind::User, "user_id").embedded("_user")])
    .preprocess(normalize_perfect);

pub static SCORE_MATCH_INFO: ModelDecl = ModelDecl::new("ScoreMatchInfo").fields(&[
    field("slot", Ty::Int),
    field("team", Ty::Str),
    field("pass_", Ty::Bool).wire("pass"),
]);

/// Hit counts. Legacy and modern layouts use disjoint keys, so all are optional.
pub static STATISTICS: ModelDecl = ModelDecl::new("Statistics").fields(&[
    field("count_50", OPT_INT),
    field("count_100", OPT_INT),
    field("count_300", OPT_INT),
    field("count_geki", OPT_INT),
    field("count_katu", OPT_INT),
    field("count_miss", OPT_INT),
    field("great", OPT_INT),
    field("ok", OPT_INT),
    field("meh", OPT_INT),
    field("miss", OPT_INT),
    field("perfect", OPT_INT),
    field("good", OPT_INT),
    field("large_tick_hit", OPT_INT),
    field("large_tick_miss", OPT_INT),
    field("small_tick_hit", OPT_INT),
    field("small_tick_miss", OPT_INT),
    field("slider_tail_hit", OPT_INT),
    field("large_bonus", OPT_INT),
    field("small_bonus", OPT_INT),
    field("ignore_hit", OPT_INT),
    field("ignore_miss", OPT_INT),
    field("legacy_combo_increase", OPT_INT),
]);

pub static WEIGHT: ModelDecl = ModelDecl::new("Weight")
    .fields(&[field("percentage", Ty::Float), field("pp", Ty::Float)]);

pub static NON_LEGACY_MOD: ModelDecl = ModelDecl::new("NonLegacyMod")
    .fields(&[field("acronym", Ty::Str), field("settings", Ty::Optional(&Ty::Any))]);

pub static BEATMAP_USER_SCORE: ModelDecl = ModelDecl::new("BeatmapUserScore")
    .fields(&[field("position", Ty::Int), field("score", Ty::Named("Score"))]);

pub static BEATMAP_SCORES: ModelDecl = ModelDecl::new("BeatmapScores").fields(&[
    field("scores", Ty::List(&Ty::Named("Score"))),
    field("score_count", Ty::Int),
    field("user_score", Ty::Optional(&Ty::Named("BeatmapUserScore"))).wire("userScore"),
]);

pub static SCORES: ModelDecl = ModelDecl::new("Scores").fields(&[
    field("cursor", Ty::Optional(&Ty::Named("Cursor"))),
    field("cursor_string", OPT_STR),
    field("scores", Ty::List(&Ty::Named("Score"))),
]);

#[cfg(test)]
mod tests {
    use super::{normalize_perfect, select_score};
    use crate::core::context::ApiContext;
    use crate::core::select::Selection;
    use serde_json::{Map, Value, json};

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn old_api_versions_select_the_legacy_layout() {
        let payload = object(json!({"legacy_perfect": true}));
        let selection = select_score(&payload, &ApiContext::new(20220704)).expect("select");
        assert_eq!(selection, Selection::Subclass("LegacyScore"));
        let selection = select_score(&payload, &ApiContext::new(20220705)).expect("select");
        assert_eq!(selection, Selection::Keep);
    }

    #[test]
    fn legacy_shaped_payload_selects_legacy_under_modern_version() {
        let payload = object(json!({"mode": "osu", "created_at": "2020-01-01T00:00:00Z"}));
        let selection = select_score(&payload, &ApiContext::default()).expect("select");
        assert_eq!(selection, Selection::Subclass("LegacyScore"));
    }

    #[test]
    fn integer_perfect_becomes_bool() {
        let mut payload = object(json!({"perfect": 1}));
        normalize_perfect(&mut payload);
        assert_eq!(payload["perfect"], json!(true));
        let mut payload = object(json!({"perfect": false}));
        normalize_perfect(&mut payload);
        assert_eq!(payload["perfect"], json!(false));
    }
}
