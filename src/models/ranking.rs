//! Purpose: Ranking pages.
//! Exports: `RANKINGS`, `COUNTRY_STATISTICS`.
//! Role: `ranking` is a list of either user or country statistics; both are JSON arrays, so
//!       the element shape decides via a per-payload override instead of union kind matching.
use super::OPT_INT;
use crate::core::context::ApiContext;
use crate::core::error::Error;
use crate::core::plan::{ModelDecl, field};
use crate::core::select::Selection;
use crate::core::types::Ty;
use serde_json::{Map, Value};

fn select_ranking(payload: &Map<String, Value>, _api: &ApiContext) -> Result<Selection, Error> {
    let is_country = payload
        .get("ranking")
        .and_then(Value::as_array)
        .and_then(|entries| entries.first())
        .and_then(Value::as_object)
        .is_some_and(|entry| entry.contains_key("code"));
    if is_country {
        Ok(Selection::Overrides(vec![(
            "ranking",
            Ty::List(&Ty::Named("CountryStatistics")),
        )]))
    } else {
        Ok(Selection::Keep)
    }
}

pub static RANKINGS: ModelDecl = ModelDecl::new("Rankings")
    .fields(&[
        field("beatmapsets", Ty::Optional(&Ty::List(&Ty::Named("Beatmapset")))),
        field("cursor", Ty::Optional(&Ty::Named("Cursor"))),
        field("cursor_string", Ty::Optional(&Ty::Str)),
        field(
            "ranking",
            Ty::Union(&[
                Ty::List(&Ty::Named("UserStatistics")),
                Ty::List(&Ty::Named("CountryStatistics")),
            ]),
        ),
        field("spotlight", Ty::Optional(&Ty::Named("Spotlight"))),
        field("total", OPT_INT),
    ])
    .select(select_ranking);

pub static COUNTRY_STATISTICS: ModelDecl = ModelDecl::new("CountryStatistics").fields(&[
    field("code", Ty::Str),
    field("active_users", Ty::Int),
    field("play_count", Ty::Int),
    field("ranked_score", Ty::Int),
    field("performance", Ty::Int),
    field("country", Ty::Named("Country")),
]);
