//! Purpose: Binding contract checks against the shipped osu! catalogue.
//! Exports: Integration tests only.
//! Role: Exercise aliasing, collections, unions, polymorphism, drift and legacy paths end to end.
//! Invariants: Payloads are small but shaped like real API responses.
use ossbind::api::{
    BindContext, Bound, DriftCode, ErrorKind, Instance, Mode, bind, bind_with_report, registry,
};
use serde_json::{Value, json};

fn strict() -> BindContext<'static> {
    BindContext::new(registry()).with_mode(Mode::Strict)
}

fn lenient() -> BindContext<'static> {
    BindContext::new(registry()).with_mode(Mode::Lenient)
}

fn user_compact(id: i64, username: &str) -> Value {
    json!({
        "avatar_url": format!("https://a.ppy.sh/{id}"),
        "country_code": "AU",
        "default_group": "default",
        "id": id,
        "is_active": true,
        "is_bot": false,
        "is_deleted": false,
        "is_online": false,
        "is_supporter": true,
        "last_visit": null,
        "pm_friends_only": false,
        "profile_colour": null,
        "username": username,
    })
}

fn items(instance: &Instance, attr: &str) -> Vec<Instance> {
    instance
        .list(attr)
        .expect("list attr")
        .expect("non-null list")
        .iter()
        .map(|item| item.as_instance().expect("model item").clone())
        .collect()
}

#[test]
fn catalogue_resolves_every_declared_model() {
    let checked = registry().check_all().expect("catalogue resolves");
    assert!(checked > 90);
}

#[test]
fn strict_round_trip_through_wire_names() {
    let payload = json!({"slot": 3, "team": "red", "pass": true});
    let info = bind(&payload, "ScoreMatchInfo", &strict()).expect("bind");
    assert_eq!(info.boolean("pass_").expect("pass_"), Some(true));
    assert_eq!(info.to_wire().expect("wire"), payload);
    assert_eq!(
        info.to_json().expect("json"),
        json!({"slot": 3, "team": "red", "pass_": true})
    );

    let again = bind(&info.to_wire().expect("wire"), "ScoreMatchInfo", &strict()).expect("rebind");
    assert_eq!(again, info);
}

#[test]
fn aliased_attribute_is_not_matched_by_its_attribute_name() {
    let err = bind(
        &json!({"slot": 3, "team": "red", "pass_": true}),
        "ScoreMatchInfo",
        &strict(),
    )
    .expect_err("attribute name is not a wire name");
    assert_eq!(err.kind(), ErrorKind::UnknownField);
    assert_eq!(err.field(), Some("pass_"));
}

#[test]
fn list_binding_preserves_order_and_locates_failures() {
    let payload = json!({"users": [
        user_compact(2, "peppy"),
        user_compact(124493, "Cookiezi"),
        user_compact(7562902, "mrekk"),
    ]});
    let users = bind(&payload, "Users", &strict()).expect("bind");
    let names: Vec<_> = items(&users, "users")
        .iter()
        .map(|user| user.str("username").expect("username").map(str::to_string))
        .collect();
    assert_eq!(
        names,
        vec![
            Some("peppy".to_string()),
            Some("Cookiezi".to_string()),
            Some("mrekk".to_string())
        ]
    );

    let mut broken = payload.clone();
    broken["users"][1]["id"] = json!("124493");
    let err = bind(&broken, "Users", &strict()).expect_err("string id");
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(err.path(), Some("$.users[1].id"));
    assert_eq!(err.model(), Some("UserCompact"));
}

#[test]
fn optional_fields_bind_absent_or_null_as_null() {
    let cover =
        bind(&json!({"url": "https://osu.ppy.sh/c.jpg"}), "Cover", &strict()).expect("bind");
    assert!(cover.has("custom_url"));
    assert_eq!(cover.str("custom_url").expect("custom_url"), None);
    assert_eq!(cover.int("id").expect("id"), None);
}

#[test]
fn union_takes_the_first_candidate_of_matching_kind() {
    let numeric = bind(&json!({"url": "u", "id": 7}), "Cover", &strict()).expect("int id");
    assert_eq!(numeric.int("id").expect("id"), Some(7));

    let named = bind(&json!({"url": "u", "id": "default"}), "Cover", &strict()).expect("str id");
    assert_eq!(named.str("id").expect("id"), Some("default"));

    let err = bind(&json!({"url": "u", "id": true}), "Cover", &strict()).expect_err("bool id");
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(err.path(), Some("$.id"));
}

#[test]
fn events_bind_as_their_subclass() {
    let payload = json!({"events": [
        {
            "created_at": "2024-03-01T10:00:00+00:00",
            "id": 1,
            "type": "achievement",
            "achievement": {
                "icon_url": "https://assets.ppy.sh/medals/web/all-skill-skill1.png",
                "id": 1,
                "name": "Rising Star",
                "grouping": "Skill",
                "ordering": 1,
                "slug": "osu-skill-pass-1",
                "description": "Can't go forward without the first steps.",
                "mode": "osu",
                "instructions": null
            },
            "user": {"username": "peppy", "url": "/users/2"}
        },
        {
            "created_at": "2024-03-01T11:00:00+00:00",
            "id": 2,
            "type": "rank",
            "scoreRank": "S",
            "rank": 1,
            "mode": "osu",
            "beatmap": {"title": "xi - FREEDOM DiVE [FOUR DIMENSIONS]", "url": "/b/129891"},
            "user": {"username": "mrekk", "url": "/users/7562902"}
        }
    ]});
    let events = bind(&payload, "Events", &strict()).expect("bind");
    let events = items(&events, "events");
    assert_eq!(events[0].model(), "AchievementEvent");
    assert_eq!(events[1].model(), "RankEvent");
    assert!(events.iter().all(|event| event.is_a("Event")));
    assert_eq!(events[1].int("rank").expect("rank"), Some(1));
    let mode = events[1].enum_value("mode").expect("mode").expect("non-null");
    assert!(mode.is("Osu"));
    assert!(events[0].downcast("Event").is_ok());
    assert!(events[0].downcast("RankEvent").is_err());
}

#[test]
fn unrecognized_event_type_is_unknown_variant() {
    let err = bind(
        &json!({"created_at": "2024-03-01T10:00:00Z", "id": 3, "type": "teamJoin"}),
        "Event",
        &lenient(),
    )
    .expect_err("unknown type");
    assert_eq!(err.kind(), ErrorKind::UnknownVariant);
    assert_eq!(err.value(), Some("teamJoin"));
}

#[test]
fn beatmapset_event_comment_is_typed_by_event_type() {
    let base = json!({"id": 10, "created_at": "2023-05-05T05:05:05Z", "user_id": 2});

    let mut text = base.clone();
    text["type"] = json!("disqualify");
    text["comment"] = json!("Disqualified by the NAT.");
    let event = bind(&text, "BeatmapsetEvent", &strict()).expect("string comment");
    assert_eq!(event.str("comment").expect("comment"), Some("Disqualified by the NAT."));

    let mut structured = base.clone();
    structured["type"] = json!("disqualify");
    structured["comment"] = json!({"beatmap_discussion_id": 5, "nominator_ids": [3, 4]});
    let event = bind(&structured, "BeatmapsetEvent", &strict()).expect("object comment");
    let comment = event.instance("comment").expect("comment").expect("non-null");
    assert_eq!(comment.model(), "BeatmapsetEventCommentWithNominators");
    assert_eq!(comment.int("beatmap_discussion_post_id").expect("post"), None);

    let mut genre = base.clone();
    genre["type"] = json!("genre_edit");
    genre["comment"] = json!({
        "beatmap_discussion_id": null,
        "beatmap_discussion_post_id": null,
        "old": "Unspecified",
        "new": "Electronic"
    });
    let event = bind(&genre, "BeatmapsetEvent", &strict()).expect("genre edit");
    let comment = event.instance("comment").expect("comment").expect("non-null");
    assert!(comment.is_a("BeatmapsetEventCommentNone"));
    assert_eq!(comment.str("new").expect("new"), Some("Electronic"));

    let mut love = base.clone();
    love["type"] = json!("love");
    love["comment"] = Value::Null;
    let event = bind(&love, "BeatmapsetEvent", &strict()).expect("love");
    assert!(event.attr("comment").expect("comment").is_null());

    let mut mistyped = base;
    mistyped["type"] = json!("love");
    mistyped["comment"] = json!("unexpected");
    let err = bind(&mistyped, "BeatmapsetEvent", &strict()).expect_err("love carries no comment");
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(err.path(), Some("$.comment"));
}

#[test]
fn unknown_enum_value_fails_strict_and_is_synthesized_lenient() {
    let payload = json!({"mode": "lazer", "data": [120, 118, 101]});
    let err = bind(&payload, "RankHistory", &strict()).expect_err("strict");
    assert_eq!(err.kind(), ErrorKind::UnknownEnumValue);
    assert_eq!(err.path(), Some("$.mode"));

    let (history, report) = bind_with_report(&payload, "RankHistory", &lenient()).expect("lenient");
    let mode = history.enum_value("mode").expect("mode").expect("non-null");
    assert!(mode.is_unknown());
    assert_eq!(mode.enum_name(), "GameMode");
    assert_eq!(report.count(DriftCode::UnknownEnumValue), 1);
    assert_eq!(history.to_wire().expect("wire"), payload);
}

#[test]
fn rank_status_binds_from_integers_and_names() {
    let numbered = bind(&json!({"id": 75, "status": 4}), "BeatmapCompact", &lenient())
        .expect("int status");
    let named = bind(&json!({"id": 75, "status": "loved"}), "BeatmapCompact", &lenient())
        .expect("string status");
    let status = named.enum_value("status").expect("status").expect("non-null");
    assert!(status.is("Loved"));
    assert_eq!(
        numbered.enum_value("status").expect("status"),
        named.enum_value("status").expect("status")
    );

    let set = bind(&json!({"id": 1, "status": "ranked"}), "BeatmapsetCompact", &lenient())
        .expect("beatmapset status");
    let status = set.enum_value("status").expect("status").expect("non-null");
    assert!(status.is("Ranked"));

    let err = bind(&json!({"id": 75, "status": true}), "BeatmapCompact", &lenient())
        .expect_err("bool status");
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(err.path(), Some("$.status"));

    let err = bind(&json!({"mode": 3, "data": []}), "RankHistory", &lenient()).expect_err("int");
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
}

#[test]
fn country_rankings_override_the_ranking_list_type() {
    let payload = json!({
        "ranking": [{
            "code": "US",
            "active_users": 1_000_000,
            "play_count": 9_000_000_000_i64,
            "ranked_score": 12,
            "performance": 34,
            "country": {"code": "US", "name": "United States"}
        }],
        "total": 1
    });
    let rankings = bind(&payload, "Rankings", &strict()).expect("bind");
    let entries = items(&rankings, "ranking");
    assert_eq!(entries[0].model(), "CountryStatistics");
    let country = entries[0].instance("country").expect("country").expect("non-null");
    assert_eq!(country.str("name").expect("name"), Some("United States"));
}

fn legacy_score() -> Value {
    json!({
        "id": 4242,
        "best_id": 4242,
        "user_id": 2,
        "accuracy": 0.9876,
        "mods": "HDDT",
        "score": 1_234_567,
        "max_combo": 727,
        "perfect": 1,
        "statistics": {"count_50": 0, "count_100": 3, "count_300": 500, "count_miss": 0},
        "pp": 727.0,
        "rank": "SH",
        "created_at": "2019-01-01T00:00:00Z",
        "mode": "osu",
        "mode_int": 0,
        "replay": true,
        "passed": true,
        "current_user_attributes": {"pin": null}
    })
}

#[test]
fn old_versions_and_legacy_shapes_bind_as_legacy_score() {
    let old = BindContext::new(registry())
        .with_mode(Mode::Strict)
        .with_api_version(20220101);
    let score = bind(&legacy_score(), "Score", &old).expect("old version");
    assert_eq!(score.model(), "LegacyScore");
    assert_eq!(score.boolean("perfect").expect("perfect"), Some(true));
    let mods = score.attr("mods").expect("mods").as_flags().expect("flags");
    assert!(mods.contains("HD"));
    assert!(mods.contains("DT"));
    assert!(!mods.contains("HR"));

    let score = bind(&legacy_score(), "Score", &strict()).expect("legacy shape");
    assert_eq!(score.model(), "LegacyScore");
}

#[test]
fn drift_is_reported_with_paths_in_lenient_mode() {
    let payload = json!({"code": "AU", "flag": "au.png"});
    let err = bind(&payload, "Country", &strict()).expect_err("strict");
    assert_eq!(err.kind(), ErrorKind::UnknownField);
    assert_eq!(err.path(), Some("$.flag"));

    let (country, report) = bind_with_report(&payload, "Country", &lenient()).expect("lenient");
    assert!(!report.is_clean());
    assert_eq!(report.count(DriftCode::UnknownField), 1);
    assert_eq!(report.count(DriftCode::MissingField), 1);
    let paths: Vec<_> = report.issues.iter().map(|issue| issue.path.as_str()).collect();
    assert!(paths.contains(&"$.flag"));
    assert!(paths.contains(&"$.name"));
    let err = country.str("name").expect_err("absent");
    assert_eq!(err.kind(), ErrorKind::AttributeMissing);
}

#[test]
fn nested_beatmaps_inherit_the_beatmapset_id() {
    let payload = json!({
        "id": 41823,
        "title": "The Big Black",
        "beatmaps": [
            {"id": 131891, "version": "WHO'S AFRAID OF THE BIG BLACK"},
            {"id": 131892, "version": "Extra", "beatmapset_id": 1}
        ]
    });
    let set = bind(&payload, "BeatmapsetCompact", &lenient()).expect("bind");
    let beatmaps = items(&set, "beatmaps");
    assert!(!beatmaps[0].has("beatmapset_id"));
    assert_eq!(beatmaps[0].int("beatmapset_id").expect("inherited"), Some(41823));
    assert_eq!(beatmaps[1].int("beatmapset_id").expect("own"), Some(1));
    let parent = beatmaps[0].parent().expect("parent alive");
    assert_eq!(parent.model(), "BeatmapsetCompact");

    let (standalone, report) =
        bind_with_report(&json!({"id": 131891}), "Beatmap", &lenient()).expect("bind");
    let err = standalone.int("beatmapset_id").expect_err("no parent");
    assert_eq!(err.kind(), ErrorKind::AttributeMissing);
    assert!(report.issues.iter().any(|issue| issue.path == "$.beatmapset_id"));
}

#[test]
fn beatmaps_only_inherit_from_an_embedding_beatmapset() {
    let item = bind(
        &json!({"id": 777, "beatmap": {"id": 5}}),
        "RoomPlaylistItem",
        &lenient(),
    )
    .expect("bind");
    let beatmap = item.instance("beatmap").expect("beatmap").expect("non-null");
    assert_eq!(beatmap.parent().expect("parent alive").model(), "RoomPlaylistItem");
    let err = beatmap.int("beatmapset_id").expect_err("playlist item is not a beatmapset");
    assert_eq!(err.kind(), ErrorKind::AttributeMissing);

    let compact = json!({
        "difficulty_rating": 5.2,
        "id": 75,
        "mode": "osu",
        "status": "ranked",
        "total_length": 142,
        "version": "Normal",
        "user_id": 2,
    });
    let err = bind(&compact, "BeatmapCompact", &strict()).expect_err("strict");
    assert_eq!(err.kind(), ErrorKind::MissingField);
    assert_eq!(err.path(), Some("$.beatmapset_id"));

    let mut complete = compact.clone();
    complete["beatmapset_id"] = json!(1);
    let beatmap = bind(&complete, "BeatmapCompact", &strict()).expect("complete");
    assert_eq!(beatmap.int("beatmapset_id").expect("own"), Some(1));
}

#[test]
fn timestamps_accept_rfc3339_and_legacy_forms() {
    let spaced = bind(
        &json!({"rank": 1, "updated_at": "2024-01-02 03:04:05"}),
        "RankHighest",
        &strict(),
    )
    .expect("spaced");
    let updated = spaced.datetime("updated_at").expect("updated_at").expect("non-null");
    assert_eq!(updated.year(), 2024);
    assert_eq!(updated.hour(), 3);

    let err = bind(
        &json!({"rank": 1, "updated_at": "yesterday"}),
        "RankHighest",
        &strict(),
    )
    .expect_err("malformed");
    assert_eq!(err.kind(), ErrorKind::DateParse);
    assert_eq!(err.path(), Some("$.updated_at"));
}

#[test]
fn type_mismatch_fails_in_both_modes() {
    for ctx in [strict(), lenient()] {
        let err = bind(&json!({"percentage": "100", "pp": 1.0}), "Weight", &ctx)
            .expect_err("string percentage");
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.field(), Some("percentage"));
    }
}

#[test]
fn room_layout_follows_the_api_version() {
    let old = lenient().with_api_version(20220101);
    assert_eq!(bind(&json!({"id": 1}), "Room", &old).expect("old").model(), "LegacyRoom");
    assert_eq!(bind(&json!({"id": 1}), "Room", &lenient()).expect("new").model(), "Room");
}

#[test]
fn raw_json_values_are_kept_verbatim() {
    let score = bind(&legacy_score(), "Score", &strict()).expect("bind");
    match score.attr("current_user_attributes").expect("attr") {
        Bound::Raw(value) => assert_eq!(value, &json!({"pin": null})),
        other => panic!("expected raw json, got {other:?}"),
    }
}
