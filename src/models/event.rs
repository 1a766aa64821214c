//! Purpose: Activity events and beatmapset modding events.
//! Exports: `EVENT` and its subclasses, `BEATMAPSET_EVENT`, discussion and comment models.
//! Role: `Event` dispatches on `type` to a subclass; `BeatmapsetEvent` re-types `comment`.
//! Invariants: An event type missing from the tables below is an `UnknownVariant`.
use super::{DATETIME, OPT_ANY, OPT_DATETIME, OPT_INT, OPT_STR};
use crate::core::context::ApiContext;
use crate::core::error::Error;
use crate::core::plan::{ModelDecl, field};
use crate::core::relation::{EntityKind, RelationDecl};
use crate::core::select::{OverrideTable, Selection, VariantTable};
use crate::core::types::Ty;
use serde_json::{Map, Value};

static EVENT_VARIANTS: VariantTable = VariantTable {
    model: "Event",
    key: "type",
    variants: &[
        ("achievement", "AchievementEvent"),
        ("beatmapPlaycount", "BeatmapPlaycountEvent"),
        ("beatmapsetApprove", "BeatmapsetApproveEvent"),
        ("beatmapsetDelete", "BeatmapsetDeleteEvent"),
        ("beatmapsetRevive", "BeatmapsetReviveEvent"),
        ("beatmapsetUpdate", "BeatmapsetUpdateEvent"),
        ("beatmapsetUpload", "BeatmapsetUploadEvent"),
        ("rank", "RankEvent"),
        ("rankLost", "RankLostEvent"),
        ("userSupportFirst", "UserSupportFirstEvent"),
        ("userSupportAgain", "UserSupportAgainEvent"),
        ("userSupportGift", "UserSupportGiftEvent"),
        ("usernameChange", "UsernameChangeEvent"),
    ],
};

fn select_event(payload: &Map<String, Value>, _api: &ApiContext) -> Result<Selection, Error> {
    EVENT_VARIANTS.select(payload)
}

pub static EVENT: ModelDecl = ModelDecl::new("Event")
    .doc("Recent activity entry; always bound as one of its subclasses.")
    .fields(&[
        field("created_at", DATETIME),
        field("createdAt", Ty::Optional(&DATETIME)),
        field("id", Ty::Int),
        field("type", Ty::Named("EventType")),
    ])
    .select(select_event);

const EVENT_USER: Ty = Ty::Named("EventUser");
const EVENT_BEATMAP: Ty = Ty::Named("EventBeatmap");
const EVENT_BEATMAPSET: Ty = Ty::Named("EventBeatmapset");

pub static ACHIEVEMENT_EVENT: ModelDecl = ModelDecl::new("AchievementEvent")
    .extends("Event")
    .fields(&[
        field("achievement", Ty::Named("EventAchievement")),
        field("user", EVENT_USER),
    ]);

pub static BEATMAP_PLAYCOUNT_EVENT: ModelDecl = ModelDecl::new("BeatmapPlaycountEvent")
    .extends("Event")
    .fields(&[field("beatmap", EVENT_BEATMAP), field("count", Ty::Int)]);

pub static BEATMAPSET_APPROVE_EVENT: ModelDecl = ModelDecl::new("BeatmapsetApproveEvent")
    .extends("Event")
    .fields(&[
        field("approval", Ty::Named("BeatmapsetApproval")),
        field("beatmapset", EVENT_BEATMAPSET),
        field("user", EVENT_USER),
    ]);

pub static BEATMAPSET_DELETE_EVENT: ModelDecl = ModelDecl::new("BeatmapsetDeleteEvent")
    .extends("Event")
    .fields(&[field("beatmapset", EVENT_BEATMAPSET)]);

pub static BEATMAPSET_REVIVE_EVENT: ModelDecl = ModelDecl::new("BeatmapsetReviveEvent")
    .extends("Event")
    .fields(&[field("beatmapset", EVENT_BEATMAPSET), field("user", EVENT_USER)]);

pub static BEATMAPSET_UPDATE_EVENT: ModelDecl = ModelDecl::new("BeatmapsetUpdateEvent")
    .extends("Event")
    .fields(&[field("beatmapset", EVENT_BEATMAPSET), field("user", EVENT_USER)]);

pub static BEATMAPSET_UPLOAD_EVENT: ModelDecl = ModelDecl::new("BeatmapsetUploadEvent")
    .extends("Event")
    .fields(&[field("beatmapset", EVENT_BEATMAPSET), field("user", EVENT_USER)]);

pub static RANK_EVENT: ModelDecl = ModelDecl::new("RankEvent")
    .extends("Event")
    .fields(&[
        field("scoreRank", Ty::Str),
        field("rank", Ty::Int),
        field("mode", Ty::Named("GameMode")),
        field("beatmap", EVENT_BEATMAP),
        field("user", EVENT_USER),
    ]);

pub static RANK_LOST_EVENT: ModelDecl = ModelDecl::new("RankLostEvent")
    .extends("Event")
    .fields(&[
        field("mode", Ty::Named("GameMode")),
        field("beatmap", EVENT_BEATMAP),
        field("user", EVENT_USER),
    ]);

pub static USER_SUPPORT_FIRST_EVENT: ModelDecl = ModelDecl::new("UserSupportFirstEvent")
    .extends("Event")
    .fields(&[field("user", EVENT_USER)]);

pub static USER_SUPPORT_AGAIN_EVENT: ModelDecl = ModelDecl::new("UserSupportAgainEvent")
    .extends("Event")
    .fields(&[field("user", EVENT_USER)]);

pub static USER_SUPPORT_GIFT_EVENT: ModelDecl = ModelDecl::new("UserSupportGiftEvent")
    .extends("Event")
    .fields(&[field("user", EVENT_USER)]);

pub static USERNAME_CHANGE_EVENT: ModelDecl = ModelDecl::new("UsernameChangeEvent")
    .extends("Event")
    .fields(&[field("user", EVENT_USER)]);

pub static EVENT_USER_DECL: ModelDecl = ModelDecl::new("EventUser").fields(&[
    field("username", Ty::Str),
    field("url", Ty::Str),
    field("previousUsername", OPT_STR),
]);

pub static EVENT_BEATMAP_DECL: ModelDecl = ModelDecl::new("EventBeatmap")
    .fields(&[field("title", Ty::Str), field("url", Ty::Str)]);

pub static EVENT_BEATMAPSET_DECL: ModelDecl = ModelDecl::new("EventBeatmapset")
    .fields(&[field("title", Ty::Str), field("url", Ty::Str)]);

pub static EVENT_ACHIEVEMENT: ModelDecl = ModelDecl::new("EventAchievement").fields(&[
    field("icon_url", Ty::Str),
    field("id", Ty::Int),
    field("name", Ty::Str),
    field("grouping", Ty::Str),
    field("ordering", Ty::Int),
    field("slug", Ty::Str),
    field("description", Ty::Str),
    field("mode", Ty::Optional(&Ty::Named("GameMode"))),
    field("instructions", OPT_STR),
]);

pub static EVENTS: ModelDecl = ModelDecl::new("Events").fields(&[
    field("cursor", Ty::Optional(&Ty::Named("Cursor"))),
    field("cursor_string", OPT_STR),
    field("events", Ty::List(&Ty::Named("Event"))),
]);

const COMMENT: Ty = Ty::Named("BeatmapsetEventComment");
const COMMENT_NO_POST: Ty = Ty::Named("BeatmapsetEventCommentNoPost");
const COMMENT_CHANGE_STR: Ty = Ty::Named("BeatmapsetEventCommentChangeStr");
const COMMENT_KUDOSU_CHANGE: Ty = Ty::Named("BeatmapsetEventCommentKudosuChange");
const COMMENT_WITH_NOMINATORS_OR_TEXT: Ty = Ty::Union(&[
    Ty::Named("BeatmapsetEventCommentWithNominators"),
    Ty::Str,
]);

// Comments go missing on some events, so every override is optional. Lock, unlock,
// legacy disqualify and nominate_modes are not served and stay unmapped.
static COMMENT_TYPES: OverrideTable = OverrideTable {
    model: "BeatmapsetEvent",
    key: "type",
    attr: "comment",
    types: &[
        (
            "beatmap_owner_change",
            Ty::Optional(&Ty::Named("BeatmapsetEventCommentOwnerChange")),
        ),
        ("discussion_delete", Ty::Optional(&COMMENT_NO_POST)),
        ("discussion_post_delete", Ty::Optional(&COMMENT)),
        ("discussion_post_restore", Ty::Optional(&COMMENT)),
        ("discussion_restore", Ty::Optional(&COMMENT_NO_POST)),
        ("disqualify", Ty::Optional(&COMMENT_WITH_NOMINATORS_OR_TEXT)),
        ("genre_edit", Ty::Optional(&COMMENT_CHANGE_STR)),
        ("issue_reopen", Ty::Optional(&COMMENT)),
        ("issue_resolve", Ty::Optional(&COMMENT)),
        ("kudosu_allow", Ty::Optional(&COMMENT_NO_POST)),
        ("kudosu_deny", Ty::Optional(&COMMENT_NO_POST)),
        ("kudosu_gain", Ty::Optional(&COMMENT_KUDOSU_CHANGE)),
        ("kudosu_lost", Ty::Optional(&COMMENT_KUDOSU_CHANGE)),
        (
            "kudosu_recalculate",
            Ty::Optional(&Ty::Named("BeatmapsetEventCommentKudosuRecalculate")),
        ),
        ("language_edit", Ty::Optional(&COMMENT_CHANGE_STR)),
        ("love", Ty::Optional(&Ty::Null)),
        (
            "nominate",
            Ty::Optional(&Ty::Named("BeatmapsetEventCommentNominate")),
        ),
        ("nomination_reset", Ty::Optional(&COMMENT_WITH_NOMINATORS_OR_TEXT)),
        (
            "nomination_reset_received",
            Ty::Optional(&Ty::Named("BeatmapsetEventCommentWithSourceUser")),
        ),
        ("qualify", Ty::Optional(&Ty::Null)),
        ("rank", Ty::Optional(&Ty::Null)),
        (
            "remove_from_loved",
            Ty::Optional(&Ty::Named("BeatmapsetEventCommentLovedRemoval")),
        ),
        (
            "nsfw_toggle",
            Ty::Optional(&Ty::Named("BeatmapsetEventCommentChangeBool")),
        ),
    ],
};

fn select_comment(payload: &Map<String, Value>, _api: &ApiContext) -> Result<Selection, Error> {
    COMMENT_TYPES.select(payload)
}

pub static BEATMAPSET_EVENT: ModelDecl = ModelDecl::new("BeatmapsetEvent")
    .fields(&[
        field("id", Ty::Int),
        field("type", Ty::Named("BeatmapsetEventType")),
        field("comment", OPT_ANY),
        field("created_at", DATETIME),
        field("user_id", OPT_INT),
        field("beatmapset", Ty::Optional(&Ty::Named("BeatmapsetCompact"))),
        field("discussion", Ty::Optional(&Ty::Named("BeatmapsetDiscussion"))),
    ])
    .relations(&[RelationDecl::foreign("user", EntityKind::User, "user_id")])
    .select(select_comment);

pub static BEATMAPSET_EVENT_COMMENT: ModelDecl = ModelDecl::new("BeatmapsetEventComment")
    .fields(&[
        field("beatmap_discussion_id", Ty::Int),
        field("beatmap_discussion_post_id", Ty::Int),
    ]);

pub static BEATMAPSET_EVENT_COMMENT_NO_POST: ModelDecl =
    ModelDecl::new("BeatmapsetEventCommentNoPost").fields(&[
        field("beatmap_discussion_id", Ty::Int),
        field("beatmap_discussion_post_id", OPT_INT),
    ]);

pub static BEATMAPSET_EVENT_COMMENT_NONE: ModelDecl =
    ModelDecl::new("BeatmapsetEventCommentNone").fields(&[
        field("beatmap_discussion_id", OPT_INT),
        field("beatmap_discussion_post_id", OPT_INT),
    ]);

// Concrete instantiations of the old/new change comment.
pub static BEATMAPSET_EVENT_COMMENT_CHANGE_STR: ModelDecl =
    ModelDecl::new("BeatmapsetEventCommentChangeStr")
        .extends("BeatmapsetEventCommentNone")
        .fields(&[field("old", Ty::Str), field("new", Ty::Str)]);

pub static BEATMAPSET_EVENT_COMMENT_CHANGE_BOOL: ModelDecl =
    ModelDecl::new("BeatmapsetEventCommentChangeBool")
        .extends("BeatmapsetEventCommentNone")
        .fields(&[field("old", Ty::Bool), field("new", Ty::Bool)]);

pub static BEATMAPSET_EVENT_COMMENT_LOVED_REMOVAL: ModelDecl =
    ModelDecl::new("BeatmapsetEventCommentLovedRemoval")
        .extends("BeatmapsetEventCommentNone")
        .fields(&[field("reason", Ty::Str)]);

pub static BEATMAPSET_EVENT_COMMENT_KUDOSU_CHANGE: ModelDecl =
    ModelDecl::new("BeatmapsetEventCommentKudosuChange")
        .extends("BeatmapsetEventCommentNoPost")
        .fields(&[
            field("new_vote", Ty::Named("KudosuVote")),
            field("votes", Ty::List(&Ty::Named("KudosuVote"))),
        ]);

pub static BEATMAPSET_EVENT_COMMENT_KUDOSU_RECALCULATE: ModelDecl =
    ModelDecl::new("BeatmapsetEventCommentKudosuRecalculate")
        .extends("BeatmapsetEventCommentNoPost")
        .fields(&[field("new_vote", Ty::Optional(&Ty::Named("KudosuVote")))]);

pub static BEATMAPSET_EVENT_COMMENT_OWNER_CHANGE: ModelDecl =
    ModelDecl::new("BeatmapsetEventCommentOwnerChange")
        .extends("BeatmapsetEventCommentNone")
        .fields(&[
            field("beatmap_id", Ty::Int),
            field("beatmap_version", Ty::Str),
            field("new_user_id", Ty::Int),
            field("new_user_username", Ty::Str),
            field("new_users", Ty::Optional(&Ty::List(&Ty::Int))),
        ]);

pub static BEATMAPSET_EVENT_COMMENT_NOMINATE: ModelDecl =
    ModelDecl::new("BeatmapsetEventCommentNominate")
        .fields(&[field("modes", Ty::List(&Ty::Named("GameMode")))]);

pub static BEATMAPSET_EVENT_COMMENT_WITH_NOMINATORS: ModelDecl =
    ModelDecl::new("BeatmapsetEventCommentWithNominators")
        .extends("BeatmapsetEventCommentNoPost")
        .fields(&[
            field("beatmap_ids", Ty::Optional(&Ty::List(&Ty::Int))),
            field("nominator_ids", Ty::Optional(&Ty::List(&Ty::Int))),
        ]);

pub static BEATMAPSET_EVENT_COMMENT_WITH_SOURCE_USER: ModelDecl =
    ModelDecl::new("BeatmapsetEventCommentWithSourceUser")
        .extends("BeatmapsetEventCommentNoPost")
        .fields(&[
            field("source_user_id", Ty::Int),
            field("source_user_username", Ty::Str),
        ]);

pub static KUDOSU_VOTE: ModelDecl = ModelDecl::new("KudosuVote")
    .fields(&[field("user_id", Ty::Int), field("score", Ty::Int)]);

pub static KUDOSU_HISTORY: ModelDecl = ModelDecl::new("KudosuHistory").fields(&[
    field("id", Ty::Int),
    field("action", Ty::Named("KudosuAction")),
    field("amount", Ty::Int),
    field("model", Ty::Str),
    field("created_at", DATETIME),
    field("giver", OPT_ANY),
    field("post", Ty::Any),
    field("details", OPT_ANY),
]);

pub static BEATMAPSET_DISCUSSION_POST: ModelDecl = ModelDecl::new("BeatmapsetDiscussionPost")
    .fields(&[
        field("id", Ty::Int),
        field("beatmapset_discussion_id", Ty::Int),
        field("user_id", Ty::Int),
        field("last_editor_id", OPT_INT),
        field("deleted_by_id", OPT_INT),
        field("system", Ty::Bool),
        field("message", Ty::Any),
        field("created_at", DATETIME),
        field("updated_at", DATETIME),
        field("deleted_at", OPT_DATETIME),
    ])
    .relations(&[
        RelationDecl::foreign("user", EntityKind::User, "user_id"),
        RelationDecl::foreign("last_editor", EntityKind::User, "last_editor_id"),
        RelationDecl::foreign("deleted_by", EntityKind::User, "deleted_by_id"),
    ]);

pub static BEATMAPSET_DISCUSSION: ModelDecl = ModelDecl::new("BeatmapsetDiscussion")
    .fields(&[
        field("id", Ty::Int),
        field("beatmapset_id", Ty::Int),
        field("beatmap_id", OPT_INT),
        field("user_id", Ty::Int),
        field("deleted_by_id", OPT_INT),
        field("message_type", Ty::Named("MessageType")),
        field("parent_id", OPT_INT),
        field("timestamp", OPT_INT),
        field("resolved", Ty::Bool),
        field("can_be_resolved", Ty::Bool),
        field("can_grant_kudosu", Ty::Bool),
        field("created_at", DATETIME),
        field("current_user_attributes", OPT_ANY),
        field("updated_at", DATETIME),
        field("deleted_at", OPT_DATETIME),
        field("last_post_at", OPT_DATETIME),
        field("kudosu_denied", Ty::Bool),
        field("starting_post", Ty::Optional(&Ty::Named("BeatmapsetDiscussionPost"))),
        field("posts", Ty::Optional(&Ty::List(&Ty::Named("BeatmapsetDiscussionPost")))),
        field("_beatmap", Ty::Optional(&Ty::Named("BeatmapCompact"))).wire("beatmap"),
        field("_beatmapset", Ty::Optional(&Ty::Named("BeatmapsetCompact"))).wire("beatmapset"),
    ])
    .relations(&[
        RelationDecl::foreign("user", EntityKind::User, "user_id"),
        RelationDecl::foreign("deleted_by", EntityKind::User, "deleted_by_id"),
        RelationDecl::foreign("beatmapset", EntityKind::Beatmapset, "beatmapset_id")
            .embedded("_beatmapset"),
        RelationDecl::foreign("beatmap", EntityKind::Beatmap, "beatmap_id").embedded("_beatmap"),
    ]);

pub static MODDING_HISTORY_EVENTS_BUNDLE: ModelDecl =
    ModelDecl::new("ModdingHistoryEventsBundle").fields(&[
        field("events", Ty::List(&Ty::Named("BeatmapsetEvent"))),
        field("reviewsConfig", OPT_ANY),
        field("users", Ty::List(&Ty::Named("UserCompact"))),
    ]);
