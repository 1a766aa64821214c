//! Purpose: Comments, forums, changelog, news, wiki and search models.
//! Exports: One `ModelDecl` static per model.
//! Role: Declarations only. `Forum`, `Build` and `NewsPost` are self or mutually recursive.
use super::{DATETIME, OPT_DATETIME, OPT_INT, OPT_STR};
use crate::core::plan::{ModelDecl, field};
use crate::core::relation::{EntityKind, RelationDecl};
use crate::core::types::Ty;

pub static COMMENT: ModelDecl = ModelDecl::new("Comment")
    .fields(&[
        field("commentable_id", OPT_INT),
        field("commentable_type", OPT_STR),
        field("created_at", DATETIME),
        field("deleted_at", OPT_DATETIME),
        field("edited_at", OPT_DATETIME),
        field("edited_by_id", OPT_INT),
        field("id", Ty::Int),
        field("legacy_name", OPT_STR),
        field("message", OPT_STR),
        field("message_html", OPT_STR),
        field("parent_id", OPT_INT),
        field("pinned", Ty::Bool),
        field("replies_count", Ty::Int),
        field("updated_at", DATETIME),
        field("user_id", OPT_INT),
        field("votes_count", Ty::Int),
    ])
    .relations(&[
        RelationDecl::foreign("user", EntityKind::User, "user_id"),
        RelationDecl::foreign("edited_by", EntityKind::User, "edited_by_id"),
    ]);

pub static COMMENTABLE_META: ModelDecl = ModelDecl::new("CommentableMeta").fields(&[
    field("id", OPT_INT),
    field("title", Ty::Str),
    field("type", OPT_STR),
    field("url", OPT_STR),
    field("owner_id", OPT_INT),
    field("owner_title", OPT_STR),
    field("current_user_attributes", Ty::Optional(&Ty::Map(&Ty::Optional(&Ty::Str)))),
]);

pub static COMMENT_BUNDLE: ModelDecl = ModelDecl::new("CommentBundle").fields(&[
    field("commentable_meta", Ty::List(&Ty::Named("CommentableMeta"))),
    field("comments", Ty::List(&Ty::Named("Comment"))),
    field("cursor", Ty::Optional(&Ty::Named("Cursor"))),
    field("has_more", Ty::Bool),
    field("has_more_id", OPT_INT),
    field("included_comments", Ty::List(&Ty::Named("Comment"))),
    field("pinned_comments", Ty::Optional(&Ty::List(&Ty::Named("Comment")))),
    field("sort", Ty::Str),
    field("top_level_count", OPT_INT),
    field("total", OPT_INT),
    field("user_follow", Ty::Bool),
    field("user_votes", Ty::List(&Ty::Int)),
    field("users", Ty::List(&Ty::Named("UserCompact"))),
]);

pub static FORUM: ModelDecl = ModelDecl::new("Forum").fields(&[
    field("id", Ty::Int),
    field("name", Ty::Str),
    field("description", Ty::Str),
    field("subforums", Ty::Optional(&Ty::List(&Ty::Named("Forum")))),
]);

pub static FORUMS: ModelDecl =
    ModelDecl::new("Forums").fields(&[field("forums", Ty::List(&Ty::Named("Forum")))]);

pub static BUILD: ModelDecl = ModelDecl::new("Build").fields(&[
    field("created_at", DATETIME),
    field("display_version", Ty::Str),
    field("id", Ty::Int),
    field("update_stream", Ty::Optional(&Ty::Named("UpdateStream"))),
    field("users", Ty::Int),
    field("version", OPT_STR),
    field("changelog_entries", Ty::Optional(&Ty::List(&Ty::Named("ChangelogEntry")))),
    field("versions", Ty::Optional(&Ty::Named("Versions"))),
    field("youtube_id", OPT_STR),
]);

pub static VERSIONS: ModelDecl = ModelDecl::new("Versions").fields(&[
    field("next", Ty::Optional(&Ty::Named("Build"))),
    field("previous", Ty::Optional(&Ty::Named("Build"))),
]);

pub static UPDATE_STREAM: ModelDecl = ModelDecl::new("UpdateStream").fields(&[
    field("display_name", OPT_STR),
    field("id", Ty::Int),
    field("is_featured", Ty::Bool),
    field("name", Ty::Str),
    field("latest_build", Ty::Optional(&Ty::Named("Build"))),
    field("user_count", OPT_INT),
]);

pub static CHANGELOG_ENTRY: ModelDecl = ModelDecl::new("ChangelogEntry").fields(&[
    field("category", Ty::Str),
    field("created_at", OPT_DATETIME),
    field("github_pull_request_id", OPT_INT),
    field("github_url", OPT_STR),
    field("id", OPT_INT),
    field("major", Ty::Bool),
    field("message", OPT_STR),
    field("message_html", OPT_STR),
    field("repository", OPT_STR),
    field("title", OPT_STR),
    field("type", Ty::Str),
    field("url", OPT_STR),
    field("github_user", Ty::Named("GithubUser")),
]);

pub static GITHUB_USER: ModelDecl = ModelDecl::new("GithubUser").fields(&[
    field("display_name", Ty::Str),
    field("github_url", OPT_STR),
    field("id", OPT_INT),
    field("osu_username", OPT_STR),
    field("user_id", OPT_INT),
    field("user_url", OPT_STR),
]);

pub static NEWS_POST: ModelDecl = ModelDecl::new("NewsPost").fields(&[
    field("author", Ty::Str),
    field("edit_url", Ty::Str),
    field("first_image", OPT_STR),
    field("first_image_2x", OPT_STR).wire("first_image@2x"),
    field("id", Ty::Int),
    field("published_at", DATETIME),
    field("slug", Ty::Str),
    field("title", Ty::Str),
    field("updated_at", DATETIME),
    field("content", OPT_STR),
    field("navigation", Ty::Optional(&Ty::Named("NewsNavigation"))),
    field("preview", OPT_STR),
]);

pub static NEWS_NAVIGATION: ModelDecl = ModelDecl::new("NewsNavigation").fields(&[
    field("newer", Ty::Optional(&Ty::Named("NewsPost"))),
    field("older", Ty::Optional(&Ty::Named("NewsPost"))),
]);

pub static WIKI_PAGE: ModelDecl = ModelDecl::new("WikiPage").fields(&[
    field("layout", Ty::Str),
    field("locale", Ty::Str),
    field("markdown", Ty::Str),
    field("path", Ty::Str),
    field("subtitle", OPT_STR),
    field("tags", Ty::List(&Ty::Str)),
    field("title", Ty::Str),
    field("available_locales", Ty::List(&Ty::Str)),
]);

// Concrete instantiations of the generic search result page.
pub static USER_SEARCH_RESULT: ModelDecl = ModelDecl::new("UserSearchResult").fields(&[
    field("data", Ty::List(&Ty::Named("UserCompact"))),
    field("total", Ty::Int),
]);

pub static WIKI_PAGE_SEARCH_RESULT: ModelDecl = ModelDecl::new("WikiPageSearchResult").fields(&[
    field("data", Ty::List(&Ty::Named("WikiPage"))),
    field("total", Ty::Int),
]);

pub static SEARCH: ModelDecl = ModelDecl::new("Search").fields(&[
    field("users", Ty::Optional(&Ty::Named("UserSearchResult"))).wire("user"),
    field("wiki_pages", Ty::Optional(&Ty::Named("WikiPageSearchResult"))).wire("wiki_page"),
]);

pub static SPOTLIGHT: ModelDecl = ModelDecl::new("Spotlight").fields(&[
    field("end_date", DATETIME),
    field("id", Ty::Int),
    field("mode_specific", Ty::Bool),
    field("participant_count", OPT_INT),
    field("name", Ty::Str),
    field("start_date", DATETIME),
    field("type", Ty::Str),
]);

pub static SPOTLIGHTS: ModelDecl = ModelDecl::new("Spotlights")
    .fields(&[field("spotlights", Ty::List(&Ty::Named("Spotlight")))]);
