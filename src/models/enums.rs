//! Purpose: Enumerations and flag sets of the osu! API v2.
//! Exports: One `EnumDecl`/`FlagsDecl` static per provider enumeration.
//! Role: Leaf declarations referenced by name from model fields.
//! Invariants: Raw values are the exact wire scalars; member names are stable identifiers.
use crate::core::scalar::{EnumDecl, EnumMember, EnumRepr, FlagDecl, FlagsDecl};

pub static GAME_MODE: EnumDecl = EnumDecl {
    name: "GameMode",
    repr: EnumRepr::Str,
    members: &[
        EnumMember::str("Osu", "osu"),
        EnumMember::str("Taiko", "taiko"),
        EnumMember::str("Catch", "fruits"),
        EnumMember::str("Mania", "mania"),
    ],
};

pub static RANK_STATUS: EnumDecl = EnumDecl {
    name: "RankStatus",
    repr: EnumRepr::Int,
    members: &[
        EnumMember::int("Graveyard", -2).alias("graveyard"),
        EnumMember::int("Wip", -1).alias("wip"),
        EnumMember::int("Pending", 0).alias("pending"),
        EnumMember::int("Ranked", 1).alias("ranked"),
        EnumMember::int("Approved", 2).alias("approved"),
        EnumMember::int("Qualified", 3).alias("qualified"),
        EnumMember::int("Loved", 4).alias("loved"),
    ],
};

pub static GRADE: EnumDecl = EnumDecl {
    name: "Grade",
    repr: EnumRepr::Str,
    members: &[
        EnumMember::str("SsSilver", "XH"),
        EnumMember::str("Ss", "X"),
        EnumMember::str("SSilver", "SH"),
        EnumMember::str("S", "S"),
        EnumMember::str("A", "A"),
        EnumMember::str("B", "B"),
        EnumMember::str("C", "C"),
        EnumMember::str("D", "D"),
        EnumMember::str("F", "F"),
    ],
};

pub static EVENT_TYPE: EnumDecl = EnumDecl {
    name: "EventType",
    repr: EnumRepr::Str,
    members: &[
        EnumMember::str("Achievement", "achievement"),
        EnumMember::str("BeatmapPlaycount", "beatmapPlaycount"),
        EnumMember::str("BeatmapsetApprove", "beatmapsetApprove"),
        EnumMember::str("BeatmapsetDelete", "beatmapsetDelete"),
        EnumMember::str("BeatmapsetRevive", "beatmapsetRevive"),
        EnumMember::str("BeatmapsetUpdate", "beatmapsetUpdate"),
        EnumMember::str("BeatmapsetUpload", "beatmapsetUpload"),
        EnumMember::str("Rank", "rank"),
        EnumMember::str("RankLost", "rankLost"),
        EnumMember::str("UserSupportFirst", "userSupportFirst"),
        EnumMember::str("UserSupportAgain", "userSupportAgain"),
        EnumMember::str("UserSupportGift", "userSupportGift"),
        EnumMember::str("UsernameChange", "usernameChange"),
    ],
};

pub static BEATMAPSET_EVENT_TYPE: EnumDecl = EnumDecl {
    name: "BeatmapsetEventType",
    repr: EnumRepr::Str,
    members: &[
        EnumMember::str("BeatmapOwnerChange", "beatmap_owner_change"),
        EnumMember::str("DiscussionDelete", "discussion_delete"),
        EnumMember::str("DiscussionLock", "discussion_lock"),
        EnumMember::str("DiscussionPostDelete", "discussion_post_delete"),
        EnumMember::str("DiscussionPostRestore", "discussion_post_restore"),
        EnumMember::str("DiscussionRestore", "discussion_restore"),
        EnumMember::str("DiscussionUnlock", "discussion_unlock"),
        EnumMember::str("Disqualify", "disqualify"),
        EnumMember::str("DisqualifyLegacy", "disqualify_legacy"),
        EnumMember::str("GenreEdit", "genre_edit"),
        EnumMember::str("IssueReopen", "issue_reopen"),
        EnumMember::str("IssueResolve", "issue_resolve"),
        EnumMember::str("KudosuAllow", "kudosu_allow"),
        EnumMember::str("KudosuDeny", "kudosu_deny"),
        EnumMember::str("KudosuGain", "kudosu_gain"),
        EnumMember::str("KudosuLost", "kudosu_lost"),
        EnumMember::str("KudosuRecalculate", "kudosu_recalculate"),
        EnumMember::str("LanguageEdit", "language_edit"),
        EnumMember::str("Love", "love"),
        EnumMember::str("Nominate", "nominate"),
        EnumMember::str("NominateModes", "nominate_modes"),
        EnumMember::str("NominationReset", "nomination_reset"),
        EnumMember::str("NominationResetReceived", "nomination_reset_received"),
        EnumMember::str("NsfwToggle", "nsfw_toggle"),
        EnumMember::str("Qualify", "qualify"),
        EnumMember::str("Rank", "rank"),
        EnumMember::str("RemoveFromLoved", "remove_from_loved"),
    ],
};

pub static BEATMAPSET_APPROVAL: EnumDecl = EnumDecl {
    name: "BeatmapsetApproval",
    repr: EnumRepr::Str,
    members: &[
        EnumMember::str("Ranked", "ranked"),
        EnumMember::str("Approved", "approved"),
        EnumMember::str("Qualified", "qualified"),
        EnumMember::str("Loved", "loved"),
    ],
};

pub static MESSAGE_TYPE: EnumDecl = EnumDecl {
    name: "MessageType",
    repr: EnumRepr::Str,
    members: &[
        EnumMember::str("Hype", "hype"),
        EnumMember::str("MapperNote", "mapper_note"),
        EnumMember::str("Praise", "praise"),
        EnumMember::str("Problem", "problem"),
        EnumMember::str("Review", "review"),
        EnumMember::str("Suggestion", "suggestion"),
    ],
};

pub static ROOM_TYPE: EnumDecl = EnumDecl {
    name: "RoomType",
    repr: EnumRepr::Str,
    members: &[
        EnumMember::str("Playlists", "playlists"),
        EnumMember::str("HeadToHead", "head_to_head"),
        EnumMember::str("TeamVersus", "team_versus"),
    ],
};

pub static ROOM_CATEGORY: EnumDecl = EnumDecl {
    name: "RoomCategory",
    repr: EnumRepr::Str,
    members: &[
        EnumMember::str("Normal", "normal"),
        EnumMember::str("Spotlight", "spotlight"),
        EnumMember::str("FeaturedArtist", "featured_artist"),
        EnumMember::str("DailyChallenge", "daily_challenge"),
    ],
};

pub static USER_RELATION_TYPE: EnumDecl = EnumDecl {
    name: "UserRelationType",
    repr: EnumRepr::Str,
    members: &[
        EnumMember::str("Friend", "friend"),
        EnumMember::str("Block", "block"),
    ],
};

pub static KUDOSU_ACTION: EnumDecl = EnumDecl {
    name: "KudosuAction",
    repr: EnumRepr::Str,
    members: &[
        EnumMember::str("Give", "give"),
        EnumMember::str("VoteGive", "vote.give"),
        EnumMember::str("Reset", "reset"),
        EnumMember::str("VoteReset", "vote.reset"),
        EnumMember::str("Revoke", "revoke"),
        EnumMember::str("VoteRevoke", "vote.revoke"),
        EnumMember::str("RecalculateGive", "recalculate.give"),
        EnumMember::str("RecalculateReset", "recalculate.reset"),
    ],
};

/// Legacy mod bitset. `NM` is the empty set and never matches a bit.
pub static MOD: FlagsDecl = FlagsDecl {
    name: "Mod",
    flags: &[
        FlagDecl::new("NM", 0),
        FlagDecl::new("NF", 1 << 0),
        FlagDecl::new("EZ", 1 << 1),
        FlagDecl::new("TD", 1 << 2),
        FlagDecl::new("HD", 1 << 3),
        FlagDecl::new("HR", 1 << 4),
        FlagDecl::new("SD", 1 << 5),
        FlagDecl::new("DT", 1 << 6),
        FlagDecl::new("RX", 1 << 7),
        FlagDecl::new("HT", 1 << 8),
        FlagDecl::new("NC", 1 << 9),
        FlagDecl::new("FL", 1 << 10),
        FlagDecl::new("AT", 1 << 11),
        FlagDecl::new("SO", 1 << 12),
        FlagDecl::new("AP", 1 << 13),
        FlagDecl::new("PF", 1 << 14),
        FlagDecl::new("4K", 1 << 15),
        FlagDecl::new("5K", 1 << 16),
        FlagDecl::new("6K", 1 << 17),
        FlagDecl::new("7K", 1 << 18),
        FlagDecl::new("8K", 1 << 19),
        FlagDecl::new("FI", 1 << 20),
        FlagDecl::new("RD", 1 << 21),
        FlagDecl::new("CN", 1 << 22),
        FlagDecl::new("TP", 1 << 23),
        FlagDecl::new("9K", 1 << 24),
        FlagDecl::new("CO", 1 << 25),
        FlagDecl::new("1K", 1 << 26),
        FlagDecl::new("3K", 1 << 27),
        FlagDecl::new("2K", 1 << 28),
        FlagDecl::new("V2", 1 << 29),
        FlagDecl::new("MR", 1 << 30),
    ],
};
