//! Twitch GraphQL documents and persisted-query hashes.

/// Persisted `ChannelShell`: channel identity or the reason it is unavailable.
pub const CHANNEL_SHELL: &str = "ChannelShell";
pub const CHANNEL_SHELL_HASH: &str =
    "580ab410bcd0c1ad194224957ae2241e5d252b2c5173d8e0cce9d32d5bb14efe";

/// Persisted `ViewerCard`: badges a user has earned in a channel.
pub const VIEWER_CARD: &str = "ViewerCard";
pub const VIEWER_CARD_HASH: &str =
    "c02d0aa3e6fdaad9a668f354236e0ded00e338cb742da33bb166e0f34ebf3c3b";

pub const GLOBAL_BADGES: &str = "GlobalBadges";
pub const GLOBAL_BADGES_HASH: &str =
    "9db27e18d61ee393ccfdec8c7d90f14f9a11266298c2e5eb808550b77d7bcdf6";

/// Persisted `UseLive`: resolves a channel login to its ID.
pub const USE_LIVE: &str = "UseLive";
pub const USE_LIVE_HASH: &str = "639d5f11bfb8bf3053b424d9ef650d04c4ebb7d94711d644afb08fe9a0fad5d9";

pub const GET_PINNED_CHAT: &str = "GetPinnedChat";
pub const GET_PINNED_CHAT_HASH: &str =
    "2d099d4c9b6af80a07d8440140c4f3dbb04d516b35c401aab7ce8f60765308d5";

pub const USER_QUERY: &str = "UserQuery";
pub const USER_QUERY_DOCUMENT: &str = r"
query UserQuery($login: String!) {
  user(login: $login) {
    id
    login
    displayName
    description
    createdAt
    updatedAt
    chatColor
    profileViewCount
    profileImageURL(width: 600)
    bannerImageURL
    followers { totalCount }
    follows { totalCount }
    roles {
      isParticipatingDJ
      isPreAffiliate
      isAffiliate
      isPartner
      isStaff
      isSiteAdmin
      isGlobalMod
      isExtensionsDeveloper
    }
    hasTurbo
    primaryTeam { id name displayName backgroundImageURL }
    displayBadges { id setID title description imageURL }
    stream {
      id
      type
      title
      viewersCount
      createdAt
      averageFPS
      bitrate
      broadcasterSoftware
      codec
      height
      width
      game { name id }
    }
    lastBroadcast { id title startedAt game { id name } }
    chatSettings {
      rules
      chatDelayMs
      slowModeDurationSeconds
      isFastSubsModeEnabled
      isUniqueChatModeEnabled
      isEmoteOnlyModeEnabled
      followersOnlyDurationMinutes
      requireVerifiedAccount
      blockLinks
      accountVerificationOptions {
        emailVerificationMode
        partialEmailVerificationConfig {
          minimumAccountAgeInMinutes
          minimumFollowerAgeInMinutes
          shouldRestrictBasedOnAccountAge
          shouldRestrictFirstTimeChatters
          shouldRestrictBasedOnFollowerAge
        }
        phoneVerificationMode
        partialPhoneVerificationConfig {
          minimumAccountAgeInMinutes
          minimumFollowerAgeInMinutes
          shouldRestrictBasedOnAccountAge
          shouldRestrictFirstTimeChatters
          shouldRestrictBasedOnFollowerAge
        }
        isSubscriberExempt
        isVIPExempt
        isModeratorExempt
      }
    }
    panels {
      id
      ... on DefaultPanel { type title imageURL linkURL description altText }
    }
    channel {
      founderBadgeAvailability
      chatters { count }
    }
    settings {
      leaderboard {
        isCheerEnabled
        isSubGiftEnabled
        isClipEnabled
        defaultLeaderboard
        timePeriod
      }
    }
  }
}
";

pub const FOLLOWERS: &str = "Followers";
pub const FOLLOWERS_DOCUMENT: &str = r"
query Followers($login: String!, $after: Cursor) {
  user(login: $login) {
    followers(first: 100, after: $after, order: DESC) {
      totalCount
      edges { cursor followedAt node { login id displayName } }
      pageInfo { endCursor hasNextPage }
    }
  }
}
";

pub const FOLLOWS: &str = "Follows";
pub const FOLLOWS_DOCUMENT: &str = r"
query Follows($login: String!, $after: Cursor) {
  user(login: $login) {
    follows(first: 100, after: $after, order: DESC) {
      totalCount
      edges { followedAt node { login id displayName } }
      pageInfo { endCursor hasNextPage }
    }
  }
}
";

pub const RECENT_FOLLOWS: &str = "RecentFollows";
pub const RECENT_FOLLOWS_DOCUMENT: &str = r"
query RecentFollows($login: String!) {
  user(login: $login) {
    followers(first: 1, order: DESC) { edges { followedAt node { login id displayName } } }
    follows(first: 1, order: DESC) { edges { followedAt node { login id displayName } } }
  }
}
";

pub const FIRST_FOLLOWS: &str = "FirstFollows";
pub const FIRST_FOLLOWS_DOCUMENT: &str = r"
query FirstFollows($login: String!) {
  user(login: $login) {
    followers(first: 1, order: ASC) { edges { followedAt node { login id displayName } } }
    follows(first: 1, order: ASC) { edges { followedAt node { login id displayName } } }
  }
}
";

pub const MODS: &str = "Mods";
pub const MODS_DOCUMENT: &str = r"
query Mods($login: String!, $after: Cursor) {
  user(login: $login) {
    mods(first: 100, after: $after) {
      edges { cursor grantedAt node { id login displayName } }
      pageInfo { hasNextPage endCursor }
    }
  }
}
";

pub const VIPS: &str = "Vips";
pub const VIPS_DOCUMENT: &str = r"
query Vips($login: String!, $after: Cursor) {
  user(login: $login) {
    vips(first: 100, after: $after) {
      edges { cursor grantedAt node { id login displayName } }
      pageInfo { hasNextPage endCursor }
    }
  }
}
";

pub const FOUNDERS: &str = "Founders";
pub const FOUNDERS_DOCUMENT: &str = r"
query Founders($login: String!) {
  user(login: $login, lookupType: ALL) {
    channel {
      founderBadgeAvailability
      founders {
        isSubscribed
        grantedAt: entitlementStart
        node: user { id login displayName }
      }
    }
  }
}
";

pub const CLIP_INFO: &str = "ClipInfo";
pub const CLIP_INFO_DOCUMENT: &str = r"
query ClipInfo($slug: ID!) {
  clip(slug: $slug) {
    id
    slug
    title
    url
    embedURL
    thumbnailURL(width: 480, height: 272)
    createdAt
    durationSeconds
    viewCount
    language
    isPublished
    videoOffsetSeconds
    broadcaster { id login displayName }
    curator { id login displayName }
    game { id name displayName }
    video { id title }
    broadcast { id }
    creationState
    videoQualities { quality frameRate sourceURL width height }
  }
}
";

pub const TEAM_MEMBER_LIST: &str = "TeamLandingMemberList";
pub const TEAM_MEMBER_LIST_DOCUMENT: &str = r"
query TeamLandingMemberList($teamName: String!) {
  team(name: $teamName) {
    members(first: 100) {
      totalCount
      edges { node { login displayName id } }
    }
    owner { login displayName id }
  }
}
";

pub const TEAM_BODY: &str = "TeamsLandingBody";
pub const TEAM_BODY_DOCUMENT: &str = r"
query TeamsLandingBody($teamName: String!) {
  team(name: $teamName) { name displayName id }
}
";

pub const USERNAME_AVAILABLE: &str = "UsernameValidator_User";
pub const USERNAME_AVAILABLE_DOCUMENT: &str = r"
query UsernameValidator_User($username: String!) {
  isUsernameAvailable(username: $username)
}
";

pub const GAME_INFO: &str = "GameInfo";
pub const GAME_INFO_DOCUMENT: &str = r"
query GameInfo($name: String!) {
  game(name: $name) {
    id
    slug
    name
    displayName
    description
    coverURL
    avatarURL(width: 600, height: 600)
    logoURL(width: 600, height: 600)
    popularityScore
    viewersCount
    followersCount
    broadcastersCount
    developers
    franchises
    platforms
    esrbRating
    esrbDescriptions
    igdbURL
    prestoID
    tags(limit: 10, tagType: TOP) { id tagName localizedName isLanguageTag }
  }
}
";
