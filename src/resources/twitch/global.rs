//! Twitch resources that are not tied to a single user: global badges,
//! teams, games, clips and username availability.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::aggregate::{merge, FieldRule, Fragment, OwnershipTable, WriteMode};
use crate::clients::graphql::{GraphqlResponse, Operation, Upstream, Upstreams};
use crate::resources::twitch::channel::ChannelUser;
use crate::resources::twitch::queries::{
    CLIP_INFO, CLIP_INFO_DOCUMENT, GAME_INFO, GAME_INFO_DOCUMENT, GLOBAL_BADGES,
    GLOBAL_BADGES_HASH, TEAM_BODY, TEAM_BODY_DOCUMENT, TEAM_MEMBER_LIST,
    TEAM_MEMBER_LIST_DOCUMENT, USERNAME_AVAILABLE, USERNAME_AVAILABLE_DOCUMENT,
};
use crate::resources::ResourceError;

/// Fetches every global chat badge.
///
/// The upstream envelope is returned as-is, minus `extensions`.
///
/// # Errors
///
/// Returns [`ResourceError::Graphql`] if the request fails.
pub async fn global_badges(upstreams: &Upstreams) -> Result<Value, ResourceError> {
    let op = Operation::persisted(Upstream::Twitch, GLOBAL_BADGES, GLOBAL_BADGES_HASH);
    Ok(upstreams.execute(&op).await?.without_extensions())
}

// ---- team ----

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum TeamField {
    Team,
    Owner,
    Members,
    TotalCount,
}

const MEMBER_LIST: &[&str] = &[TEAM_MEMBER_LIST];
const BODY: &[&str] = &[TEAM_BODY];

static TEAM_RULES: [FieldRule<TeamField>; 4] = [
    FieldRule {
        field: TeamField::Team,
        owners: BODY,
        mode: WriteMode::FirstWins,
    },
    FieldRule {
        field: TeamField::Owner,
        owners: MEMBER_LIST,
        mode: WriteMode::FirstWins,
    },
    FieldRule {
        field: TeamField::Members,
        owners: MEMBER_LIST,
        mode: WriteMode::FirstWins,
    },
    FieldRule {
        field: TeamField::TotalCount,
        owners: MEMBER_LIST,
        mode: WriteMode::FirstWins,
    },
];

static TEAM_OWNERSHIP: OwnershipTable<TeamField> = OwnershipTable::new(&TEAM_RULES);

#[derive(Debug, Default, Deserialize)]
struct TeamData<T> {
    team: Option<T>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MemberList {
    members: Option<Members>,
    owner: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Members {
    total_count: Option<u64>,
    edges: Option<Vec<MemberEdge>>,
}

#[derive(Debug, Default, Deserialize)]
struct MemberEdge {
    node: Option<Value>,
}

/// Team identity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamBody {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub id: Option<String>,
}

/// The `/twitch/Team` response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub total_count: u64,
    pub team: Option<TeamBody>,
    pub owner: Option<ChannelUser>,
    pub members: Vec<ChannelUser>,
}

/// Fetches a team, its owner and its members.
///
/// # Errors
///
/// - [`ResourceError::NotFound`] if the team does not exist
/// - [`ResourceError::Graphql`] if either operation fails
pub async fn team(upstreams: &Upstreams, name: &str) -> Result<Team, ResourceError> {
    let variables = json!({ "teamName": name });
    let ops = [
        Operation::query(Upstream::Twitch, TEAM_MEMBER_LIST_DOCUMENT)
            .named(TEAM_MEMBER_LIST)
            .variables(variables.clone()),
        Operation::query(Upstream::Twitch, TEAM_BODY_DOCUMENT)
            .named(TEAM_BODY)
            .variables(variables),
    ];
    let replies = upstreams.execute_all(&ops).await?;
    assemble_team(&ops, &replies)
}

fn assemble_team(ops: &[Operation; 2], replies: &[GraphqlResponse]) -> Result<Team, ResourceError> {
    let [list_op, body_op] = ops;
    let [list, body] = replies else {
        return Err(ResourceError::EmptyResponse {
            message: "Twitch returned an unexpected number of replies",
        });
    };

    let list: TeamData<MemberList> = list.data_as(list_op)?;
    let body: TeamData<Value> = body.data_as(body_op)?;

    let mut list_fragment = Fragment::new(TEAM_MEMBER_LIST);
    if let Some(team) = list.team {
        let members = team.members.unwrap_or_default();
        let nodes: Vec<Value> = members
            .edges
            .unwrap_or_default()
            .into_iter()
            .filter_map(|edge| edge.node)
            .collect();
        list_fragment = list_fragment
            .set(TeamField::TotalCount, members.total_count)
            .set(TeamField::Members, nodes)
            .set(TeamField::Owner, team.owner);
    }

    let body_fragment = Fragment::new(TEAM_BODY)
        .entity(body.team.is_some())
        .set(TeamField::Team, body.team);

    let mut record = merge(vec![list_fragment, body_fragment], &TEAM_OWNERSHIP, TEAM_BODY)
        .map_err(|_| ResourceError::not_found("Team not found"))?;

    Ok(Team {
        total_count: record.take(&TeamField::TotalCount).unwrap_or(0),
        team: record.take(&TeamField::Team),
        owner: record.take(&TeamField::Owner),
        members: record.take(&TeamField::Members).unwrap_or_default(),
    })
}

// ---- username ----

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsernameData {
    is_username_available: Option<bool>,
}

/// The `/twitch/UsernameAvailable` response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UsernameAvailability {
    pub username: String,
    pub available: Option<bool>,
}

/// Checks whether a username can be registered.
///
/// # Errors
///
/// Returns [`ResourceError::Graphql`] if the request fails.
pub async fn username_available(
    upstreams: &Upstreams,
    username: &str,
) -> Result<UsernameAvailability, ResourceError> {
    let op = Operation::query(Upstream::Twitch, USERNAME_AVAILABLE_DOCUMENT)
        .named(USERNAME_AVAILABLE)
        .variables(json!({ "username": username }));
    let data: UsernameData = upstreams.execute(&op).await?.data_as(&op)?;

    Ok(UsernameAvailability {
        username: username.to_string(),
        available: data.is_username_available,
    })
}

// ---- game ----

#[derive(Debug, Default, Deserialize)]
struct GameData {
    game: Option<Game>,
}

/// The `/twitch/GameInfo` response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: Option<String>,
    pub slug: Option<String>,
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "coverURL")]
    pub cover_url: Option<String>,
    #[serde(rename = "avatarURL")]
    pub avatar_url: Option<String>,
    #[serde(rename = "logoURL")]
    pub logo_url: Option<String>,
    pub popularity_score: Option<i64>,
    pub viewers_count: Option<u64>,
    pub followers_count: Option<u64>,
    pub broadcasters_count: Option<u64>,
    pub developers: Option<Value>,
    pub franchises: Option<Value>,
    pub platforms: Option<Value>,
    pub esrb_rating: Option<Value>,
    pub esrb_descriptions: Option<Value>,
    #[serde(rename = "igdbURL")]
    pub igdb_url: Option<String>,
    #[serde(rename = "prestoID")]
    pub presto_id: Option<String>,
    /// Empty when the game has no tags.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Fetches a game by name.
///
/// # Errors
///
/// - [`ResourceError::NotFound`] if no game has that name
/// - [`ResourceError::Graphql`] if the request fails
pub async fn game_info(upstreams: &Upstreams, name: &str) -> Result<Game, ResourceError> {
    let op = Operation::query(Upstream::Twitch, GAME_INFO_DOCUMENT)
        .named(GAME_INFO)
        .variables(json!({ "name": name }));
    let data: GameData = upstreams.execute(&op).await?.data_as(&op)?;
    data.game
        .ok_or_else(|| ResourceError::not_found("Game not found"))
}

// ---- clip ----

#[derive(Debug, Default, Deserialize)]
struct ClipData {
    clip: Option<Value>,
}

/// Fetches a clip by slug. The clip object is returned verbatim.
///
/// # Errors
///
/// - [`ResourceError::NotFound`] if no clip has that slug
/// - [`ResourceError::Graphql`] if the request fails
pub async fn clip_info(upstreams: &Upstreams, slug: &str) -> Result<Value, ResourceError> {
    let op = Operation::query(Upstream::Twitch, CLIP_INFO_DOCUMENT)
        .named(CLIP_INFO)
        .variables(json!({ "slug": slug }));
    let data: ClipData = upstreams.execute(&op).await?.data_as(&op)?;
    data.clip
        .filter(|clip| !clip.is_null())
        .ok_or_else(|| ResourceError::not_found("Clip not found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(body: Value) -> GraphqlResponse {
        serde_json::from_value(body).unwrap()
    }

    fn team_ops() -> [Operation; 2] {
        [
            Operation::query(Upstream::Twitch, TEAM_MEMBER_LIST_DOCUMENT).named(TEAM_MEMBER_LIST),
            Operation::query(Upstream::Twitch, TEAM_BODY_DOCUMENT).named(TEAM_BODY),
        ]
    }

    #[test]
    fn test_team_merges_member_list_and_body() {
        let replies = [
            reply(json!({ "data": { "team": {
                "members": {
                    "totalCount": 2,
                    "edges": [
                        { "node": { "login": "a", "displayName": "A", "id": "1" } },
                        { "node": null },
                        { "node": { "login": "b", "displayName": "B", "id": "2" } }
                    ]
                },
                "owner": { "login": "boss", "displayName": "Boss", "id": "0" }
            } } })),
            reply(json!({ "data": { "team": {
                "name": "otk", "displayName": "OTK", "id": "t1"
            } } })),
        ];

        let team = assemble_team(&team_ops(), &replies).unwrap();
        assert_eq!(team.total_count, 2);
        assert_eq!(team.members.len(), 2);
        assert_eq!(team.owner.unwrap().login.as_deref(), Some("boss"));
        assert_eq!(team.team.unwrap().display_name.as_deref(), Some("OTK"));
    }

    #[test]
    fn test_team_passes_member_payloads_through_untouched() {
        let replies = [
            reply(json!({ "data": { "team": {
                "members": { "edges": [{ "node": { "login": "solo" } }] },
                "owner": null
            } } })),
            reply(json!({ "data": { "team": { "name": "duo" } } })),
        ];

        let team = assemble_team(&team_ops(), &replies).unwrap();
        assert_eq!(team.total_count, 0);
        assert!(team.owner.is_none());
        assert_eq!(
            team.members,
            vec![ChannelUser {
                id: None,
                login: Some("solo".to_string()),
                display_name: None,
            }]
        );
        assert_eq!(team.team.unwrap().name.as_deref(), Some("duo"));
    }

    #[test]
    fn test_missing_team_is_not_found() {
        let replies = [
            reply(json!({ "data": { "team": null } })),
            reply(json!({ "data": { "team": null } })),
        ];

        assert!(matches!(
            assemble_team(&team_ops(), &replies),
            Err(ResourceError::NotFound { ref message }) if message == "Team not found"
        ));
    }

    #[test]
    fn test_game_tags_default_to_empty() {
        let game: Game = serde_json::from_value(json!({
            "id": "33214",
            "name": "Fortnite",
            "coverURL": "https://example.com/cover.jpg",
            "tags": null
        }))
        .unwrap();

        assert!(game.tags.is_empty());
        let body = serde_json::to_value(&game).unwrap();
        assert_eq!(body["coverURL"], "https://example.com/cover.jpg");
        assert_eq!(body["tags"], json!([]));
        assert!(body["igdbURL"].is_null());
    }
}
