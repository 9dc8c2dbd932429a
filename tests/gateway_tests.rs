//! End-to-end tests: HTTP request in, mocked upstream GraphQL behind.

use std::ops::Range;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use gql_gateway::server::Gateway;
use gql_gateway::{app, AppState, ClientId, EndpointUrl, GatewayConfig, Upstreams};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway(server: &MockServer) -> Gateway {
    let config = GatewayConfig::builder()
        .twitch_client_id(ClientId::new("test-client-id").unwrap())
        .twitch_endpoint(EndpointUrl::new(format!("{}/twitch", server.uri())).unwrap())
        .seventv_endpoint(EndpointUrl::new(format!("{}/7tv", server.uri())).unwrap())
        .build()
        .unwrap();
    app(AppState::new(Upstreams::from_config(&config).unwrap()))
}

async fn get(gateway: &Gateway, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = gateway.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn mount_operation(server: &MockServer, upstream: &str, name: &str, reply: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(format!("/{upstream}")))
        .and(body_partial_json(json!({ "operationName": name })))
        .respond_with(reply)
        .mount(server)
        .await;
}

fn ok(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

// ---- Twitch user info ----

fn user_query_reply() -> Value {
    json!({ "data": { "user": {
        "id": "22484632",
        "login": "forsen",
        "displayName": "forsen",
        "followers": { "totalCount": 1_700_000 },
        "follows": { "totalCount": 12 },
        "roles": { "isPartner": true },
        "hasTurbo": false,
        "displayBadges": [],
        "panels": [],
        "channel": { "founderBadgeAvailability": 0, "chatters": { "count": 1000 } },
        "settings": { "leaderboard": null }
    } } })
}

async fn mount_user_info(server: &MockServer, delays_ms: [u64; 3]) {
    let [shell, profile, card] = delays_ms;
    mount_operation(
        server,
        "twitch",
        "ChannelShell",
        ok(json!({ "data": { "userOrError": {
            "__typename": "User", "id": "22484632", "login": "forsen", "displayName": "Forsen"
        } } }))
        .set_delay(Duration::from_millis(shell)),
    )
    .await;
    mount_operation(
        server,
        "twitch",
        "UserQuery",
        ok(user_query_reply()).set_delay(Duration::from_millis(profile)),
    )
    .await;
    // Persisted replies may come back wrapped in an array.
    mount_operation(
        server,
        "twitch",
        "ViewerCard",
        ok(json!([{ "data": { "channelViewer": { "earnedBadges": [
            { "setID": "turbo" }, { "setID": "ambassador" }
        ] } } }]))
        .set_delay(Duration::from_millis(card)),
    )
    .await;
}

#[tokio::test]
async fn test_user_info_merge_is_independent_of_completion_order() {
    let mut bodies = Vec::new();
    for delays in [[150, 0, 75], [0, 150, 75], [75, 0, 150]] {
        let server = MockServer::start().await;
        mount_user_info(&server, delays).await;

        let (status, body) = get(&gateway(&server), "/twitch/userinfo?login=forsen").await;
        assert_eq!(status, StatusCode::OK);
        bodies.push(body);
    }

    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[1], bodies[2]);

    let body = &bodies[0];
    assert_eq!(body["banned"], false);
    assert!(body.get("banReason").is_none());
    assert_eq!(body["displayName"], "forsen");
    assert_eq!(body["followers"], 1_700_000);
    assert_eq!(body["badges"], 2);
    assert_eq!(body["roles"]["hasTurbo"], true);
    assert_eq!(body["roles"]["isAmbassador"], true);
    assert_eq!(body["roles"]["hasPrime"], false);
    assert_eq!(body["roles"]["isPartner"], true);
}

#[tokio::test]
async fn test_suspended_user_reports_ban_with_identity() {
    let server = MockServer::start().await;
    mount_operation(
        &server,
        "twitch",
        "ChannelShell",
        ok(json!({ "data": { "userOrError": {
            "__typename": "UserDoesNotExist", "key": "banned_user", "reason": "TOS_TEMPORARY"
        } } })),
    )
    .await;
    mount_operation(&server, "twitch", "UserQuery", ok(json!({ "data": { "user": null } }))).await;
    mount_operation(
        &server,
        "twitch",
        "ViewerCard",
        ok(json!({ "data": { "channelViewer": null } })),
    )
    .await;

    let (status, body) = get(&gateway(&server), "/twitch/UserInfo?login=banned_user").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["banned"], true);
    assert_eq!(body["banReason"], "TOS_TEMPORARY");
    assert_eq!(body["badges"], 0);
}

#[tokio::test]
async fn test_unknown_user_is_404() {
    let server = MockServer::start().await;
    mount_operation(
        &server,
        "twitch",
        "ChannelShell",
        ok(json!({ "data": { "userOrError": { "__typename": "UserDoesNotExist", "reason": "UNKNOWN" } } })),
    )
    .await;
    mount_operation(&server, "twitch", "UserQuery", ok(json!({ "data": { "user": null } }))).await;
    mount_operation(&server, "twitch", "ViewerCard", ok(json!({ "data": null }))).await;

    let (status, body) = get(&gateway(&server), "/twitch/userinfo?login=nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "User not found" }));
}

#[tokio::test]
async fn test_user_info_fails_whole_when_one_operation_fails() {
    let server = MockServer::start().await;
    mount_user_info(&server, [0, 0, 0]).await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "operationName": "ViewerCard" })))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .with_priority(1)
        .mount(&server)
        .await;

    let (status, body) = get(&gateway(&server), "/twitch/userinfo?login=forsen").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "error": "Twitch request failed", "details": { "raw_body": "upstream down" } })
    );
}

// ---- validation & routing ----

#[tokio::test]
async fn test_missing_parameters_are_rejected_without_upstream_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ok(json!({ "data": {} })))
        .expect(0)
        .mount(&server)
        .await;
    let gateway = gateway(&server);

    let cases = [
        ("/twitch/userinfo", "Missing ?login="),
        ("/twitch/userfollowers?login=", "Missing ?login="),
        ("/twitch/userbadges?login=forsen", "Missing ?login= or ?channel="),
        ("/twitch/team", "Missing ?team="),
        ("/twitch/gameinfo", "Missing ?name="),
        ("/twitch/clipinfo", "Missing ?slug="),
        ("/twitch/usernameavailable", "Missing ?username="),
        ("/7tv/userroles", "Missing ?login="),
    ];
    for (uri, message) in cases {
        let (status, body) = get(&gateway, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body, json!({ "error": message }), "{uri}");
    }
}

#[tokio::test]
async fn test_routes_match_case_insensitively() {
    let server = MockServer::start().await;
    mount_operation(
        &server,
        "twitch",
        "GameInfo",
        ok(json!({ "data": { "game": { "id": "33214", "name": "Fortnite", "tags": null } } })),
    )
    .await;
    let gateway = gateway(&server);

    for uri in ["/twitch/GameInfo?name=Fortnite", "/TWITCH/gameinfo?name=Fortnite"] {
        let (status, body) = get(&gateway, uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body["name"], "Fortnite");
        assert_eq!(body["tags"], json!([]));
    }
}

#[tokio::test]
async fn test_values_are_sent_as_variables() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/twitch"))
        .and(header("Client-ID", "test-client-id"))
        .and(body_partial_json(json!({
            "operationName": "GameInfo",
            "variables": { "name": "Half-Life \"2\"" }
        })))
        .respond_with(ok(json!({ "data": { "game": null } })))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = get(
        &gateway(&server),
        "/twitch/gameinfo?name=Half-Life%20%222%22",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Game not found" }));
}

// ---- followers ----

fn follower_page(range: Range<usize>, total: usize, has_next: bool) -> Value {
    let edges: Vec<Value> = range
        .clone()
        .map(|i| {
            json!({
                "cursor": format!("c{i}"),
                "followedAt": "2024-01-01T00:00:00Z",
                "node": { "id": i.to_string(), "login": format!("user{i}"), "displayName": format!("User{i}") }
            })
        })
        .collect();
    json!({ "data": { "user": { "followers": {
        "totalCount": total,
        "edges": edges,
        "pageInfo": { "endCursor": format!("c{}", range.end - 1), "hasNextPage": has_next }
    } } } })
}

async fn mount_followers_page(server: &MockServer, after: Value, body: Value) {
    Mock::given(method("POST"))
        .and(path("/twitch"))
        .and(body_partial_json(json!({
            "operationName": "Followers",
            "variables": { "after": after }
        })))
        .respond_with(ok(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_followers_stop_at_upstream_exhaustion_below_limit() {
    let server = MockServer::start().await;
    mount_followers_page(&server, Value::Null, follower_page(0..100, 120, true)).await;
    mount_followers_page(&server, json!("c99"), follower_page(100..120, 120, false)).await;

    let (status, body) = get(&gateway(&server), "/twitch/userfollowers?login=forsen&limit=150").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalCount"], 120);
    assert_eq!(body["count"], 120);
    assert_eq!(body["truncated"], false);
    assert!(body.get("cursor").is_none());
    assert_eq!(body["followers"][119]["login"], "user119");
}

#[tokio::test]
async fn test_followers_truncate_and_resume_without_gaps() {
    let server = MockServer::start().await;
    mount_followers_page(&server, Value::Null, follower_page(0..100, 300, true)).await;
    mount_followers_page(&server, json!("c49"), follower_page(50..150, 300, true)).await;
    let gateway = gateway(&server);

    let (status, first) = get(&gateway, "/twitch/userfollowers?login=forsen&limit=50").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["count"], 50);
    assert_eq!(first["truncated"], true);
    assert_eq!(first["cursor"], "c49");

    let (status, second) =
        get(&gateway, "/twitch/userfollowers?login=forsen&limit=50&cursor=c49").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["followers"][0]["login"], "user50");
    assert_eq!(second["cursor"], "c99");
}

#[tokio::test]
async fn test_followers_default_limit_and_invalid_limit() {
    let server = MockServer::start().await;
    mount_followers_page(&server, Value::Null, follower_page(0..100, 500, true)).await;
    let gateway = gateway(&server);

    let (status, body) = get(&gateway, "/twitch/userfollowers?login=forsen").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 100);
    assert_eq!(body["truncated"], true);

    let (status, body) = get(&gateway, "/twitch/userfollowers?login=forsen&limit=lots").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid ?limit=" }));
}

#[tokio::test]
async fn test_follows_page_by_end_cursor_without_edge_cursors() {
    let server = MockServer::start().await;
    let page = |logins: &[&str], end: &str, more: bool| {
        let edges: Vec<Value> = logins
            .iter()
            .map(|login| json!({
                "followedAt": "2023-06-01T12:00:00Z",
                "node": { "id": login, "login": login, "displayName": login }
            }))
            .collect();
        json!({ "data": { "user": { "follows": {
            "totalCount": 3,
            "edges": edges,
            "pageInfo": { "endCursor": end, "hasNextPage": more }
        } } } })
    };
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "operationName": "Follows", "variables": { "after": null } })))
        .respond_with(ok(page(&["a", "b"], "e1", true)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "operationName": "Follows", "variables": { "after": "e1" } })))
        .respond_with(ok(page(&["c"], "e2", false)))
        .mount(&server)
        .await;

    let (status, body) = get(&gateway(&server), "/twitch/UserFollows?login=forsen").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(body["truncated"], false);
    assert_eq!(body["follows"][2]["login"], "c");
    assert_eq!(body["follows"][0]["followedAt"], "2023-06-01T12:00:00Z");
}

// ---- channel resources ----

#[tokio::test]
async fn test_mod_vip_paginates_both_lists() {
    let server = MockServer::start().await;
    let edge = |login: &str, cursor: &str| {
        json!({ "cursor": cursor, "grantedAt": "2020-01-01T00:00:00Z",
                "node": { "id": login, "login": login, "displayName": login } })
    };
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "operationName": "Mods", "variables": { "after": null } })))
        .respond_with(ok(json!({ "data": { "user": { "mods": {
            "edges": [edge("m1", "a")],
            "pageInfo": { "hasNextPage": true, "endCursor": "a" }
        } } } })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "operationName": "Mods", "variables": { "after": "a" } })))
        .respond_with(ok(json!({ "data": { "user": { "mods": {
            "edges": [edge("m2", "b"), { "cursor": "c", "grantedAt": null, "node": null }],
            "pageInfo": { "hasNextPage": false, "endCursor": "c" }
        } } } })))
        .mount(&server)
        .await;
    mount_operation(
        &server,
        "twitch",
        "Vips",
        ok(json!({ "data": { "user": { "vips": {
            "edges": [edge("v1", "x")],
            "pageInfo": { "hasNextPage": false, "endCursor": "x" }
        } } } })),
    )
    .await;

    let (status, body) = get(&gateway(&server), "/twitch/modvip?login=forsen").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mods"].as_array().unwrap().len(), 2);
    assert_eq!(body["mods"][1]["login"], "m2");
    assert_eq!(body["mods"][0]["grantedAt"], "2020-01-01T00:00:00Z");
    assert_eq!(body["vips"][0]["login"], "v1");
}

#[tokio::test]
async fn test_founders_rejects_partial_data_with_errors() {
    let server = MockServer::start().await;
    mount_operation(
        &server,
        "twitch",
        "Founders",
        ok(json!({
            "data": { "user": { "channel": { "founderBadgeAvailability": 0, "founders": [] } } },
            "errors": [{ "message": "forbidden", "path": ["user", "channel", "founders"] }]
        })),
    )
    .await;

    let (status, body) = get(&gateway(&server), "/twitch/founders?login=forsen").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"][0]["message"], "forbidden");
}

#[tokio::test]
async fn test_pinned_message_resolves_channel_then_reads_pin() {
    let server = MockServer::start().await;
    mount_operation(&server, "twitch", "UseLive", ok(json!([{ "data": { "user": { "id": "42" } } }]))).await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "operationName": "GetPinnedChat",
            "variables": { "channelID": "42", "count": 1 }
        })))
        .respond_with(ok(json!([{ "data": { "channel": { "pinnedChatMessages": { "edges": [{
            "node": {
                "pinnedBy": { "id": "7", "displayName": "Mod" },
                "pinnedMessage": {
                    "id": "m1",
                    "sentAt": "2024-05-01T10:00:00Z",
                    "content": { "text": "welcome" },
                    "sender": { "id": "42", "displayName": "Streamer" }
                }
            }
        }] } } } }])))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = get(&gateway(&server), "/twitch/PinnedMessage?login=streamer").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pinnedmessage"]["text"], "welcome");
    assert_eq!(body["pinnedmessage"]["pinnedby"]["displayname"], "Mod");
}

#[tokio::test]
async fn test_pinned_message_unknown_channel_is_404_without_second_call() {
    let server = MockServer::start().await;
    mount_operation(&server, "twitch", "UseLive", ok(json!([{ "data": { "user": null } }]))).await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "operationName": "GetPinnedChat" })))
        .respond_with(ok(json!({ "data": {} })))
        .expect(0)
        .mount(&server)
        .await;

    let (status, body) = get(&gateway(&server), "/twitch/pinnedmessage?login=ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "User not found" }));
}

#[tokio::test]
async fn test_team_not_found() {
    let server = MockServer::start().await;
    mount_operation(&server, "twitch", "TeamLandingMemberList", ok(json!({ "data": { "team": null } }))).await;
    mount_operation(&server, "twitch", "TeamsLandingBody", ok(json!({ "data": { "team": null } }))).await;

    let (status, body) = get(&gateway(&server), "/twitch/team?team=nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Team not found" }));
}

#[tokio::test]
async fn test_global_badges_strip_extensions() {
    let server = MockServer::start().await;
    mount_operation(
        &server,
        "twitch",
        "GlobalBadges",
        ok(json!({
            "data": { "badges": [{ "setID": "staff" }] },
            "extensions": { "durationMilliseconds": 3, "operationName": "GlobalBadges" }
        })),
    )
    .await;

    let (status, body) = get(&gateway(&server), "/twitch/globalbadges").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": { "badges": [{ "setID": "staff" }] } }));
}

// ---- 7TV ----

async fn mount_search(server: &MockServer, items: Value) {
    mount_operation(
        server,
        "7tv",
        "IDbyUsername",
        ok(json!({ "data": { "users": { "search": { "items": items } } } })),
    )
    .await;
}

#[tokio::test]
async fn test_seventv_user_roles_after_exact_match() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        json!([
            { "id": "01X", "mainConnection": { "platformUsername": "forsenlol" } },
            { "id": "01Y", "mainConnection": { "platformUsername": "Forsen" } }
        ]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/7tv"))
        .and(body_partial_json(json!({ "operationName": "userRoles", "variables": { "id": "01Y" } })))
        .respond_with(ok(json!({ "data": { "users": { "user": {
            "roles": [{ "id": "r1", "name": "Subscriber" }]
        } } } })))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = get(&gateway(&server), "/7tv/UserRoles?login=forsen").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "userId": "01Y", "username": "Forsen", "roles": [{ "id": "r1", "name": "Subscriber" }] })
    );
}

#[tokio::test]
async fn test_seventv_lookup_not_found_messages() {
    let server = MockServer::start().await;
    mount_search(&server, json!([{ "id": "01X", "mainConnection": { "platformUsername": "other" } }])).await;

    let (status, body) = get(&gateway(&server), "/7tv/userinfo?login=forsen").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "No exact match found for username 'forsen'" }));

    let server = MockServer::start().await;
    mount_search(&server, json!([{ "id": "01Y", "mainConnection": { "platformUsername": "forsen" } }])).await;
    mount_operation(
        &server,
        "7tv",
        "userSubscriptionQuery",
        ok(json!({ "data": { "users": { "user": null } } })),
    )
    .await;

    let (status, body) = get(&gateway(&server), "/7tv/usersubscriptioninfo?login=forsen").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "User not found after ID lookup" }));
}

#[tokio::test]
async fn test_seventv_badges_paints_without_data_is_500() {
    let server = MockServer::start().await;
    mount_operation(&server, "7tv", "GetBadgesAndPaints", ok(json!({ "data": null }))).await;

    let (status, body) = get(&gateway(&server), "/7tv/badgespaints").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "No data returned from 7TV" }));
}

// ---- misc ----

#[tokio::test]
async fn test_misc_reports_ping_and_uptime() {
    let server = MockServer::start().await;

    let (status, body) = get(&gateway(&server), "/misc/Misc").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["ping"].as_str().unwrap().ends_with(" ms"));
    assert!(body["uptime"].is_string());
    assert!(body["startedAt"].is_string());
    assert!(body["rssMB"].is_string() || body["rssMB"].is_null());
}
