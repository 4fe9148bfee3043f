use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use super::*;

const COOKIE_VALUE: &str = "sid=test-session";

#[derive(Clone, Default)]
struct Recorder {
    calls: Arc<Mutex<Vec<(String, Value)>>>,
}

impl Recorder {
    fn push(&self, route: impl Into<String>, body: Value) {
        self.calls.lock().unwrap().push((route.into(), body));
    }

    fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

fn authed(headers: &HeaderMap) -> bool {
    headers.get("cookie").and_then(|v| v.to_str().ok()) == Some(COOKIE_VALUE)
}

async fn players(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    if !authed(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(Json(json!({
        "servers": [{
            "serverId": "100:job-a",
            "placeId": 100,
            "jobId": "job-a",
            "updatedAt": "now",
            "players": [{ "userId": 1, "username": "a", "position": { "mapX": 0.5, "mapY": 0.5 } }]
        }],
        "lastUpdated": "now"
    })))
}

async fn summary() -> Json<Value> {
    Json(json!({ "onlineTotal": 12, "serversOnline": 2 }))
}

async fn me(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    if !authed(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(Json(json!({ "robloxUserId": 5, "username": "staff", "displayName": "Staff", "permissions": {} })))
}

async fn search(State(rec): State<Recorder>, Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    rec.push("search", json!(params.get("q")));
    Json(json!([{ "robloxUserId": 1, "username": "a", "isOnline": true }]))
}

async fn player_detail(Path(id): Path<i64>) -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "message": format!("player {id} not found") })))
}

async fn moderation(State(rec): State<Recorder>, Path(action): Path<String>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    rec.push(format!("moderation/{action}"), body);
    if action == "global-ban" {
        return (StatusCode::FORBIDDEN, Json(json!({ "error": "insufficient permissions" })));
    }
    (StatusCode::OK, Json(json!({ "ok": true })))
}

async fn ip_ban(State(rec): State<Recorder>, Path(id): Path<i64>, Json(body): Json<Value>) -> StatusCode {
    rec.push(format!("ip-ban/{id}"), body);
    StatusCode::NO_CONTENT
}

async fn delete_user(State(rec): State<Recorder>, Path(id): Path<i64>) -> StatusCode {
    rec.push(format!("delete/{id}"), Value::Null);
    StatusCode::NO_CONTENT
}

async fn spawn_fake_api(rec: Recorder) -> String {
    let app = Router::new()
        .route("/dashboard/players", get(players))
        .route("/dashboard/summary", get(summary))
        .route("/auth/me", get(me))
        .route("/players/search", get(search))
        .route("/players/{id}", get(player_detail))
        .route("/moderation/{action}", post(moderation))
        .route("/admin/users/{id}/ip-ban", post(ip_ban))
        .route("/admin/users/{id}", delete(delete_user))
        .with_state(rec);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn config(api_url: String, cookie: Option<&str>) -> DashConfig {
    DashConfig {
        api_url,
        session_cookie: cookie.map(str::to_owned),
        poll_interval: Duration::from_secs(5),
        request_timeout: Duration::from_secs(5),
        prefs_path: PathBuf::from("unused.json"),
    }
}

async fn client_pair() -> (ApiClient, ApiClient, Recorder) {
    let rec = Recorder::default();
    let base = spawn_fake_api(rec.clone()).await;
    let authed = ApiClient::new(&config(base.clone(), Some(COOKIE_VALUE))).unwrap();
    let anon = ApiClient::new(&config(base, None)).unwrap();
    (authed, anon, rec)
}

#[tokio::test]
async fn live_players_sends_session_cookie() {
    let (client, anon, _) = client_pair().await;
    let state = client.live_players().await.unwrap();
    assert_eq!(state.servers.len(), 1);
    assert_eq!(state.servers[0].players[0].user_id, 1);
    assert!(matches!(anon.live_players().await, Err(ApiError::Unauthorized)));
}

#[tokio::test]
async fn summary_decodes() {
    let (client, _, _) = client_pair().await;
    let summary = client.summary().await.unwrap();
    assert_eq!(summary.online_total, 12);
    assert_eq!(summary.servers_online, 2);
}

#[tokio::test]
async fn me_maps_unauthorized_to_none() {
    let (client, anon, _) = client_pair().await;
    assert_eq!(client.me().await.unwrap().map(|u| u.roblox_user_id), Some(5));
    assert!(anon.me().await.unwrap().is_none());
}

#[tokio::test]
async fn search_only_sends_non_blank_query() {
    let (client, _, rec) = client_pair().await;
    client.search_players("  bus ").await.unwrap();
    client.search_players("   ").await.unwrap();
    let calls = rec.calls();
    assert_eq!(calls[0], ("search".to_owned(), json!("bus")));
    assert_eq!(calls[1], ("search".to_owned(), Value::Null));
}

#[tokio::test]
async fn player_detail_error_uses_body_message() {
    let (client, _, _) = client_pair().await;
    match client.player_detail(77).await {
        Err(ApiError::Status { status, detail }) => {
            assert_eq!(status, 404);
            assert_eq!(detail, "player 77 not found");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn moderation_posts_json_body() {
    let (client, _, rec) = client_pair().await;
    let body = ModerationRequest::new(ModerationAction::Kick, 42, Some("100:job-a".to_owned()), None, Some("afk".to_owned()))
        .unwrap();
    client.moderate(ModerationAction::Kick, &body).await.unwrap();
    assert_eq!(
        rec.calls()[0],
        ("moderation/kick".to_owned(), json!({ "targetUserId": 42, "serverId": "100:job-a", "reason": "afk" }))
    );
}

#[tokio::test]
async fn moderation_failure_reports_server_error() {
    let (client, _, _) = client_pair().await;
    let body = ModerationRequest::new(ModerationAction::GlobalBan, 42, None, None, None).unwrap();
    let err = client.moderate(ModerationAction::GlobalBan, &body).await.unwrap_err();
    assert_eq!(err.to_string(), "server returned 403: insufficient permissions");
}

#[tokio::test]
async fn server_actions_post_server_id_and_message() {
    let (client, _, rec) = client_pair().await;
    let announce = ServerModerationRequest::new("100:job-a", Some("restart soon".to_owned()));
    client.server_action(ServerAction::Announce, &announce).await.unwrap();
    let shutdown = ServerModerationRequest::new("100:job-a", None);
    client.server_action(ServerAction::Shutdown, &shutdown).await.unwrap();
    let calls = rec.calls();
    assert_eq!(
        calls[0],
        ("moderation/server-announce".to_owned(), json!({ "serverId": "100:job-a", "message": "restart soon" }))
    );
    assert_eq!(calls[1], ("moderation/server-shutdown".to_owned(), json!({ "serverId": "100:job-a", "message": "" })));
}

#[tokio::test]
async fn ip_ban_sends_default_reason_and_delete_uses_delete() {
    let (client, _, rec) = client_pair().await;
    client.admin_action(AdminAction::IpBan, 8, None).await.unwrap();
    client.admin_action(AdminAction::Delete, 8, None).await.unwrap();
    let calls = rec.calls();
    assert_eq!(calls[0], ("ip-ban/8".to_owned(), json!({ "reason": DEFAULT_IP_BAN_REASON })));
    assert_eq!(calls[1], ("delete/8".to_owned(), Value::Null));
}

#[test]
fn invalid_cookie_is_rejected() {
    let err = ApiClient::new(&config("http://127.0.0.1:1".to_owned(), Some("bad\nvalue"))).unwrap_err();
    assert!(matches!(err, ApiError::InvalidHeader(_)));
}
