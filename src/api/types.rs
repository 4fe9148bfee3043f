//! Wire types for dashboard API requests and responses.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
    #[error("not authenticated; refresh NETDASH_SESSION_COOKIE")]
    Unauthorized,
    #[error("server returned {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("`{0}` requires a message")]
    MissingMessage(&'static str),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Headline counters from `/dashboard/summary`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(default)]
    pub online_total: u64,
    #[serde(default)]
    pub online_by_role: Option<BTreeMap<String, u64>>,
    #[serde(default)]
    pub servers_online: u64,
    #[serde(default)]
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Permissions {
    pub can_access_site: bool,
    pub level: i64,
    pub has_control_center: bool,
    pub is_donator: bool,
    pub is_supervisor: bool,
    pub is_lead_supervisor: bool,
    pub is_developer: bool,
    pub is_admin: bool,
}

/// Signed-in staff member from `/auth/me`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub roblox_user_id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub permissions: Permissions,
}

/// Row from `/players/search`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub roblox_user_id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub group_rank: i64,
    #[serde(default)]
    pub total_play_time_seconds: u64,
    #[serde(default)]
    pub last_cash: f64,
    #[serde(default)]
    pub last_seen_at: String,
    #[serde(default)]
    pub is_online: bool,
    #[serde(default)]
    pub current_server_id: Option<String>,
    #[serde(default)]
    pub current_role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentServer {
    pub id: String,
    #[serde(default)]
    pub place_id: Option<i64>,
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CurrentStats {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub cash: f64,
    #[serde(default)]
    pub miles: f64,
    #[serde(default)]
    pub position: Option<WorldPosition>,
}

/// Full record from `/players/{id}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDetail {
    pub roblox_user_id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub group_rank: i64,
    #[serde(default)]
    pub total_play_time_seconds: u64,
    #[serde(default)]
    pub last_cash: f64,
    #[serde(default)]
    pub last_seen_at: String,
    #[serde(default)]
    pub is_online: bool,
    #[serde(default)]
    pub current_server: Option<CurrentServer>,
    #[serde(default)]
    pub current_stats: Option<CurrentStats>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedRoblox {
    pub user_id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedDiscord {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub server_display_name: Option<String>,
}

/// Dashboard account from `/admin/users`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: i64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub last_login_ip: Option<String>,
    #[serde(default)]
    pub last_login_at: Option<String>,
    #[serde(default)]
    pub roblox: Option<LinkedRoblox>,
    #[serde(default)]
    pub discord: Option<LinkedDiscord>,
}

/// In-game moderation actions exposed under `/moderation/{action}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ModerationAction {
    Kick,
    Respawn,
    ServerBan,
    GlobalBan,
    Message,
    Freeze,
    Bring,
    /// Teleport the moderator to the target.
    To,
    Alert,
}

impl ModerationAction {
    /// Path segment under `/moderation/`.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Kick => "kick",
            Self::Respawn => "respawn",
            Self::ServerBan => "server-ban",
            Self::GlobalBan => "global-ban",
            Self::Message => "message",
            Self::Freeze => "freeze",
            Self::Bring => "bring",
            Self::To => "to",
            Self::Alert => "alert",
        }
    }

    /// Actions whose free text is a message shown to the player rather than a reason.
    #[must_use]
    pub fn takes_message(self) -> bool {
        matches!(self, Self::Message | Self::Alert)
    }

    #[must_use]
    pub fn takes_reason(self) -> bool {
        !self.takes_message() && self != Self::Respawn
    }
}

/// Body of a moderation call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationRequest {
    pub target_user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moderator_user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ModerationRequest {
    /// Shape a request for `action`, routing `text` into `message` or `reason`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingMessage`] when a message action has no text.
    pub fn new(
        action: ModerationAction,
        target_user_id: i64,
        server_id: Option<String>,
        moderator_user_id: Option<i64>,
        text: Option<String>,
    ) -> Result<Self, ApiError> {
        let text = text.filter(|t| !t.trim().is_empty());
        let mut request = Self { target_user_id, server_id, moderator_user_id, ..Self::default() };
        if action.takes_message() {
            request.message = Some(text.ok_or(ApiError::MissingMessage(action.path()))?);
        } else if action.takes_reason() {
            request.reason = text;
        }
        Ok(request)
    }
}

/// Actions that target a whole game server rather than one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerAction {
    /// Broadcast a message to everyone on the server.
    Announce,
    /// Close the server, kicking every player.
    Shutdown,
}

impl ServerAction {
    /// Path segment under `/moderation/`.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Announce => "server-announce",
            Self::Shutdown => "server-shutdown",
        }
    }
}

/// Body of a server-wide moderation call. The message is optional and sent
/// as an empty string when absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerModerationRequest {
    pub server_id: String,
    pub message: String,
}

impl ServerModerationRequest {
    #[must_use]
    pub fn new(server_id: impl Into<String>, message: Option<String>) -> Self {
        Self { server_id: server_id.into(), message: message.unwrap_or_default() }
    }
}

pub const DEFAULT_IP_BAN_REASON: &str = "Manual ban from Account Admin";

/// Account administration actions under `/admin/users/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    UnlinkRoblox,
    UnlinkDiscord,
    ForceLogout,
    IpBan,
    Delete,
}

impl AdminAction {
    /// HTTP method and path for `user_id`.
    #[must_use]
    pub fn route(self, user_id: i64) -> (reqwest::Method, String) {
        let base = format!("/admin/users/{user_id}");
        match self {
            Self::UnlinkRoblox => (reqwest::Method::POST, format!("{base}/unlink/roblox")),
            Self::UnlinkDiscord => (reqwest::Method::POST, format!("{base}/unlink/discord")),
            Self::ForceLogout => (reqwest::Method::POST, format!("{base}/logout")),
            Self::IpBan => (reqwest::Method::POST, format!("{base}/ip-ban")),
            Self::Delete => (reqwest::Method::DELETE, base),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Best explanation for a failed response: the body's `error`, then its
/// `message`, then the status reason phrase.
#[must_use]
pub fn error_detail(status: reqwest::StatusCode, body: &str) -> String {
    let from_body = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.filter(|e| !e.is_empty()).or(b.message.filter(|m| !m.is_empty())));
    from_body
        .or_else(|| status.canonical_reason().map(str::to_owned))
        .unwrap_or_else(|| "request failed".to_owned())
}
