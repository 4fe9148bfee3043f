//! Typed REST client for the dashboard backend.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use async_trait::async_trait;
use livemap::entity::GameState;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use super::types::{
    AdminAction, AdminUser, ApiError, AuthUser, DEFAULT_IP_BAN_REASON, ModerationAction, ModerationRequest,
    PlayerDetail, PlayerSummary, ServerAction, ServerModerationRequest, Summary, error_detail,
};
use crate::config::DashConfig;
use crate::poll::PlayerSource;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client that sends the configured session cookie on every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the cookie is not a valid header value or the
    /// HTTP client cannot be built.
    pub fn new(config: &DashConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &config.session_cookie {
            let mut value = HeaderValue::from_str(cookie)?;
            value.set_sensitive(true);
            headers.insert(COOKIE, value);
        }
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { http, base_url: config.api_url.clone() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    /// Send and map 401 / non-2xx to errors.
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status: status.as_u16(), detail: error_detail(status, &body) });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Live servers and players (`GET /dashboard/players`).
    pub async fn live_players(&self) -> Result<GameState, ApiError> {
        self.get_json(self.request(Method::GET, "/dashboard/players")).await
    }

    /// Headline counters (`GET /dashboard/summary`).
    pub async fn summary(&self) -> Result<Summary, ApiError> {
        self.get_json(self.request(Method::GET, "/dashboard/summary")).await
    }

    /// The signed-in staff member, or `None` when the session is not valid.
    pub async fn me(&self) -> Result<Option<AuthUser>, ApiError> {
        match self.get_json(self.request(Method::GET, "/auth/me")).await {
            Ok(user) => Ok(Some(user)),
            Err(ApiError::Unauthorized) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// End the current session.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.send(self.request(Method::POST, "/auth/logout")).await?;
        Ok(())
    }

    /// Search the player directory; a blank query lists recent players.
    pub async fn search_players(&self, query: &str) -> Result<Vec<PlayerSummary>, ApiError> {
        let mut request = self.request(Method::GET, "/players/search");
        let term = query.trim();
        if !term.is_empty() {
            request = request.query(&[("q", term)]);
        }
        self.get_json(request).await
    }

    pub async fn player_detail(&self, roblox_user_id: i64) -> Result<PlayerDetail, ApiError> {
        self.get_json(self.request(Method::GET, &format!("/players/{roblox_user_id}"))).await
    }

    /// Run an in-game moderation action (`POST /moderation/{action}`).
    pub async fn moderate(&self, action: ModerationAction, body: &ModerationRequest) -> Result<(), ApiError> {
        tracing::info!(action = action.path(), target_user_id = body.target_user_id, server_id = ?body.server_id, "moderation request");
        let path = format!("/moderation/{}", action.path());
        self.send(self.request(Method::POST, &path).json(body)).await?;
        Ok(())
    }

    /// Run a server-wide action (`POST /moderation/server-announce` or `/server-shutdown`).
    pub async fn server_action(&self, action: ServerAction, body: &ServerModerationRequest) -> Result<(), ApiError> {
        tracing::info!(action = action.path(), server_id = %body.server_id, "server moderation request");
        let path = format!("/moderation/{}", action.path());
        self.send(self.request(Method::POST, &path).json(body)).await?;
        Ok(())
    }

    pub async fn admin_users(&self) -> Result<Vec<AdminUser>, ApiError> {
        self.get_json(self.request(Method::GET, "/admin/users")).await
    }

    /// Run an account administration action. `reason` is only sent for IP bans.
    pub async fn admin_action(&self, action: AdminAction, user_id: i64, reason: Option<&str>) -> Result<(), ApiError> {
        tracing::info!(?action, user_id, "admin request");
        let (method, path) = action.route(user_id);
        let mut request = self.request(method, &path);
        if action == AdminAction::IpBan {
            let reason = reason.unwrap_or(DEFAULT_IP_BAN_REASON);
            request = request.json(&serde_json::json!({ "reason": reason }));
        }
        self.send(request).await?;
        Ok(())
    }
}

#[async_trait]
impl PlayerSource for ApiClient {
    async fn fetch_players(&self) -> Result<GameState, ApiError> {
        self.live_players().await
    }
}
