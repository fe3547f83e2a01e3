//! Client configuration from environment variables.

use std::path::PathBuf;

use url::Url;

use crate::error::{ClientError, Result};
use crate::stores::LobbyPolicy;

pub const DEFAULT_WS_URL: &str = "ws://localhost:3000/ws";
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Streaming endpoint. The session identity is appended as `?username=`.
    pub ws_url: Url,
    /// Base URL of the lobby REST endpoints.
    pub api_url: Url,
    /// How late lobby fetch results are reconciled with push updates.
    pub lobby_policy: LobbyPolicy,
    /// Where breadcrumbs are persisted. `None` means the platform config dir.
    pub storage_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            ws_url: Url::parse(DEFAULT_WS_URL).expect("default websocket url is valid"),
            api_url: Url::parse(DEFAULT_API_URL).expect("default api url is valid"),
            lobby_policy: LobbyPolicy::default(),
            storage_dir: None,
        }
    }
}

impl ClientConfig {
    /// Build configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CHATGAMES_WS_URL`: streaming endpoint (default: "ws://localhost:3000/ws")
    /// - `CHATGAMES_API_URL`: lobby API base (default: "http://localhost:3000")
    /// - `CHATGAMES_LOBBY_POLICY`: "strict" | "last-write-wins" (default: "strict")
    /// - `CHATGAMES_STORAGE_DIR`: breadcrumb directory (default: platform config dir)
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("CHATGAMES_WS_URL") {
            config = config.with_ws_url(&raw)?;
        }
        if let Ok(raw) = std::env::var("CHATGAMES_API_URL") {
            config = config.with_api_url(&raw)?;
        }
        if let Ok(raw) = std::env::var("CHATGAMES_LOBBY_POLICY") {
            config.lobby_policy = raw.parse()?;
        }
        if let Ok(dir) = std::env::var("CHATGAMES_STORAGE_DIR") {
            config.storage_dir = Some(PathBuf::from(dir));
        }

        Ok(config)
    }

    pub fn with_ws_url(mut self, raw: &str) -> Result<Self> {
        let url = Url::parse(raw).map_err(|e| ClientError::Config(format!("{raw}: {e}")))?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(ClientError::Config(format!(
                "websocket url must use ws:// or wss://, got {raw}"
            )));
        }
        self.ws_url = url;
        Ok(self)
    }

    pub fn with_api_url(mut self, raw: &str) -> Result<Self> {
        self.api_url = Url::parse(raw).map_err(|e| ClientError::Config(format!("{raw}: {e}")))?;
        Ok(self)
    }

    pub fn with_lobby_policy(mut self, policy: LobbyPolicy) -> Self {
        self.lobby_policy = policy;
        self
    }

    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = Some(dir.into());
        self
    }

    /// Connection URL for one session identity.
    pub fn connection_url(&self, identity: &str) -> Url {
        let mut url = self.ws_url.clone();
        url.query_pairs_mut().append_pair("username", identity);
        url
    }
}
