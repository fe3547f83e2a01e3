//! REST side of the game lobbies: listing, creating and joining games.

use async_trait::async_trait;
use chatgames_shared::{
    ApiError, CreateCardGameRequest, GameKind, GameSummary, JoinCardGameRequest, LobbyListing,
    LobbyReply, WordGameRequest,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

/// The lobby collaborator. The client only ever talks to this trait, so tests
/// can answer from memory and control when each answer arrives.
#[async_trait]
pub trait LobbyApi: Send + Sync + 'static {
    async fn list_games(&self, kind: GameKind) -> Result<Vec<GameSummary>, ApiError>;
    async fn create_card_game(&self, req: &CreateCardGameRequest) -> Result<LobbyReply, ApiError>;
    async fn join_card_game(&self, req: &JoinCardGameRequest) -> Result<LobbyReply, ApiError>;
    async fn create_word_game(&self, req: &WordGameRequest) -> Result<LobbyReply, ApiError>;
    async fn join_word_game(&self, req: &WordGameRequest) -> Result<LobbyReply, ApiError>;
}

/// Turn a `{success: false}` reply into an error carrying the server's message.
pub fn accepted(reply: LobbyReply) -> Result<LobbyReply, ApiError> {
    if reply.success {
        Ok(reply)
    } else {
        Err(ApiError::Rejected(
            reply
                .message
                .unwrap_or_else(|| "request refused".to_string()),
        ))
    }
}

/// [`LobbyApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpLobbyApi {
    client: Client,
    base_url: Url,
}

impl HttpLobbyApi {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Network(format!("bad url for {path}: {e}")))
    }

    async fn get_json<TRes: DeserializeOwned>(&self, path: &str) -> Result<TRes, ApiError> {
        let url = self.url(path)?;
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        read_json(resp).await
    }

    async fn post_json<TReq: Serialize + Sync, TRes: DeserializeOwned>(
        &self,
        path: &str,
        body: &TReq,
    ) -> Result<TRes, ApiError> {
        let url = self.url(path)?;
        let resp = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        read_json(resp).await
    }
}

async fn read_json<TRes: DeserializeOwned>(resp: reqwest::Response) -> Result<TRes, ApiError> {
    let status = resp.status().as_u16();
    let is_success = resp.status().is_success();

    let text = resp
        .text()
        .await
        .map_err(|e| ApiError::Network(format!("failed to read body: {e}")))?;

    if !is_success {
        // The lobby endpoints answer refusals with a 4xx and a `{success,
        // message}` body; surface the message when there is one.
        if let Ok(reply) = serde_json::from_str::<LobbyReply>(&text) {
            if let Some(message) = reply.message {
                return Err(ApiError::Rejected(message));
            }
        }
        return Err(ApiError::Http { status, body: text });
    }

    serde_json::from_str(&text).map_err(|e| ApiError::Deserialize(e.to_string()))
}

#[async_trait]
impl LobbyApi for HttpLobbyApi {
    async fn list_games(&self, kind: GameKind) -> Result<Vec<GameSummary>, ApiError> {
        let path = format!("/api/{}/games", kind.api_segment());
        let listing: LobbyListing = self.get_json(&path).await?;
        if !listing.success {
            return Err(ApiError::Rejected(format!("{kind} lobby listing refused")));
        }
        Ok(listing.games)
    }

    async fn create_card_game(&self, req: &CreateCardGameRequest) -> Result<LobbyReply, ApiError> {
        accepted(self.post_json("/api/poker/create", req).await?)
    }

    async fn join_card_game(&self, req: &JoinCardGameRequest) -> Result<LobbyReply, ApiError> {
        accepted(self.post_json("/api/poker/join", req).await?)
    }

    async fn create_word_game(&self, req: &WordGameRequest) -> Result<LobbyReply, ApiError> {
        accepted(self.post_json("/api/hangman/create", req).await?)
    }

    async fn join_word_game(&self, req: &WordGameRequest) -> Result<LobbyReply, ApiError> {
        accepted(self.post_json("/api/hangman/join", req).await?)
    }
}
