//! Shared data models for the chatgames protocol and lobby API.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// --- Games ---

/// The two game families served over the shared connection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    /// Poker tables.
    Card,
    /// Hangman games.
    Word,
}

impl GameKind {
    /// Path segment used by the lobby REST endpoints.
    pub fn api_segment(self) -> &'static str {
        match self {
            GameKind::Card => "poker",
            GameKind::Word => "hangman",
        }
    }
}

impl std::fmt::Display for GameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameKind::Card => write!(f, "card game"),
            GameKind::Word => write!(f, "word game"),
        }
    }
}

/// One entry of a lobby listing.
///
/// The server serializes its game objects directly, so only `gameId` is
/// guaranteed. Everything it sends beyond the known fields is kept in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    pub game_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_count: Option<u32>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl GameSummary {
    pub fn new(game_id: impl Into<String>) -> Self {
        Self {
            game_id: game_id.into(),
            status: None,
            participant_count: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// A playing card as the server describes it. The client never interprets
/// cards, it only carries them to the view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Card(pub serde_json::Value);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TablePlayer {
    pub username: String,
    #[serde(default)]
    pub stack: i64,
    #[serde(default)]
    pub current_bet: i64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub is_winner: bool,
    #[serde(default)]
    pub token: Option<String>,
    /// Only revealed at showdown.
    #[serde(default)]
    pub hand: Option<Vec<Card>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TableOptions {
    #[serde(default)]
    pub small_blind: i64,
    #[serde(default)]
    pub big_blind: i64,
}

/// Full snapshot of one poker table as seen by this viewer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardTable {
    pub game_id: String,
    #[serde(default)]
    pub creator_username: Option<String>,
    #[serde(default)]
    pub in_progress: bool,
    #[serde(default)]
    pub round: Option<String>,
    #[serde(default)]
    pub pot: i64,
    #[serde(default)]
    pub board: Vec<Card>,
    #[serde(default)]
    pub max_players: Option<u32>,
    #[serde(default)]
    pub min_players: Option<u32>,
    #[serde(default)]
    pub current_player_token: Option<String>,
    #[serde(default)]
    pub options: TableOptions,
    #[serde(default)]
    pub players: Vec<TablePlayer>,
}

/// Full snapshot of one hangman game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WordTable {
    pub game_id: String,
    #[serde(default)]
    pub host_username: Option<String>,
    #[serde(default)]
    pub guesser_username: Option<String>,
    #[serde(default)]
    pub guessed_letters: Vec<String>,
    #[serde(default)]
    pub mistakes: u32,
    #[serde(default)]
    pub max_guesses: u32,
    #[serde(default)]
    pub masked_word: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Present once the game is over.
    #[serde(default)]
    pub secret_word: Option<String>,
}

// --- Lobby API ---

/// Body of `GET /api/{poker,hangman}/games`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LobbyListing {
    pub success: bool,
    #[serde(default)]
    pub games: Vec<GameSummary>,
}

/// Body returned by the create/join endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LobbyReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardGameRequest {
    pub game_id: String,
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    pub small_blind: u32,
    pub big_blind: u32,
    pub max_players: u32,
    pub stack: u32,
}

impl CreateCardGameRequest {
    /// Request with the server's default blinds, seat count and stack.
    pub fn new(game_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            game_id: game_id.into(),
            username: username.into(),
            password: None,
            small_blind: 10,
            big_blind: 20,
            max_players: 9,
            stack: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JoinCardGameRequest {
    pub game_id: String,
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    pub stack: u32,
}

/// Create and join share one body for hangman.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WordGameRequest {
    pub game_id: String,
    pub username: String,
}

// --- Timestamps ---

/// Accepts RFC 3339 strings or epoch milliseconds. Anything else maps to `None`
/// so a message with an odd timestamp is still delivered.
pub fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_keeps_unknown_fields() {
        let summary: GameSummary = serde_json::from_value(serde_json::json!({
            "gameId": "g1",
            "participantCount": 2,
            "smallBlind": 10
        }))
        .unwrap();
        assert_eq!(summary.game_id, "g1");
        assert_eq!(summary.participant_count, Some(2));
        assert_eq!(summary.extra.get("smallBlind"), Some(&serde_json::json!(10)));
    }

    #[test]
    fn card_table_tolerates_sparse_snapshot() {
        let table: CardTable =
            serde_json::from_value(serde_json::json!({ "gameId": "g9" })).unwrap();
        assert_eq!(table.game_id, "g9");
        assert!(table.players.is_empty());
        assert!(!table.in_progress);
    }

    #[test]
    fn create_request_uses_server_defaults() {
        let req = CreateCardGameRequest::new("g1", "alice");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["smallBlind"], 10);
        assert_eq!(json["bigBlind"], 20);
        assert_eq!(json["maxPlayers"], 9);
        assert_eq!(json["stack"], 1000);
    }
}
