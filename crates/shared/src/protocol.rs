//! Wire protocol for the multiplexed chat and games connection.
//!
//! Every frame is a JSON object whose `type` field selects the sub-protocol.
//! Inbound tags use the server's names (`poker_*`, `hangman_*`); the generic
//! `card_game_*` / `word_game_*` names are accepted as aliases.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FrameError;
use crate::models::{lenient_timestamp, Card, CardTable, GameSummary, WordTable};

/// Every tag the dispatcher routes, aliases included.
pub const INBOUND_TAGS: &[&str] = &[
    "broadcast",
    "private_message",
    "usernames",
    "available_rooms",
    "joined_rooms",
    "room_message",
    "room_user_count",
    "poker_lobby_update",
    "card_game_lobby_update",
    "poker_game_state",
    "card_game_table_state",
    "poker_hand",
    "card_game_private_hand",
    "poker_left_game",
    "card_game_left",
    "hangman_lobby_update",
    "word_game_lobby_update",
    "hangman_game_state",
    "word_game_table_state",
    "error",
    "server_error",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum InboundEvent {
    #[serde(rename = "broadcast")]
    Broadcast { content: String, username: String },

    #[serde(rename = "private_message")]
    PrivateMessage {
        sender: String,
        to: String,
        text: String,
    },

    #[serde(rename = "usernames")]
    Roster { content: Vec<String> },

    #[serde(rename = "available_rooms")]
    RoomList { content: Vec<String> },

    #[serde(rename = "joined_rooms")]
    RoomMembership { content: Vec<String> },

    #[serde(rename = "room_message")]
    RoomMessage {
        room: String,
        sender: String,
        text: String,
        #[serde(default, deserialize_with = "lenient_timestamp")]
        timestamp: Option<DateTime<Utc>>,
    },

    #[serde(rename = "room_user_count")]
    RoomOccupancy { room: String, count: u32 },

    #[serde(rename = "poker_lobby_update", alias = "card_game_lobby_update")]
    CardGameLobby { games: Vec<GameSummary> },

    #[serde(rename = "poker_game_state", alias = "card_game_table_state")]
    CardGameTable {
        #[serde(rename = "gameState")]
        game_state: CardTable,
    },

    #[serde(rename = "poker_hand", alias = "card_game_private_hand")]
    CardGameHand { hand: Vec<Card> },

    #[serde(rename = "poker_left_game", alias = "card_game_left")]
    CardGameLeft {},

    #[serde(rename = "hangman_lobby_update", alias = "word_game_lobby_update")]
    WordGameLobby { games: Vec<GameSummary> },

    #[serde(rename = "hangman_game_state", alias = "word_game_table_state")]
    WordGameTable {
        #[serde(rename = "gameState")]
        game_state: WordTable,
    },

    #[serde(rename = "error", alias = "server_error")]
    ServerError { message: String },
}

impl InboundEvent {
    /// Parse one raw frame.
    ///
    /// The tag is checked against [`INBOUND_TAGS`] before the payload is
    /// decoded, so an unknown tag is distinguishable from a bad payload.
    pub fn parse(raw: &str) -> Result<Self, FrameError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let tag = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .ok_or(FrameError::MissingTag)?;
        if !INBOUND_TAGS.contains(&tag) {
            return Err(FrameError::UnknownTag(tag.to_string()));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Canonical wire tag, used in diagnostics.
    pub fn tag(&self) -> &'static str {
        match self {
            InboundEvent::Broadcast { .. } => "broadcast",
            InboundEvent::PrivateMessage { .. } => "private_message",
            InboundEvent::Roster { .. } => "usernames",
            InboundEvent::RoomList { .. } => "available_rooms",
            InboundEvent::RoomMembership { .. } => "joined_rooms",
            InboundEvent::RoomMessage { .. } => "room_message",
            InboundEvent::RoomOccupancy { .. } => "room_user_count",
            InboundEvent::CardGameLobby { .. } => "poker_lobby_update",
            InboundEvent::CardGameTable { .. } => "poker_game_state",
            InboundEvent::CardGameHand { .. } => "poker_hand",
            InboundEvent::CardGameLeft {} => "poker_left_game",
            InboundEvent::WordGameLobby { .. } => "hangman_lobby_update",
            InboundEvent::WordGameTable { .. } => "hangman_game_state",
            InboundEvent::ServerError { .. } => "error",
        }
    }
}

/// Betting actions accepted by the poker table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CardAction {
    Fold,
    Check,
    Call,
    Raise,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum OutboundIntent {
    #[serde(rename = "broadcast")]
    SendBroadcast { content: String },

    #[serde(rename = "private_message")]
    SendPrivate { to: String, text: String },

    #[serde(rename = "create_room")]
    CreateRoom { room: String },

    #[serde(rename = "join_room")]
    JoinRoom { room: String },

    #[serde(rename = "leave_room")]
    LeaveRoom { room: String },

    #[serde(rename = "sendRoomMessage")]
    SendRoomMessage { room: String, text: String },

    #[serde(rename = "poker_action", rename_all = "camelCase")]
    CardGameAction {
        game_id: String,
        action: CardAction,
        amount: u64,
    },

    #[serde(rename = "poker_start_game", rename_all = "camelCase")]
    CardGameStart { game_id: String },

    #[serde(rename = "poker_start_new_hand", rename_all = "camelCase")]
    CardGameNewHand { game_id: String },

    #[serde(rename = "poker_leave_game", rename_all = "camelCase")]
    CardGameLeave { game_id: String },

    #[serde(rename = "hangman_set_word", rename_all = "camelCase")]
    WordGameSetWord { game_id: String, word: String },

    #[serde(rename = "hangman_guess_letter", rename_all = "camelCase")]
    WordGameGuessLetter { game_id: String, letter: String },
}

impl OutboundIntent {
    /// Free text typed into the global chat box.
    pub fn broadcast(text: impl Into<String>) -> Self {
        OutboundIntent::SendBroadcast {
            content: text.into(),
        }
    }

    /// The game this intent acts on, if it is a game action.
    pub fn game_id(&self) -> Option<&str> {
        match self {
            OutboundIntent::CardGameAction { game_id, .. }
            | OutboundIntent::CardGameStart { game_id }
            | OutboundIntent::CardGameNewHand { game_id }
            | OutboundIntent::CardGameLeave { game_id }
            | OutboundIntent::WordGameSetWord { game_id, .. }
            | OutboundIntent::WordGameGuessLetter { game_id, .. } => Some(game_id),
            _ => None,
        }
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<&str> for OutboundIntent {
    fn from(text: &str) -> Self {
        OutboundIntent::broadcast(text)
    }
}

impl From<String> for OutboundIntent {
    fn from(text: String) -> Self {
        OutboundIntent::broadcast(text)
    }
}
