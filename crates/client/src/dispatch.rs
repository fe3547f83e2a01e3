//! Inbound frame routing.
//!
//! One raw frame in, at most one state slice touched. Frames are handled in
//! arrival order with no buffering; a frame that fails to parse is dropped on
//! its own and never affects the next one.

use chatgames_shared::{FrameError, GameKind, InboundEvent};

use crate::navigation::{self, Navigator, Route};
use crate::stores::{ChatMessage, ClientState};

/// Something the user should be told about, outside of the state slices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The server reported an error over the connection.
    ServerError(String),
    /// A lobby create/join request was refused or failed.
    Lobby { kind: GameKind, message: String },
}

/// What routing one frame did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// A pushed listing replaced a lobby slice.
    LobbyPushed(GameKind),
    Notice(Notice),
    Dropped,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Dispatcher {
    routed: u64,
    dropped: u64,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_routed(&self) -> u64 {
        self.routed
    }

    pub fn frames_dropped(&self) -> u64 {
        self.dropped
    }

    pub fn on_frame(
        &mut self,
        raw: &str,
        state: &mut ClientState,
        nav: &mut dyn Navigator,
    ) -> Outcome {
        let event = match InboundEvent::parse(raw) {
            Ok(event) => event,
            Err(FrameError::UnknownTag(tag)) => {
                crate::log_warn!("dropping frame with unknown type '{}'", tag);
                self.dropped += 1;
                return Outcome::Dropped;
            }
            Err(e) => {
                crate::log_error!("dropping malformed frame: {} ({} bytes)", e, raw.len());
                self.dropped += 1;
                return Outcome::Dropped;
            }
        };

        crate::log_debug!("routing {}", event.tag());
        self.routed += 1;
        route(event, state, nav)
    }
}

fn route(event: InboundEvent, state: &mut ClientState, nav: &mut dyn Navigator) -> Outcome {
    match event {
        InboundEvent::Broadcast { content, username } => {
            state.messages.push(ChatMessage::broadcast(username, content));
        }
        InboundEvent::PrivateMessage { sender, to, text } => {
            state.messages.push(ChatMessage::private(sender, to, text));
        }
        InboundEvent::Roster { content } => state.roster.set(content),
        InboundEvent::RoomList { content } => state.rooms.set_available(content),
        InboundEvent::RoomMembership { content } => state.rooms.set_joined(content),
        InboundEvent::RoomMessage {
            room,
            sender,
            text,
            timestamp,
        } => {
            state
                .messages
                .push(ChatMessage::room(room, sender, text, timestamp));
        }
        InboundEvent::RoomOccupancy { room, count } => state.rooms.set_count(room, count),
        InboundEvent::CardGameLobby { games } => {
            state.card_game.lobby.apply_push(games);
            return Outcome::LobbyPushed(GameKind::Card);
        }
        InboundEvent::CardGameTable { game_state } => {
            let game_id = game_state.game_id.clone();
            state.card_game.set_table(game_state);
            correct_navigation(GameKind::Card, &game_id, nav);
        }
        InboundEvent::CardGameHand { hand } => state.card_game.set_hand(hand),
        InboundEvent::CardGameLeft {} => {
            state.card_game.leave();
            nav.navigate(Route::CardLobby);
        }
        InboundEvent::WordGameLobby { games } => {
            state.word_game.lobby.apply_push(games);
            return Outcome::LobbyPushed(GameKind::Word);
        }
        InboundEvent::WordGameTable { game_state } => {
            let game_id = game_state.game_id.clone();
            state.word_game.set_table(game_state);
            correct_navigation(GameKind::Word, &game_id, nav);
        }
        InboundEvent::ServerError { message } => {
            crate::log_warn!("server error: {}", message);
            return Outcome::Notice(Notice::ServerError(message));
        }
    }
    Outcome::Applied
}

fn correct_navigation(kind: GameKind, game_id: &str, nav: &mut dyn Navigator) {
    let current = nav.current_route();
    if let Some(target) = navigation::table_correction(kind, game_id, current.as_ref()) {
        crate::log_debug!("following {} table to {}", kind, target);
        nav.navigate(target);
    }
}
