//! Client state, one independent slice per sub-protocol.
//!
//! Slices are plain values owned by the client runtime. Each exposes the
//! reducers the dispatcher needs and read accessors for the view layer; no
//! slice knows about any other.

pub mod card_game;
pub mod lobby;
pub mod messages;
pub mod rooms;
pub mod roster;
pub mod word_game;

pub use card_game::CardGameState;
pub use lobby::{FetchTicket, LobbyPolicy, LobbySlice};
pub use messages::{ChatMessage, MessageFeed, MessageKind};
pub use rooms::RoomsState;
pub use roster::Roster;
pub use word_game::WordGameState;

use chatgames_shared::GameKind;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClientState {
    pub roster: Roster,
    pub messages: MessageFeed,
    pub rooms: RoomsState,
    pub card_game: CardGameState,
    pub word_game: WordGameState,
}

impl ClientState {
    pub fn lobby(&self, kind: GameKind) -> &LobbySlice {
        match kind {
            GameKind::Card => &self.card_game.lobby,
            GameKind::Word => &self.word_game.lobby,
        }
    }

    pub fn lobby_mut(&mut self, kind: GameKind) -> &mut LobbySlice {
        match kind {
            GameKind::Card => &mut self.card_game.lobby,
            GameKind::Word => &mut self.word_game.lobby,
        }
    }

    /// Game currently in focus for `kind`, if any.
    pub fn focused_game(&self, kind: GameKind) -> Option<&str> {
        match kind {
            GameKind::Card => self.card_game.focused_game(),
            GameKind::Word => self.word_game.focused_game(),
        }
    }
}
