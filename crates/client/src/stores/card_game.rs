//! Card-game slice: lobby listing, the focused table and this viewer's hand.

use chatgames_shared::{Card, CardTable};

use super::lobby::LobbySlice;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CardGameState {
    pub lobby: LobbySlice,
    table: Option<CardTable>,
    hand: Vec<Card>,
}

impl CardGameState {
    pub fn table(&self) -> Option<&CardTable> {
        self.table.as_ref()
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn focused_game(&self) -> Option<&str> {
        self.table.as_ref().map(|t| t.game_id.as_str())
    }

    /// Replace the focused table. A different game id is a focus switch: the
    /// previous table is discarded and its hand goes with it, since the new
    /// table's hand follows on its own frame.
    pub fn set_table(&mut self, table: CardTable) {
        if self.focused_game() != Some(table.game_id.as_str()) {
            self.hand.clear();
        }
        self.table = Some(table);
    }

    pub fn set_hand(&mut self, hand: Vec<Card>) {
        self.hand = hand;
    }

    /// The server confirmed we left; drop the table and the hand.
    pub fn leave(&mut self) {
        self.table = None;
        self.hand.clear();
    }
}
