//! Word-game slice: lobby listing and the focused game.

use chatgames_shared::WordTable;

use super::lobby::LobbySlice;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WordGameState {
    pub lobby: LobbySlice,
    table: Option<WordTable>,
}

impl WordGameState {
    pub fn table(&self) -> Option<&WordTable> {
        self.table.as_ref()
    }

    pub fn focused_game(&self) -> Option<&str> {
        self.table.as_ref().map(|t| t.game_id.as_str())
    }

    /// Wholesale replace; a different game id simply becomes the focus.
    pub fn set_table(&mut self, table: WordTable) {
        self.table = Some(table);
    }
}
