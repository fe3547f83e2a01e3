//! Lobby listing slice with a sequence-stamp guard for REST fetch results.
//!
//! Lobby snapshots reach the client two ways: pushed over the connection and
//! fetched from the REST endpoint. A fetch is not cancellable, so a slow
//! response can land after a newer push or after a fetch issued later. Each
//! fetch carries a sequence number and the push count it started from; under
//! [`LobbyPolicy::Strict`] it is discarded if a push arrived since, or if a
//! later fetch has already been applied.

use std::str::FromStr;

use chatgames_shared::GameSummary;

use crate::error::ClientError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LobbyPolicy {
    /// Drop fetch results that are older than something already applied.
    #[default]
    Strict,
    /// Apply every result in arrival order.
    LastWriteWins,
}

impl FromStr for LobbyPolicy {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(LobbyPolicy::Strict),
            "last-write-wins" | "lww" => Ok(LobbyPolicy::LastWriteWins),
            other => Err(ClientError::Config(format!("unknown lobby policy '{other}'"))),
        }
    }
}

/// Issued when a fetch starts, handed back with its result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub base_pushes: u64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LobbySlice {
    games: Vec<GameSummary>,
    pushes: u64,
    next_seq: u64,
    /// Highest fetch sequence applied so far.
    applied_seq: u64,
}

impl LobbySlice {
    pub fn games(&self) -> &[GameSummary] {
        &self.games
    }

    pub fn find(&self, game_id: &str) -> Option<&GameSummary> {
        self.games.iter().find(|g| g.game_id == game_id)
    }

    /// A pushed snapshot always wins.
    pub fn apply_push(&mut self, games: Vec<GameSummary>) {
        self.games = games;
        self.pushes += 1;
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.next_seq += 1;
        FetchTicket {
            seq: self.next_seq,
            base_pushes: self.pushes,
        }
    }

    /// Returns whether the result was applied.
    pub fn apply_fetch(
        &mut self,
        ticket: FetchTicket,
        games: Vec<GameSummary>,
        policy: LobbyPolicy,
    ) -> bool {
        if policy == LobbyPolicy::Strict
            && (ticket.base_pushes != self.pushes || ticket.seq < self.applied_seq)
        {
            return false;
        }
        self.games = games;
        self.applied_seq = self.applied_seq.max(ticket.seq);
        true
    }
}
