//! Outbound intent encoding and the send gate.

use chatgames_shared::{CardAction, GameKind, OutboundIntent};

use crate::stores::ClientState;
use crate::ws::TransportManager;

/// Encode and send one intent. Nothing is queued: unless the transport is
/// `Connected` the intent is dropped with a warning.
pub fn send(intent: &OutboundIntent, transport: &TransportManager) -> bool {
    if !transport.is_connected() {
        crate::log_warn!(
            "dropping outbound intent while {:?}: {:?}",
            transport.status(),
            intent
        );
        return false;
    }

    let text = match intent.encode() {
        Ok(text) => text,
        Err(e) => {
            crate::log_error!("failed to encode intent: {}", e);
            return false;
        }
    };
    transport.send_text(text)
}

/// Build a game intent against the game currently in focus.
///
/// Returns `None`, with only a debug line, when no game of that kind is
/// focused.
pub fn for_focused_game(
    state: &ClientState,
    kind: GameKind,
    build: impl FnOnce(String) -> OutboundIntent,
) -> Option<OutboundIntent> {
    match state.focused_game(kind) {
        Some(game_id) => Some(build(game_id.to_string())),
        None => {
            crate::log_debug!("no {} game in focus, ignoring game action", kind);
            None
        }
    }
}

pub fn card_action(game_id: String, action: CardAction, amount: u64) -> OutboundIntent {
    OutboundIntent::CardGameAction {
        game_id,
        action,
        amount,
    }
}

/// Single letter, lower-cased. Anything else is not a guess.
pub fn letter_guess(game_id: String, letter: &str) -> Option<OutboundIntent> {
    let mut chars = letter.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_alphabetic() => Some(OutboundIntent::WordGameGuessLetter {
            game_id,
            letter: c.to_lowercase().collect(),
        }),
        _ => None,
    }
}
