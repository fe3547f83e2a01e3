//! Frames in over the connection, state and navigation out.

mod common;

use chatgames_client::dispatch::Notice;
use chatgames_client::stores::MessageKind;
use chatgames_client::{HeadlessNavigator, Route, Update};
use chatgames_shared::{CardAction, GameKind};
use common::Harness;
use serde_json::json;

#[tokio::test]
async fn login_flow_primes_lobbies_then_applies_push() {
    let mut h = Harness::new();
    let server = h.login("alice").await;
    assert_eq!(server.username().as_deref(), Some("alice"));

    let mut kinds = Vec::new();
    for _ in 0..2 {
        let fetch = h.next_fetch().await;
        kinds.push(fetch.kind);
        fetch.respond(Vec::new());
    }
    assert!(kinds.contains(&GameKind::Card));
    assert!(kinds.contains(&GameKind::Word));

    server.push_json(json!({
        "type": "poker_lobby_update",
        "games": [{"gameId": "g1", "participantCount": 1}]
    }));
    h.pump_until(|c| !c.state().card_game.lobby.games().is_empty())
        .await;

    let lobby = h.client.state().card_game.lobby.games();
    assert_eq!(lobby.len(), 1);
    assert_eq!(lobby[0].game_id, "g1");
    assert_eq!(lobby[0].participant_count, Some(1));
}

#[tokio::test]
async fn frames_apply_in_arrival_order() {
    let mut h = Harness::new();
    let server = h.login("alice").await;

    server.push_json(json!({"type": "broadcast", "content": "1", "username": "bob"}));
    server.push_json(json!({"type": "private_message", "sender": "bob", "to": "alice", "text": "2"}));
    server.push_json(json!({"type": "room_message", "room": "general", "sender": "carol", "text": "3",
                            "timestamp": "2024-05-01T10:00:00Z"}));
    server.push_json(json!({"type": "private_message", "sender": "alice", "to": "bob", "text": "4"}));
    server.push_json(json!({"type": "broadcast", "content": "5", "username": "dave"}));
    h.pump_until(|c| c.state().messages.len() == 5).await;

    let feed = h.client.state().messages.all();
    let texts: Vec<_> = feed.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, ["1", "2", "3", "4", "5"]);
    assert_eq!(feed[2].kind, MessageKind::Room);
    assert!(feed[2].timestamp.is_some());

    let convo: Vec<_> = h
        .client
        .state()
        .messages
        .conversation("alice", "bob")
        .map(|m| m.text.as_str())
        .collect();
    assert_eq!(convo, ["2", "4"]);
}

#[tokio::test]
async fn malformed_frame_does_not_block_the_next_one() {
    let mut h = Harness::new();
    let server = h.login("alice").await;

    server.push("{\"type\": \"broadcast\", \"content\": ");
    server.push_json(json!({"type": "broadcast", "content": "still here", "username": "bob"}));

    assert_eq!(h.step().await, Update::Dispatched);
    assert!(h.client.state().messages.is_empty());
    assert_eq!(h.step().await, Update::Dispatched);

    let feed = h.client.state().messages.all();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].text, "still here");
    assert_eq!(feed[0].sender, "bob");
}

#[tokio::test]
async fn replacing_snapshots_is_idempotent() {
    let mut h = Harness::new();
    let server = h.login("alice").await;

    let roster = json!({"type": "usernames", "content": ["alice", "bob"]});
    let rooms = json!({"type": "available_rooms", "content": ["general", "games"]});
    server.push_json(roster.clone());
    server.push_json(rooms.clone());
    h.pump_until(|c| !c.state().rooms.available.is_empty()).await;
    let once = h.client.state().clone();

    server.push_json(roster);
    server.push_json(rooms);
    h.step().await;
    h.step().await;

    assert_eq!(h.client.state().roster, once.roster);
    assert_eq!(h.client.state().rooms, once.rooms);
}

#[tokio::test]
async fn occupancy_updates_touch_one_room() {
    let mut h = Harness::new();
    let server = h.login("alice").await;

    server.push_json(json!({"type": "room_user_count", "room": "general", "count": 3}));
    server.push_json(json!({"type": "room_user_count", "room": "games", "count": 5}));
    server.push_json(json!({"type": "room_user_count", "room": "general", "count": 2}));
    h.pump_until(|c| c.state().rooms.occupancy.len() == 2).await;
    h.pump_until(|c| c.state().rooms.count("general") == Some(2))
        .await;

    assert_eq!(h.client.state().rooms.count("games"), Some(5));
}

#[tokio::test]
async fn joined_rooms_replace_membership() {
    let mut h = Harness::new();
    let server = h.login("alice").await;

    server.push_json(json!({"type": "joined_rooms", "content": ["general"]}));
    server.push_json(json!({"type": "joined_rooms", "content": ["games"]}));
    h.pump_until(|c| c.state().rooms.has_joined("games")).await;

    assert_eq!(h.client.state().rooms.joined, ["games"]);
}

#[tokio::test]
async fn table_snapshot_for_another_game_moves_focus() {
    let nav = HeadlessNavigator::starting_at(Route::CardLobby);
    let mut h = Harness::with_nav(nav.clone());
    let mut server = h.login("alice").await;

    server.push_json(json!({"type": "poker_game_state", "gameState": {"gameId": "g1", "pot": 30}}));
    server.push_json(json!({"type": "poker_hand", "hand": [{"rank": "A", "suit": "S"}, {"rank": "K", "suit": "S"}]}));
    h.pump_until(|c| c.state().card_game.hand().len() == 2).await;
    nav.set_current(Route::CardTable {
        game_id: "g1".into(),
    });

    server.push_json(json!({"type": "poker_game_state", "gameState": {"gameId": "g2"}}));
    h.pump_until(|c| c.state().card_game.focused_game() == Some("g2"))
        .await;

    assert!(h.client.state().card_game.hand().is_empty());
    assert_eq!(
        nav.history(),
        [
            Route::CardTable {
                game_id: "g1".into()
            },
            Route::CardTable {
                game_id: "g2".into()
            },
        ]
    );

    // Actions now target the new game.
    assert!(h.client.card_action(CardAction::Raise, 40));
    let frame: serde_json::Value = serde_json::from_str(&server.recv().await.unwrap()).unwrap();
    assert_eq!(
        frame,
        json!({"type": "poker_action", "gameId": "g2", "action": "raise", "amount": 40})
    );
}

#[tokio::test]
async fn table_snapshot_does_not_interrupt_a_conversation() {
    let nav = HeadlessNavigator::starting_at(Route::PrivateChat {
        partner: "bob".into(),
    });
    let mut h = Harness::with_nav(nav.clone());
    let server = h.login("alice").await;

    server.push_json(json!({"type": "hangman_game_state", "gameState": {"gameId": "w1", "maskedWord": "_ _ _"}}));
    h.pump_until(|c| c.state().word_game.focused_game() == Some("w1"))
        .await;

    assert!(nav.history().is_empty());
}

#[tokio::test]
async fn server_error_becomes_a_notice() {
    let mut h = Harness::new();
    let server = h.login("alice").await;

    server.push_json(json!({"type": "error", "message": "Not your turn"}));
    assert_eq!(
        h.step().await,
        Update::Notice(Notice::ServerError("Not your turn".into()))
    );
    assert!(h.client.state().messages.is_empty());
}

#[tokio::test]
async fn game_actions_without_focus_send_nothing() {
    let mut h = Harness::new();
    let mut server = h.login("alice").await;

    assert!(!h.client.start_card_game());
    assert!(!h.client.start_new_hand());
    assert!(!h.client.guess_letter("e"));
    assert!(!h.client.set_word("rust"));

    assert!(h.client.send_broadcast("marker"));
    let frame: serde_json::Value = serde_json::from_str(&server.recv().await.unwrap()).unwrap();
    assert_eq!(frame["content"], "marker");
}

#[tokio::test]
async fn word_game_intents_use_focused_game() {
    let mut h = Harness::new();
    let mut server = h.login("alice").await;

    server.push_json(json!({"type": "hangman_game_state", "gameState": {"gameId": "w9"}}));
    h.pump_until(|c| c.state().word_game.focused_game().is_some())
        .await;

    assert!(h.client.set_word(" ferris "));
    assert!(h.client.guess_letter("R"));
    let set: serde_json::Value = serde_json::from_str(&server.recv().await.unwrap()).unwrap();
    let guess: serde_json::Value = serde_json::from_str(&server.recv().await.unwrap()).unwrap();
    assert_eq!(set, json!({"type": "hangman_set_word", "gameId": "w9", "word": "ferris"}));
    assert_eq!(guess, json!({"type": "hangman_guess_letter", "gameId": "w9", "letter": "r"}));
}

#[tokio::test]
async fn leaving_a_table_while_offline_clears_it_locally() {
    let nav = HeadlessNavigator::new();
    let mut h = Harness::with_nav(nav.clone());
    let server = h.login("alice").await;

    server.push_json(json!({"type": "poker_game_state", "gameState": {"gameId": "g1"}}));
    server.push_json(json!({"type": "poker_hand", "hand": ["AS", "KD"]}));
    h.pump_until(|c| !c.state().card_game.hand().is_empty()).await;

    drop(server);
    h.pump_until(|c| !c.status().is_connected()).await;

    assert!(!h.client.leave_card_game());
    assert!(h.client.state().card_game.table().is_none());
    assert!(h.client.state().card_game.hand().is_empty());
    assert_eq!(nav.history().last(), Some(&Route::CardLobby));
}

#[tokio::test]
async fn leaving_a_table_while_online_waits_for_the_server() {
    let nav = HeadlessNavigator::new();
    let mut h = Harness::with_nav(nav.clone());
    let mut server = h.login("alice").await;

    server.push_json(json!({"type": "poker_game_state", "gameState": {"gameId": "g1"}}));
    h.pump_until(|c| c.state().card_game.table().is_some()).await;

    assert!(h.client.leave_card_game());
    let frame: serde_json::Value = serde_json::from_str(&server.recv().await.unwrap()).unwrap();
    assert_eq!(frame, json!({"type": "poker_leave_game", "gameId": "g1"}));
    assert!(h.client.state().card_game.table().is_some());

    server.push_json(json!({"type": "poker_left_game"}));
    h.pump_until(|c| c.state().card_game.table().is_none()).await;
    assert_eq!(nav.history().last(), Some(&Route::CardLobby));
}

#[tokio::test]
async fn room_create_records_breadcrumb_and_navigates() {
    let nav = HeadlessNavigator::new();
    let mut h = Harness::with_nav(nav.clone());
    let mut server = h.login("alice").await;

    assert!(h.client.create_room(" Poker Night "));
    assert!(h.client.send_room_message("poker night", "deal me in"));

    let create: serde_json::Value = serde_json::from_str(&server.recv().await.unwrap()).unwrap();
    let message: serde_json::Value = serde_json::from_str(&server.recv().await.unwrap()).unwrap();
    assert_eq!(create, json!({"type": "create_room", "room": "poker night"}));
    assert_eq!(
        message,
        json!({"type": "sendRoomMessage", "room": "poker night", "text": "deal me in"})
    );
    assert_eq!(
        nav.history(),
        [Route::Room {
            name: "poker night".into()
        }]
    );
    assert_eq!(h.client.breadcrumbs().last_room.as_deref(), Some("poker night"));
}
