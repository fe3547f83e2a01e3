//! The session multiplexer.
//!
//! [`ChatClient`] owns every piece of client state and processes one event at
//! a time from a single queue. Connection tasks and lobby fetches run in the
//! background and only ever talk to the client through that queue, so no
//! state is shared across tasks.

use std::sync::Arc;

use chatgames_shared::{
    ApiError, CardAction, CreateCardGameRequest, GameKind, GameSummary, JoinCardGameRequest,
    LobbyReply, OutboundIntent, WordGameRequest,
};
use tokio::sync::{mpsc, watch};

use crate::breadcrumbs::{BreadcrumbStore, Breadcrumbs};
use crate::config::ClientConfig;
use crate::controller::{LifecycleAction, SessionController};
use crate::dispatch::{Dispatcher, Notice, Outcome};
use crate::intents;
use crate::lobby_api::LobbyApi;
use crate::navigation::{resolve_entry, Navigator, Route};
use crate::session::{Identity, Session};
use crate::storage::KeyValueStore;
use crate::stores::{ClientState, FetchTicket};
use crate::ws::{ConnectionEvent, ConnectionStatus, Connector, EventSink, TransportManager};

/// Everything that can wake the client up.
#[derive(Debug)]
enum ClientEvent {
    Transport(ConnectionEvent),
    LobbyFetched {
        epoch: u64,
        kind: GameKind,
        ticket: FetchTicket,
        result: Result<Vec<GameSummary>, ApiError>,
    },
    LobbyReplied {
        epoch: u64,
        kind: GameKind,
        game_id: String,
        result: Result<LobbyReply, ApiError>,
    },
}

/// What handling one event amounted to, for hosts that redraw on change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    Status(ConnectionStatus),
    /// A frame was routed into state (or dropped as unparseable).
    Dispatched,
    /// A lobby slice was replaced, by a fetch or a push.
    LobbyRefreshed(GameKind),
    Notice(Notice),
    /// A lobby request succeeded and the view moved to its table.
    Navigated(Route),
    /// Stale or otherwise irrelevant; nothing changed.
    Ignored,
}

pub struct ChatClient {
    config: ClientConfig,
    transport: TransportManager,
    lobby_api: Arc<dyn LobbyApi>,
    breadcrumbs: BreadcrumbStore,
    navigator: Box<dyn Navigator>,
    controller: SessionController,
    dispatcher: Dispatcher,
    state: ClientState,
    /// Bumped on every login and logout; background results issued under an
    /// earlier value are dropped.
    epoch: u64,
    events_tx: mpsc::UnboundedSender<ClientEvent>,
    events_rx: mpsc::UnboundedReceiver<ClientEvent>,
}

impl ChatClient {
    pub fn new(
        config: ClientConfig,
        connector: Arc<dyn Connector>,
        lobby_api: Arc<dyn LobbyApi>,
        store: Arc<dyn KeyValueStore>,
        navigator: Box<dyn Navigator>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let sink_tx = events_tx.clone();
        let on_event: EventSink = Arc::new(move |event| {
            // The receiver lives as long as the client; a failed send means
            // the client is gone and the event has nowhere to go.
            let _ = sink_tx.send(ClientEvent::Transport(event));
        });

        let mut breadcrumbs = BreadcrumbStore::new(store);
        breadcrumbs.restore();

        Self {
            config,
            transport: TransportManager::new(connector, on_event),
            lobby_api,
            breadcrumbs,
            navigator,
            controller: SessionController::new(),
            dispatcher: Dispatcher::new(),
            state: ClientState::default(),
            epoch: 0,
            events_tx,
            events_rx,
        }
    }

    // =========================================
    // Session lifecycle
    // =========================================

    /// React to a login-state change.
    pub fn set_session(&mut self, session: &Session) {
        for action in self.controller.transition(session) {
            match action {
                LifecycleAction::Connect(identity) => self.connect(&identity),
                LifecycleAction::PrimeLobbies => {
                    self.refresh_lobby(GameKind::Card);
                    self.refresh_lobby(GameKind::Word);
                }
                LifecycleAction::Disconnect => {
                    self.epoch += 1;
                    self.transport.close();
                    self.state = ClientState::default();
                }
                LifecycleAction::ClearBreadcrumbs => self.breadcrumbs.clear(),
            }
        }
    }

    fn connect(&mut self, identity: &Identity) {
        self.epoch += 1;
        let url = self.config.connection_url(identity.as_str());
        self.transport.open(identity, url);
    }

    // =========================================
    // Event loop
    // =========================================

    /// Wait for the next event and handle it to completion.
    pub async fn next_event(&mut self) -> Option<Update> {
        let event = self.events_rx.recv().await?;
        Some(self.handle(event))
    }

    /// Handle events until the queue closes. For hosts that only read state.
    pub async fn run(mut self) {
        while let Some(update) = self.next_event().await {
            if let Update::Notice(notice) = update {
                crate::log_info!("notice: {:?}", notice);
            }
        }
    }

    fn handle(&mut self, event: ClientEvent) -> Update {
        match event {
            ClientEvent::Transport(event) => self.on_transport(event),
            ClientEvent::LobbyFetched {
                epoch,
                kind,
                ticket,
                result,
            } => {
                if epoch != self.epoch {
                    crate::log_debug!("dropping {} lobby fetch from an earlier session", kind);
                    return Update::Ignored;
                }
                self.on_lobby_fetched(kind, ticket, result)
            }
            ClientEvent::LobbyReplied {
                epoch,
                kind,
                game_id,
                result,
            } => {
                if epoch != self.epoch {
                    return Update::Ignored;
                }
                self.on_lobby_replied(kind, game_id, result)
            }
        }
    }

    fn on_transport(&mut self, event: ConnectionEvent) -> Update {
        let before = self.transport.status();
        match self.transport.accept(event) {
            Some(text) => {
                match self
                    .dispatcher
                    .on_frame(&text, &mut self.state, self.navigator.as_mut())
                {
                    Outcome::Notice(notice) => Update::Notice(notice),
                    Outcome::LobbyPushed(kind) => Update::LobbyRefreshed(kind),
                    Outcome::Applied | Outcome::Dropped => Update::Dispatched,
                }
            }
            None => {
                let after = self.transport.status();
                if after != before {
                    Update::Status(after)
                } else {
                    Update::Ignored
                }
            }
        }
    }

    fn on_lobby_fetched(
        &mut self,
        kind: GameKind,
        ticket: FetchTicket,
        result: Result<Vec<GameSummary>, ApiError>,
    ) -> Update {
        let games = match result {
            Ok(games) => games,
            Err(e) => {
                crate::log_warn!("{} lobby fetch failed, keeping last listing: {}", kind, e);
                return Update::Ignored;
            }
        };

        let policy = self.config.lobby_policy;
        if self.state.lobby_mut(kind).apply_fetch(ticket, games, policy) {
            Update::LobbyRefreshed(kind)
        } else {
            crate::log_debug!("{} lobby fetch #{} overtaken, dropped", kind, ticket.seq);
            Update::Ignored
        }
    }

    fn on_lobby_replied(
        &mut self,
        kind: GameKind,
        game_id: String,
        result: Result<LobbyReply, ApiError>,
    ) -> Update {
        match result {
            Ok(_) => {
                crate::log_info!("entered {} game {}", kind, game_id);
                let route = Route::table(kind, game_id);
                self.navigator.navigate(route.clone());
                self.refresh_lobby(kind);
                Update::Navigated(route)
            }
            Err(e) => {
                let message = match e {
                    ApiError::Rejected(message) => message,
                    other => other.to_string(),
                };
                Update::Notice(Notice::Lobby { kind, message })
            }
        }
    }

    // =========================================
    // Read access
    // =========================================

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn status(&self) -> ConnectionStatus {
        self.transport.status()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.transport.subscribe()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.controller.identity()
    }

    pub fn breadcrumbs(&self) -> &Breadcrumbs {
        self.breadcrumbs.current()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // =========================================
    // Chat
    // =========================================

    /// Send any intent; bare text becomes a broadcast.
    pub fn send(&self, intent: impl Into<OutboundIntent>) -> bool {
        intents::send(&intent.into(), &self.transport)
    }

    pub fn send_broadcast(&self, text: &str) -> bool {
        self.send(OutboundIntent::broadcast(text))
    }

    pub fn send_private(&self, to: &str, text: &str) -> bool {
        self.send(OutboundIntent::SendPrivate {
            to: to.to_string(),
            text: text.to_string(),
        })
    }

    pub fn create_room(&mut self, name: &str) -> bool {
        let Some(room) = normalize_room(name) else {
            return false;
        };
        let sent = self.send(OutboundIntent::CreateRoom { room: room.clone() });
        self.enter_room(room);
        sent
    }

    pub fn join_room(&mut self, name: &str) -> bool {
        let Some(room) = normalize_room(name) else {
            return false;
        };
        let sent = self.send(OutboundIntent::JoinRoom { room: room.clone() });
        self.enter_room(room);
        sent
    }

    fn enter_room(&mut self, room: String) {
        self.breadcrumbs.record_room(&room);
        self.navigator.navigate(Route::Room { name: room });
    }

    pub fn leave_room(&self, name: &str) -> bool {
        self.send(OutboundIntent::LeaveRoom {
            room: name.to_string(),
        })
    }

    pub fn send_room_message(&self, room: &str, text: &str) -> bool {
        self.send(OutboundIntent::SendRoomMessage {
            room: room.to_string(),
            text: text.to_string(),
        })
    }

    // =========================================
    // Navigation
    // =========================================

    /// A private conversation is on screen.
    pub fn view_private(&mut self, partner: &str) {
        self.breadcrumbs.record_private_partner(partner);
    }

    /// A room is on screen.
    pub fn view_room(&mut self, room: &str) {
        self.breadcrumbs.record_room(room);
    }

    /// Open a section, landing wherever the breadcrumbs or the focused table
    /// say the user left off. Returns the route navigated to.
    pub fn enter_section(&mut self, requested: Route) -> Route {
        let route = match requested {
            Route::CardLobby => match self.state.card_game.focused_game() {
                Some(game_id) => Route::table(GameKind::Card, game_id),
                None => Route::CardLobby,
            },
            other => resolve_entry(other, self.breadcrumbs.current()),
        };
        self.navigator.navigate(route.clone());
        route
    }

    // =========================================
    // Card game
    // =========================================

    pub fn card_action(&self, action: CardAction, amount: u64) -> bool {
        self.send_to_focused(GameKind::Card, |game_id| {
            intents::card_action(game_id, action, amount)
        })
    }

    pub fn start_card_game(&self) -> bool {
        self.send_to_focused(GameKind::Card, |game_id| OutboundIntent::CardGameStart {
            game_id,
        })
    }

    pub fn start_new_hand(&self) -> bool {
        self.send_to_focused(GameKind::Card, |game_id| OutboundIntent::CardGameNewHand {
            game_id,
        })
    }

    /// Ask the server to take us off the table. Without a live connection (or
    /// without a table) there is nobody to ask, so the table is dropped
    /// locally right away.
    pub fn leave_card_game(&mut self) -> bool {
        if self.transport.is_connected() {
            if let Some(game_id) = self.state.card_game.focused_game() {
                return self.send(OutboundIntent::CardGameLeave {
                    game_id: game_id.to_string(),
                });
            }
        }
        self.state.card_game.leave();
        self.navigator.navigate(Route::CardLobby);
        false
    }

    // =========================================
    // Word game
    // =========================================

    pub fn set_word(&self, word: &str) -> bool {
        let word = word.trim().to_string();
        self.send_to_focused(GameKind::Word, |game_id| OutboundIntent::WordGameSetWord {
            game_id,
            word,
        })
    }

    pub fn guess_letter(&self, letter: &str) -> bool {
        let Some(game_id) = self.state.word_game.focused_game() else {
            crate::log_debug!("no word game in focus, ignoring guess");
            return false;
        };
        match intents::letter_guess(game_id.to_string(), letter) {
            Some(intent) => self.send(intent),
            None => {
                crate::log_debug!("ignoring guess '{}'", letter);
                false
            }
        }
    }

    fn send_to_focused(
        &self,
        kind: GameKind,
        build: impl FnOnce(String) -> OutboundIntent,
    ) -> bool {
        match intents::for_focused_game(&self.state, kind, build) {
            Some(intent) => self.send(intent),
            None => false,
        }
    }

    // =========================================
    // Lobbies
    // =========================================

    /// Fetch a lobby listing in the background. The result comes back through
    /// the event queue and goes through the freshness guard.
    pub fn refresh_lobby(&mut self, kind: GameKind) {
        let ticket = self.state.lobby_mut(kind).begin_fetch();
        let api = self.lobby_api.clone();
        let tx = self.events_tx.clone();
        let epoch = self.epoch;

        tokio::spawn(async move {
            let result = api.list_games(kind).await;
            let _ = tx.send(ClientEvent::LobbyFetched {
                epoch,
                kind,
                ticket,
                result,
            });
        });
    }

    pub fn create_card_game(&mut self, mut req: CreateCardGameRequest) -> bool {
        let Some(username) = self.username("create a card game") else {
            return false;
        };
        req.username = username;
        let game_id = req.game_id.clone();
        self.lobby_request(GameKind::Card, game_id, move |api| async move {
            api.create_card_game(&req).await
        })
    }

    pub fn join_card_game(&mut self, game_id: &str, password: Option<String>, stack: u32) -> bool {
        let Some(username) = self.username("join a card game") else {
            return false;
        };
        let req = JoinCardGameRequest {
            game_id: game_id.to_string(),
            username,
            password,
            stack,
        };
        self.lobby_request(GameKind::Card, game_id.to_string(), move |api| async move {
            api.join_card_game(&req).await
        })
    }

    pub fn create_word_game(&mut self, game_id: &str) -> bool {
        let Some(req) = self.word_request(game_id, "create a word game") else {
            return false;
        };
        self.lobby_request(GameKind::Word, game_id.to_string(), move |api| async move {
            api.create_word_game(&req).await
        })
    }

    pub fn join_word_game(&mut self, game_id: &str) -> bool {
        let Some(req) = self.word_request(game_id, "join a word game") else {
            return false;
        };
        self.lobby_request(GameKind::Word, game_id.to_string(), move |api| async move {
            api.join_word_game(&req).await
        })
    }

    fn word_request(&self, game_id: &str, what: &str) -> Option<WordGameRequest> {
        Some(WordGameRequest {
            game_id: game_id.to_string(),
            username: self.username(what)?,
        })
    }

    fn username(&self, what: &str) -> Option<String> {
        match self.controller.identity() {
            Some(identity) => Some(identity.as_str().to_string()),
            None => {
                crate::log_warn!("cannot {} while logged out", what);
                None
            }
        }
    }

    fn lobby_request<F, Fut>(&self, kind: GameKind, game_id: String, call: F) -> bool
    where
        F: FnOnce(Arc<dyn LobbyApi>) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<LobbyReply, ApiError>> + Send + 'static,
    {
        let api = self.lobby_api.clone();
        let tx = self.events_tx.clone();
        let epoch = self.epoch;

        tokio::spawn(async move {
            let result = call(api).await;
            let _ = tx.send(ClientEvent::LobbyReplied {
                epoch,
                kind,
                game_id,
                result,
            });
        });
        true
    }
}

/// Room names are case-insensitive and trimmed before they reach the server.
pub fn normalize_room(name: &str) -> Option<String> {
    let room = name.trim().to_lowercase();
    (!room.is_empty()).then_some(room)
}
