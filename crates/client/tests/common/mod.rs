//! Shared fixtures: an in-memory transport, a lobby API the test answers by
//! hand, and a harness wiring them into a client.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chatgames_client::ws::{Connector, FramePair, TransportError};
use chatgames_client::{
    ChatClient, ClientConfig, ConnectionStatus, HeadlessNavigator, LobbyApi, MemoryStore,
    Session, Update,
};
use chatgames_shared::{
    ApiError, CreateCardGameRequest, GameKind, GameSummary, JoinCardGameRequest, LobbyReply,
    WordGameRequest,
};
use futures_channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, oneshot};
use url::Url;

const WAIT: Duration = Duration::from_secs(5);

// =========================================
// Transport
// =========================================

/// The server's side of one in-memory connection.
pub struct ServerEnd {
    pub url: Url,
    to_client: UnboundedSender<String>,
    from_client: UnboundedReceiver<String>,
}

impl ServerEnd {
    pub fn push(&self, frame: impl Into<String>) {
        let _ = self.to_client.unbounded_send(frame.into());
    }

    pub fn push_json(&self, value: serde_json::Value) {
        self.push(value.to_string());
    }

    /// Next frame the client wrote, or `None` once the client closed.
    pub async fn recv(&mut self) -> Option<String> {
        tokio::time::timeout(WAIT, self.from_client.next())
            .await
            .expect("timed out waiting for a client frame")
    }

    /// A frame the client already wrote, without waiting.
    pub fn try_recv(&mut self) -> Option<String> {
        self.from_client.try_next().ok().flatten()
    }

    pub fn username(&self) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == "username")
            .map(|(_, v)| v.into_owned())
    }
}

pub struct MemoryConnector {
    servers: mpsc::UnboundedSender<ServerEnd>,
    attempts: AtomicUsize,
    refuse: AtomicBool,
}

impl MemoryConnector {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<ServerEnd>) {
        let (servers, rx) = mpsc::unbounded_channel();
        let connector = Arc::new(Self {
            servers,
            attempts: AtomicUsize::new(0),
            refuse: AtomicBool::new(false),
        });
        (connector, rx)
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn refuse(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn connect(&self, url: &Url) -> Result<FramePair, TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.refuse.load(Ordering::SeqCst) {
            return Err(TransportError::Connect("connection refused".into()));
        }

        let (client_tx, from_client) = unbounded::<String>();
        let (to_client, client_rx) = unbounded::<String>();

        self.servers
            .send(ServerEnd {
                url: url.clone(),
                to_client,
                from_client,
            })
            .map_err(|_| TransportError::Closed)?;

        Ok(FramePair {
            sink: Box::pin(client_tx.sink_map_err(|_| TransportError::Closed)),
            stream: Box::pin(client_rx.map(Ok::<String, TransportError>)),
        })
    }
}

// =========================================
// Lobby API
// =========================================

/// A lobby listing request waiting for the test to answer it.
pub struct PendingFetch {
    pub kind: GameKind,
    reply: oneshot::Sender<Result<Vec<GameSummary>, ApiError>>,
}

impl PendingFetch {
    pub fn respond(self, games: Vec<GameSummary>) {
        let _ = self.reply.send(Ok(games));
    }

    pub fn fail(self, error: ApiError) {
        let _ = self.reply.send(Err(error));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LobbyCall {
    CreateCard(CreateCardGameRequest),
    JoinCard(JoinCardGameRequest),
    CreateWord(WordGameRequest),
    JoinWord(WordGameRequest),
}

/// Listings wait for the test; create/join answer from a queue of replies
/// (success when the queue is empty).
pub struct ManualLobby {
    fetches: mpsc::UnboundedSender<PendingFetch>,
    replies: Mutex<VecDeque<Result<LobbyReply, ApiError>>>,
    calls: Mutex<Vec<LobbyCall>>,
}

impl ManualLobby {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<PendingFetch>) {
        let (fetches, rx) = mpsc::unbounded_channel();
        let lobby = Arc::new(Self {
            fetches,
            replies: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        });
        (lobby, rx)
    }

    pub fn queue_reply(&self, reply: Result<LobbyReply, ApiError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn calls(&self) -> Vec<LobbyCall> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self, call: LobbyCall) -> Result<LobbyReply, ApiError> {
        self.calls.lock().unwrap().push(call);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(LobbyReply {
                success: true,
                message: None,
            }))
    }
}

#[async_trait]
impl LobbyApi for ManualLobby {
    async fn list_games(&self, kind: GameKind) -> Result<Vec<GameSummary>, ApiError> {
        let (reply, rx) = oneshot::channel();
        let _ = self.fetches.send(PendingFetch { kind, reply });
        rx.await
            .unwrap_or_else(|_| Err(ApiError::Network("fetch abandoned".into())))
    }

    async fn create_card_game(&self, req: &CreateCardGameRequest) -> Result<LobbyReply, ApiError> {
        self.answer(LobbyCall::CreateCard(req.clone()))
    }

    async fn join_card_game(&self, req: &JoinCardGameRequest) -> Result<LobbyReply, ApiError> {
        self.answer(LobbyCall::JoinCard(req.clone()))
    }

    async fn create_word_game(&self, req: &WordGameRequest) -> Result<LobbyReply, ApiError> {
        self.answer(LobbyCall::CreateWord(req.clone()))
    }

    async fn join_word_game(&self, req: &WordGameRequest) -> Result<LobbyReply, ApiError> {
        self.answer(LobbyCall::JoinWord(req.clone()))
    }
}

// =========================================
// Harness
// =========================================

pub struct Harness {
    pub client: ChatClient,
    pub connector: Arc<MemoryConnector>,
    pub servers: mpsc::UnboundedReceiver<ServerEnd>,
    pub lobby: Arc<ManualLobby>,
    pub fetches: mpsc::UnboundedReceiver<PendingFetch>,
    pub store: MemoryStore,
    pub nav: HeadlessNavigator,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(ClientConfig::default(), HeadlessNavigator::new(), MemoryStore::new())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self::build(config, HeadlessNavigator::new(), MemoryStore::new())
    }

    pub fn with_nav(nav: HeadlessNavigator) -> Self {
        Self::build(ClientConfig::default(), nav, MemoryStore::new())
    }

    pub fn with_store(store: MemoryStore) -> Self {
        Self::build(ClientConfig::default(), HeadlessNavigator::new(), store)
    }

    fn build(config: ClientConfig, nav: HeadlessNavigator, store: MemoryStore) -> Self {
        let (connector, servers) = MemoryConnector::new();
        let (lobby, fetches) = ManualLobby::new();
        let client = ChatClient::new(
            config,
            connector.clone(),
            lobby.clone(),
            Arc::new(store.clone()),
            Box::new(nav.clone()),
        );
        Self {
            client,
            connector,
            servers,
            lobby,
            fetches,
            store,
            nav,
        }
    }

    /// Log in, accept the connection and wait until the client reports it open.
    pub async fn login(&mut self, name: &str) -> ServerEnd {
        self.client.set_session(&Session::guest(name).unwrap());
        let server = self.next_server().await;
        self.pump_until(|c| c.status() == ConnectionStatus::Connected)
            .await;
        server
    }

    pub async fn next_server(&mut self) -> ServerEnd {
        tokio::time::timeout(WAIT, self.servers.recv())
            .await
            .expect("timed out waiting for a connection")
            .expect("connector dropped")
    }

    pub async fn next_fetch(&mut self) -> PendingFetch {
        tokio::time::timeout(WAIT, self.fetches.recv())
            .await
            .expect("timed out waiting for a lobby fetch")
            .expect("lobby dropped")
    }

    /// Handle one event.
    pub async fn step(&mut self) -> Update {
        tokio::time::timeout(WAIT, self.client.next_event())
            .await
            .expect("timed out waiting for a client event")
            .expect("event queue closed")
    }

    /// Handle events until `done` holds.
    pub async fn pump_until(&mut self, mut done: impl FnMut(&ChatClient) -> bool) {
        while !done(&self.client) {
            self.step().await;
        }
    }
}

pub fn games(ids: &[&str]) -> Vec<GameSummary> {
    ids.iter().map(|id| GameSummary::new(*id)).collect()
}
