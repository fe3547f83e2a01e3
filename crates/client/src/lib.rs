//! Chatgames client - connection and session multiplexer
//!
//! One WebSocket carries global chat, private messages, rooms and two games
//! (a card game and a word game). This crate owns that connection across the
//! login lifecycle, routes every inbound frame into the matching state slice,
//! encodes outbound intents, and keeps the small bits of navigation memory the
//! host application needs.

pub mod logging;

pub mod breadcrumbs;
pub mod client;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod intents;
pub mod lobby_api;
pub mod navigation;
pub mod session;
pub mod storage;
pub mod stores;
pub mod ws;

pub use breadcrumbs::{BreadcrumbStore, Breadcrumbs};
pub use client::{ChatClient, Update};
pub use config::ClientConfig;
pub use dispatch::{Dispatcher, Notice, Outcome};
pub use error::{ClientError, Result};
pub use lobby_api::{HttpLobbyApi, LobbyApi};
pub use navigation::{HeadlessNavigator, Navigator, Route};
pub use session::{Capability, Identity, Session};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use stores::{ClientState, LobbyPolicy};
pub use ws::{ConnectionStatus, Connector, WebSocketConnector};
