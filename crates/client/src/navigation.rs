//! Routes of the host application and the navigation decisions the
//! multiplexer is allowed to make on its own.
//!
//! The view layer is injected as a [`Navigator`]: the client can ask where the
//! user currently is and request a move, but it never reads ambient state.

use std::fmt;
use std::sync::{Arc, Mutex};

use chatgames_shared::GameKind;

use crate::breadcrumbs::Breadcrumbs;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Global,
    Rooms,
    Room { name: String },
    Private,
    PrivateChat { partner: String },
    CardLobby,
    CardTable { game_id: String },
    WordLobby,
    WordTable { game_id: String },
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Global => "/home/global".to_string(),
            Route::Rooms => "/home/rooms".to_string(),
            Route::Room { name } => format!("/home/rooms/{name}"),
            Route::Private => "/home/private".to_string(),
            Route::PrivateChat { partner } => format!("/home/private/{partner}"),
            Route::CardLobby => "/home/poker".to_string(),
            Route::CardTable { game_id } => format!("/home/poker/table/{game_id}"),
            Route::WordLobby => "/home/hangman".to_string(),
            Route::WordTable { game_id } => format!("/home/hangman/game/{game_id}"),
        }
    }

    /// Inverse of [`path`](Self::path). `/home` and `/home/` land on the global chat.
    pub fn parse(path: &str) -> Option<Self> {
        let rest = path.trim_end_matches('/').strip_prefix("/home")?;
        let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
        let route = match segments.as_slice() {
            [] | ["global"] => Route::Global,
            ["rooms"] => Route::Rooms,
            ["rooms", name] => Route::Room {
                name: name.to_string(),
            },
            ["private"] => Route::Private,
            ["private", partner] => Route::PrivateChat {
                partner: partner.to_string(),
            },
            ["poker"] => Route::CardLobby,
            ["poker", "table", id] => Route::CardTable {
                game_id: id.to_string(),
            },
            ["hangman"] => Route::WordLobby,
            ["hangman", "game", id] => Route::WordTable {
                game_id: id.to_string(),
            },
            _ => return None,
        };
        Some(route)
    }

    pub fn lobby(kind: GameKind) -> Self {
        match kind {
            GameKind::Card => Route::CardLobby,
            GameKind::Word => Route::WordLobby,
        }
    }

    pub fn table(kind: GameKind, game_id: impl Into<String>) -> Self {
        match kind {
            GameKind::Card => Route::CardTable {
                game_id: game_id.into(),
            },
            GameKind::Word => Route::WordTable {
                game_id: game_id.into(),
            },
        }
    }

    /// Any of the text chat views.
    pub fn is_chat(&self) -> bool {
        matches!(
            self,
            Route::Global
                | Route::Rooms
                | Route::Room { .. }
                | Route::Private
                | Route::PrivateChat { .. }
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// The view layer, as far as the multiplexer is concerned.
pub trait Navigator: Send {
    fn current_route(&self) -> Option<Route>;
    fn navigate(&mut self, route: Route);
}

/// Where a request to open a section actually lands, given the breadcrumbs.
///
/// | requested | breadcrumb     | result              |
/// |-----------|----------------|---------------------|
/// | Private   | partner known  | PrivateChat(partner)|
/// | Rooms     | room known     | Room(room)          |
/// | anything else              | unchanged           |
pub fn resolve_entry(requested: Route, crumbs: &Breadcrumbs) -> Route {
    match (requested, crumbs) {
        (
            Route::Private,
            Breadcrumbs {
                last_private_partner: Some(partner),
                ..
            },
        ) => Route::PrivateChat {
            partner: partner.clone(),
        },
        (
            Route::Rooms,
            Breadcrumbs {
                last_room: Some(room),
                ..
            },
        ) => Route::Room { name: room.clone() },
        (requested, _) => requested,
    }
}

/// Navigation correction after a table snapshot for `game_id` arrived.
///
/// Returns `None` when the view already shows that table, or when the user is
/// in a chat view and should not be pulled out of the conversation.
pub fn table_correction(kind: GameKind, game_id: &str, current: Option<&Route>) -> Option<Route> {
    let target = Route::table(kind, game_id);
    match current {
        Some(route) if *route == target => None,
        Some(route) if route.is_chat() => None,
        _ => Some(target),
    }
}

/// Navigator without a view: remembers where it is and everything it was
/// asked to do. Clones share state, so a host can keep one to inspect.
#[derive(Debug, Clone, Default)]
pub struct HeadlessNavigator {
    inner: Arc<Mutex<HeadlessState>>,
}

#[derive(Debug, Default)]
struct HeadlessState {
    current: Option<Route>,
    history: Vec<Route>,
}

impl HeadlessNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(route: Route) -> Self {
        let nav = Self::default();
        nav.lock().current = Some(route);
        nav
    }

    /// Move without recording, as if the user clicked somewhere.
    pub fn set_current(&self, route: Route) {
        self.lock().current = Some(route);
    }

    /// Every route the client asked for, oldest first.
    pub fn history(&self) -> Vec<Route> {
        self.lock().history.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HeadlessState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Navigator for HeadlessNavigator {
    fn current_route(&self) -> Option<Route> {
        self.lock().current.clone()
    }

    fn navigate(&mut self, route: Route) {
        let mut state = self.lock();
        state.history.push(route.clone());
        state.current = Some(route);
    }
}
