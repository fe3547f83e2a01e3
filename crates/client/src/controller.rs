//! Session lifecycle: decides what has to happen when the session changes.
//!
//! The controller is pure bookkeeping. It turns a session transition into an
//! ordered list of [`LifecycleAction`]s and the client carries them out.

use crate::session::{Identity, Session};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleAction {
    /// Open the transport for this identity.
    Connect(Identity),
    /// Prime both lobby slices from the REST endpoints.
    PrimeLobbies,
    /// Close the transport.
    Disconnect,
    /// Forget both breadcrumbs, persisted and in memory.
    ClearBreadcrumbs,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum ControllerState {
    #[default]
    LoggedOut,
    LoggedIn(Identity),
}

#[derive(Debug, Default)]
pub struct SessionController {
    state: ControllerState,
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> Option<&Identity> {
        match &self.state {
            ControllerState::LoggedIn(identity) => Some(identity),
            ControllerState::LoggedOut => None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.identity().is_some()
    }

    pub fn transition(&mut self, session: &Session) -> Vec<LifecycleAction> {
        let next = match session.identity() {
            Some(identity) => ControllerState::LoggedIn(identity.clone()),
            None => ControllerState::LoggedOut,
        };

        let actions = match (&self.state, &next) {
            (ControllerState::LoggedOut, ControllerState::LoggedOut) => Vec::new(),
            (ControllerState::LoggedIn(a), ControllerState::LoggedIn(b)) if a == b => Vec::new(),
            (ControllerState::LoggedOut, ControllerState::LoggedIn(identity)) => login(identity),
            (ControllerState::LoggedIn(_), ControllerState::LoggedOut) => logout(),
            (ControllerState::LoggedIn(_), ControllerState::LoggedIn(identity)) => {
                let mut actions = logout();
                actions.extend(login(identity));
                actions
            }
        };

        if !actions.is_empty() {
            crate::log_info!("session transition: {:?}", actions);
        }
        self.state = next;
        actions
    }
}

fn login(identity: &Identity) -> Vec<LifecycleAction> {
    vec![
        LifecycleAction::Connect(identity.clone()),
        LifecycleAction::PrimeLobbies,
    ]
}

fn logout() -> Vec<LifecycleAction> {
    vec![LifecycleAction::Disconnect, LifecycleAction::ClearBreadcrumbs]
}
