//! Session identity as seen by the multiplexer.
//!
//! The login forms live outside this crate; they hand over a finished
//! [`Session`] and the client reacts to the transition.

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// What the identity is allowed to do on the server.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Anonymous display name; lobby create/join is refused by the server.
    #[default]
    Guest,
    Authenticated,
}

/// A non-empty display identity.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ClientError::Session("identity must not be empty".into()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Identity {
    type Error = ClientError;

    fn try_from(value: String) -> Result<Self> {
        Identity::new(value)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.0
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Login state. Being logged in without an identity is unrepresentable.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Session {
    #[default]
    LoggedOut,
    LoggedIn {
        identity: Identity,
        capability: Capability,
    },
}

impl Session {
    pub fn guest(name: impl Into<String>) -> Result<Self> {
        Ok(Session::LoggedIn {
            identity: Identity::new(name)?,
            capability: Capability::Guest,
        })
    }

    pub fn authenticated(name: impl Into<String>) -> Result<Self> {
        Ok(Session::LoggedIn {
            identity: Identity::new(name)?,
            capability: Capability::Authenticated,
        })
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self, Session::LoggedIn { .. })
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Session::LoggedIn { identity, .. } => Some(identity),
            Session::LoggedOut => None,
        }
    }

    pub fn capability(&self) -> Option<Capability> {
        match self {
            Session::LoggedIn { capability, .. } => Some(*capability),
            Session::LoggedOut => None,
        }
    }
}
