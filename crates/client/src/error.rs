//! Client-side error type.

use chatgames_shared::ApiError;
use thiserror::Error;

use crate::ws::TransportError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport: {0}")]
    Transport(#[from] TransportError),
    #[error("lobby api: {0}")]
    Api(#[from] ApiError),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("invalid session: {0}")]
    Session(String),
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
