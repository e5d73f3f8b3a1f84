use navigator_core::{CommandError, ErrorKind};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("server answered HTTP {0}")]
    HttpStatus(u16),
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("no backend with index {0}")]
    UnknownClient(usize),
}

impl BackendError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BackendError::InvalidUrl(_) | BackendError::Timeout(_) | BackendError::Network(_) => {
                ErrorKind::Transport
            }
            BackendError::HttpStatus(_) | BackendError::Decode(_) => ErrorKind::Protocol,
            BackendError::UnknownClient(_) => ErrorKind::Domain,
        }
    }
}

impl From<BackendError> for CommandError {
    fn from(err: BackendError) -> Self {
        CommandError::new(err.kind(), err.to_string())
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        return BackendError::Timeout(err.to_string());
    }
    if err.is_decode() {
        return BackendError::Decode(err.to_string());
    }
    if err.is_builder() {
        return BackendError::InvalidUrl(err.to_string());
    }
    if let Some(status) = err.status() {
        return BackendError::HttpStatus(status.as_u16());
    }
    BackendError::Network(err.to_string())
}
