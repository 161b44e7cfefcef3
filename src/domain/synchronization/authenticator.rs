//! Authenticator
//! Validates credentials against the remote source before any stage runs.

use std::fmt;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use super::value_objects::credentials::Credentials;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthStatus {
    Success,
    InvalidCredentials,
    ConnectionError,
    ServerError,
}

impl AuthStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, AuthStatus::Success)
    }
}

impl fmt::Display for AuthStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AuthStatus::Success => f.write_str("success"),
            AuthStatus::InvalidCredentials => f.write_str("invalid credentials"),
            AuthStatus::ConnectionError => f.write_str("connection error"),
            AuthStatus::ServerError => f.write_str("server error"),
        }
    }
}

/// Remote credential check.
///
/// Implementations report ordinary network trouble as a status instead of
/// panicking, so the orchestrator can always decide whether to proceed.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> AuthStatus;
}
