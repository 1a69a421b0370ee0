//! Error types and user-facing error classification.
//!
//! This module provides the application's error hierarchy. The `AppError` enum is the
//! top-level error type returned by every service, repository and command. Errors are
//! classified by `ErrorKind`: the three user-facing kinds are rendered back to the user
//! as a private reply at the command dispatch boundary, everything else is logged and
//! swallowed so the bot keeps running.

pub mod config;

use thiserror::Error;

use crate::error::config::ConfigError;

/// Classification of an `AppError` used at the dispatch boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced trigger, poll or title does not exist.
    NotFound,
    /// User input was rejected (bad date, bad patch syntax, duplicate title, ...).
    Validation,
    /// The action is not allowed in the current state (voting on a closed poll).
    PermissionDenied,
    /// Anything unanticipated. Never shown to the user in detail.
    Internal,
}

/// Top-level application error type.
///
/// Most infrastructure variants use `#[from]` for automatic conversion with `?`. The
/// `NotFound`, `Validation` and `PermissionDenied` variants carry the message shown
/// to the user.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// Filesystem error from the file-backed store or the keep-alive listener.
    #[error(transparent)]
    IoErr(#[from] std::io::Error),

    /// A persisted record could not be encoded or decoded.
    #[error(transparent)]
    JsonErr(#[from] serde_json::Error),

    /// Referenced resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Invalid user input.
    #[error("{0}")]
    Validation(String),

    /// Action not permitted in the current state.
    #[error("{0}")]
    PermissionDenied(String),

    /// Internal error with custom message, logged but never shown to the user.
    #[error("{0}")]
    InternalError(String),
}

/// Boxes the error to keep `AppError` small, as `serenity::Error` is very large.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}

impl AppError {
    /// Classifies the error for the dispatch boundary.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::Validation,
            Self::PermissionDenied(_) => ErrorKind::PermissionDenied,
            _ => ErrorKind::Internal,
        }
    }

    /// Returns the message to show the user, or `None` for internal errors.
    pub fn user_message(&self) -> Option<String> {
        match self.kind() {
            ErrorKind::Internal => None,
            _ => Some(self.to_string()),
        }
    }
}
