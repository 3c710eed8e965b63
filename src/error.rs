//! Error types for overview-nav
//!
//! This module defines the error types used by the navigation controller.
//! Wiring mistakes between the host and the controller surface as
//! `InvalidState`/`NotFound`; a window vanishing under an active selection
//! surfaces as `StaleReference` and is recovered where it is detected.

use std::fmt;

use crate::window::WindowId;

/// Main error type for overview-nav operations
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// Operation called outside of its legal state
    #[error("Invalid state: {0}")]
    InvalidState(&'static str),

    /// No geometry snapshot exists for this window index
    #[error("No geometry snapshot for window index {0}")]
    NotFound(usize),

    /// The host no longer knows this window
    #[error("{0} is no longer part of the overview")]
    StaleReference(WindowId),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Simulation backend error
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type alias for overview-nav operations
pub type NavResult<T> = Result<T, NavError>;

/// Extension trait for Option to convert to Result with error context
pub trait OptionExt<T> {
    /// Convert None to an error with context
    fn ok_or_log<F>(self, error_fn: F) -> NavResult<T>
    where
        F: FnOnce() -> NavError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_log<F>(self, error_fn: F) -> NavResult<T>
    where
        F: FnOnce() -> NavError,
    {
        match self {
            Some(val) => Ok(val),
            None => {
                let err = error_fn();
                tracing::error!("{err}");
                Err(err)
            }
        }
    }
}

/// Helper for operations that should log errors but not propagate them
pub fn log_error<T, E: fmt::Display>(result: Result<T, E>) -> Option<T> {
    match result {
        Ok(val) => Some(val),
        Err(err) => {
            tracing::error!("Operation failed: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_or_log_passes_values_through() {
        let value: NavResult<u8> = Some(3).ok_or_log(|| NavError::NotFound(0));
        assert_eq!(value.ok(), Some(3));
    }

    #[test]
    fn ok_or_log_builds_error_on_none() {
        let value: NavResult<u8> = None.ok_or_log(|| NavError::NotFound(7));
        assert!(matches!(value, Err(NavError::NotFound(7))));
    }

    #[test]
    fn log_error_swallows_failures() {
        let failed: Result<u8, NavError> = Err(NavError::InvalidState("no session"));
        assert_eq!(log_error(failed), None);
        assert_eq!(log_error::<_, NavError>(Ok(1)), Some(1));
    }
}
