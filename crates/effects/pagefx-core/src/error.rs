//! Error type shared by the core and its adapters.

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while building registrations or configuration.
///
/// Nothing on the evaluation path returns these: geometry and DOM mishaps degrade
/// to "not visible" / "no animation" instead.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid detection mode {0} (expected 1-4)")]
    InvalidMode(u8),
    #[error("settings error: {0}")]
    Settings(String),
    #[error("config error: {0}")]
    Config(String),
}
