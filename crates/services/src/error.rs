//! Shared error types for the services crate.

use thiserror::Error;

use beast_core::model::RosterError;
use beast_core::render::RenderError;

/// Errors emitted by `RosterLoader`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RosterLoadError {
    #[error("species page request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("species page response has no parse.text field")]
    MissingText,
    #[error("invalid wiki url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error(transparent)]
    Roster(#[from] RosterError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `AssetProxy`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProxyError {
    #[error("invalid upstream url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Why a single slot fetch did not produce an image.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    #[error("malformed image route: {0}")]
    BadRoute(String),
    #[error("image request failed with status {0}")]
    HttpStatus(u16),
    #[error("response is not an image ({content_type})")]
    NotAnImage { content_type: String },
    #[error(transparent)]
    Decode(#[from] RenderError),
    #[error(transparent)]
    Proxy(#[from] ProxyError),
}

/// Errors emitted by the guess session state machine.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("roster has no entries")]
    EmptyRoster,
    #[error("guess cannot be empty")]
    EmptyGuess,
    #[error("no image is waiting for a guess")]
    NotGuessing,
    #[error("answer has not been revealed yet")]
    NotRevealed,
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Roster(#[from] RosterLoadError),
    #[error(transparent)]
    Proxy(#[from] ProxyError),
}
