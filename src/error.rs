// src/error.rs
//! Crate-wide error handling.
//!
//! Two failure classes exist in this engine: a malformed static scene
//! description (curve with too few control points, degenerate shapes,
//! negative masses) which is fatal at startup, and a runtime argument outside
//! its valid domain (a negative step delta). Everything propagates with `?`
//! through the crate `Result` alias.

use thiserror::Error;

/// Main error type — lightweight, Send + Sync + 'static.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The static scene description is malformed. Construction stops, no
    /// partial object is produced.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A runtime argument is outside its valid domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    #[inline]
    pub fn invalid_configuration<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    #[inline]
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    // === Kind checks ===
    #[inline]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::InvalidConfiguration(_))
    }

    #[inline]
    pub fn is_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}

/// Convenient `Result` alias — use `crate::Result<T>` everywhere.
pub type Result<T> = std::result::Result<T, Error>;
