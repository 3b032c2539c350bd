#![forbid(unsafe_code)]

//! Error taxonomy for the toast engine.
//!
//! Only programming errors surface as [`ToastError`]. Forgiving entry points
//! (controller methods, `remove`) treat a missing target as a no-op instead.

use std::fmt;

use toastline_core::ToastId;

/// Errors raised by the toast engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToastError {
    /// A timer was armed for an id with no live record on the surface.
    InvalidTarget(ToastId),
    /// A position string did not name one of the six stack positions.
    InvalidPosition(String),
}

impl fmt::Display for ToastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTarget(id) => write!(f, "no live toast with id {id}"),
            Self::InvalidPosition(raw) => write!(
                f,
                "invalid position {raw:?}: expected top|bottom-left|center|right"
            ),
        }
    }
}

impl std::error::Error for ToastError {}
