//! Error types for arc computation and the plot window.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for plot operations.
pub type Result<T> = std::result::Result<T, PlotError>;

/// Errors produced by [`compute_arc`](crate::arc::compute_arc).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArcError {
    /// An input is outside its valid domain.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Name of the offending parameter.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl ArcError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

/// Errors that can occur while configuring or running the plot window.
#[derive(Debug, Error)]
pub enum PlotError {
    /// Arc parameters were rejected.
    #[error(transparent)]
    Arc(#[from] ArcError),

    /// Command line option could not be understood.
    #[error("invalid option `{option}`: {reason}")]
    InvalidOption {
        /// The flag as written on the command line.
        option: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Font file could not be parsed.
    #[error("failed to load font {path:?}: {reason}")]
    Font {
        /// Path of the font file.
        path: PathBuf,
        /// Parser failure description.
        reason: String,
    },

    /// Reading a file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Event loop creation or execution failed.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Window creation failed.
    #[error("window error: {0}")]
    Window(#[from] winit::error::OsError),

    /// Pixel surface creation or presentation failed.
    #[error("pixel surface error: {0}")]
    Pixels(#[from] pixels::Error),
}
