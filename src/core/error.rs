//! Error types for the editor core

use thiserror::Error;

use crate::clipboard::ClipboardError;
use crate::ground::GroundError;

/// Main error type for the editor core
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Ground error: {0}")]
    Ground(#[from] GroundError),

    #[error("Selection error: {0}")]
    Selection(String),

    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    #[error("Config error: {0}")]
    Config(String),
}
