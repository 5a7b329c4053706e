//! Error types for agrodrone
//!
//! Runtime queries (cost lookups, planning, flight updates, terrain sampling)
//! are total and never produce these. Errors only surface when constructing
//! grids from caller data or when reading and writing configuration.

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid grid shape: {0}")]
    InvalidGridShape(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
