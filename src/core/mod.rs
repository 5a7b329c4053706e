//! Core types and utilities shared by every engine

pub mod types;
pub mod error;
pub mod logging;

pub use types::*;
pub use error::Error;
