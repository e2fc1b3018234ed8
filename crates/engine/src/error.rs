//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`InvalidPage`] thrown when a page jump targets a page outside the list.
//! - [`LineNotFound`] thrown when a quotation line index does not exist.
//! - [`NoPendingRemoval`] thrown when a removal is confirmed without a prompt.
//!
//!  [`InvalidPage`]: EngineError::InvalidPage
//!  [`LineNotFound`]: EngineError::LineNotFound
//!  [`NoPendingRemoval`]: EngineError::NoPendingRemoval
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid page: {0}")]
    InvalidPage(String),
    #[error("line {0} not found")]
    LineNotFound(usize),
    #[error("no line removal is awaiting confirmation")]
    NoPendingRemoval,
}
