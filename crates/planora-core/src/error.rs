//! Error types for document mutation and configuration.

use crate::object::ObjectId;
use thiserror::Error;

/// Errors returned by [`CanvasDocument`](crate::canvas::CanvasDocument)
/// commands.
#[derive(Debug, Error, PartialEq)]
pub enum DocumentError {
    #[error("Object not found: {0}")]
    NotFound(ObjectId),
    #[error("Object is locked: {0}")]
    Locked(ObjectId),
    #[error("Object {0} is not an element")]
    NotAnElement(ObjectId),
    #[error("Object {0} is not a table")]
    NotATable(ObjectId),
    #[error("Object {0} is not a group")]
    NotAGroup(ObjectId),
    #[error("Grouping needs at least two objects, got {0}")]
    GroupTooSmall(usize),
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
}

/// Result type for document commands.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Errors loading a [`PlannerConfig`](crate::config::PlannerConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
