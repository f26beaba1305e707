use thiserror::Error;

use crate::spatial::{BodyId, ChunkCoord};

/// Load-time configuration errors in element/reaction content. The world refuses to
/// initialize with a catalog that produced one of these.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content bundle is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("content bundle defines no elements (element 0 must be empty/air)")]
    Empty,
    #[error("content bundle defines {0} elements, at most 256 fit the id space")]
    TooManyElements(usize),
    #[error("duplicate element key `{0}`")]
    DuplicateKey(String),
    #[error("unknown element key `{key}` referenced by {context}")]
    UnknownElement { key: String, context: String },
    #[error("unknown tag `#{tag}` referenced by {context}")]
    UnknownTag { tag: String, context: String },
    #[error("duplicate reaction for ordered pair ({a}, {b})")]
    DuplicateReaction { a: String, b: String },
    #[error("{field} of `{key}` is {value}, expected 0..=100")]
    OutOfRange { key: String, field: &'static str, value: i64 },
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("chunk snapshot holds {found} cells, expected {expected}")]
    CellCount { expected: usize, found: usize },
    #[error("body {0} already exists")]
    BodyExists(BodyId),
    #[error("body snapshot holds no cells")]
    EmptyBody,
    #[error("no chunk at {0}")]
    MissingChunk(ChunkCoord),
    #[error("no body {0}")]
    MissingBody(BodyId),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("settings are not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("setting `{name}` must be {expected}, got {value}")]
    Invalid { name: &'static str, expected: &'static str, value: f64 },
}
