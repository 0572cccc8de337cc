//! Library error type.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// An item was reached again while it was still being expanded.
    #[error("cyclic recipe graph: {}", .path.join(" -> "))]
    CyclicRecipe { path: Vec<String> },

    /// Expansion went deeper than the configured limit.
    #[error("recipe graph too deep: '{item}' exceeds max depth {max_depth}")]
    DepthExceeded { item: String, max_depth: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
