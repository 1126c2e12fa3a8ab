//! Loading prior turns for `--history`

use flowgrid_domain::Message;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryFileError {
    #[error("could not read history file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("history file {path} is not a JSON array of {{role, content}} turns: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Read a JSON array of `{ "role": "user" | "assistant", "content": "..." }`.
///
/// Role checks happen when the request is built.
pub fn load_history(path: &Path) -> Result<Vec<Message>, HistoryFileError> {
    let raw = std::fs::read_to_string(path).map_err(|source| HistoryFileError::Read {
        path: path.display().to_string(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| HistoryFileError::Parse {
        path: path.display().to_string(),
        source,
    })
}
