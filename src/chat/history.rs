use std::path::Path;

use anyhow::Context as _;
use serde::Deserialize;

use crate::chat::message::ChatMessage;
use crate::foundation::error::{ReelError, ReelResult};

#[derive(Deserialize)]
#[serde(untagged)]
enum HistoryFile {
    Wrapped { comments: Vec<ChatMessage> },
    Bare(Vec<ChatMessage>),
}

/// Parse chat history JSON, either `{"comments": [...]}` or a bare comment array.
///
/// The result is stably sorted by time offset; the compositor's pending queue relies on it.
pub fn parse_chat_history(json: &str) -> ReelResult<Vec<ChatMessage>> {
    let file: HistoryFile = serde_json::from_str(json)
        .map_err(|e| ReelError::serde(format!("chat history: {e}")))?;
    let mut messages = match file {
        HistoryFile::Wrapped { comments } => comments,
        HistoryFile::Bare(v) => v,
    };
    messages.sort_by(|a, b| a.time_offset.total_cmp(&b.time_offset));
    Ok(messages)
}

/// Read and parse a chat history file.
#[tracing::instrument]
pub fn load_chat_history(path: &Path) -> ReelResult<Vec<ChatMessage>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read chat history '{}'", path.display()))?;
    let messages = parse_chat_history(&json)?;
    tracing::info!(count = messages.len(), "loaded chat history");
    Ok(messages)
}

#[cfg(test)]
#[path = "../../tests/unit/chat/history.rs"]
mod tests;
