/// Convenience result type used across chatreel.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy used by library APIs.
///
/// Token resolution misses are never errors; they degrade to literal text or omitted badges.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Invalid user-provided configuration or input data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The text engine could not measure or shape a string.
    #[error("text metrics error: {0}")]
    Metrics(String),

    /// Laying out a chat message failed; fatal for the whole run.
    #[error("layout error at message {index}: {source}")]
    Layout {
        /// 0-based index of the message in the input stream.
        index: usize,
        /// Underlying failure.
        #[source]
        source: Box<ReelError>,
    },

    /// Painting or emitting an output frame failed; fatal for the whole run.
    #[error("render error at frame {frame}: {source}")]
    Render {
        /// Output frame index.
        frame: u64,
        /// Underlying failure.
        #[source]
        source: Box<ReelError>,
    },

    /// The video encoder sink failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when deserializing chat history or emote pack data.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::Metrics`] value.
    pub fn metrics(msg: impl Into<String>) -> Self {
        Self::Metrics(msg.into())
    }

    /// Build a [`ReelError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`ReelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Attach the index of the message being laid out.
    pub fn at_message(self, index: usize) -> Self {
        Self::Layout {
            index,
            source: Box::new(self),
        }
    }

    /// Attach the index of the frame being produced.
    pub fn at_frame(self, frame: u64) -> Self {
        Self::Render {
            frame,
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
