/// Chat messages and their emote, badge and bits metadata.
pub mod message;
/// Chat history JSON.
pub mod history;
