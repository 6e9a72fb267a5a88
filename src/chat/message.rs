use serde::Deserialize;

use crate::foundation::core::Rgba8;

/// Where a chat message originated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ChatSource {
    /// Sent in live chat while the stream was running.
    #[default]
    Live,
    /// Posted later against the recording.
    Replay,
}

/// One native emote occurrence inside a message body.
///
/// `begin`/`end` are inclusive code-point offsets into the raw text, as delivered by the chat
/// history service.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct EmoteOccurrence {
    /// Native emote id.
    #[serde(rename = "_id")]
    pub id: String,
    /// First character offset.
    pub begin: usize,
    /// Last character offset.
    pub end: usize,
}

/// A badge shown in front of the author name.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct BadgeRef {
    /// Badge set id (`subscriber`, `moderator`, ...).
    #[serde(rename = "_id")]
    pub id: String,
    /// Version within the set.
    pub version: String,
}

/// Immutable input unit of the layout engine.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "CommentWire")]
pub struct ChatMessage {
    /// Display name of the author.
    pub author: String,
    /// Author color chosen in chat, if any.
    pub color: Option<Rgba8>,
    /// Raw message body.
    pub text: String,
    /// Seconds from recording start.
    pub time_offset: f64,
    /// Native emote occurrences in body order.
    pub emotes: Vec<EmoteOccurrence>,
    /// Badges in display order.
    pub badges: Vec<BadgeRef>,
    /// Bits attached to the message; cheer tokens are only recognized when non-zero.
    pub bits_spent: u32,
    /// Live or replay chat.
    pub source: ChatSource,
}

impl ChatMessage {
    /// Plain live message without color, emotes, badges or bits.
    pub fn new(author: impl Into<String>, text: impl Into<String>, time_offset: f64) -> Self {
        Self {
            author: author.into(),
            color: None,
            text: text.into(),
            time_offset,
            emotes: Vec::new(),
            badges: Vec::new(),
            bits_spent: 0,
            source: ChatSource::Live,
        }
    }

    /// Set the author color.
    pub fn with_color(mut self, color: Rgba8) -> Self {
        self.color = Some(color);
        self
    }

    /// Append a native emote occurrence.
    pub fn with_emote(mut self, id: impl Into<String>, begin: usize, end: usize) -> Self {
        self.emotes.push(EmoteOccurrence {
            id: id.into(),
            begin,
            end,
        });
        self
    }

    /// Append a badge reference.
    pub fn with_badge(mut self, id: impl Into<String>, version: impl Into<String>) -> Self {
        self.badges.push(BadgeRef {
            id: id.into(),
            version: version.into(),
        });
        self
    }

    /// Set bits spent.
    pub fn with_bits(mut self, bits: u32) -> Self {
        self.bits_spent = bits;
        self
    }

    /// Mark the message as replay chat.
    pub fn replay(mut self) -> Self {
        self.source = ChatSource::Replay;
        self
    }

    /// `true` for messages sent in live chat.
    pub fn is_live(&self) -> bool {
        self.source == ChatSource::Live
    }
}

// Comment shape of the chat history service (and of the on-disk history cache).
#[derive(Deserialize)]
struct CommentWire {
    commenter: CommenterWire,
    message: BodyWire,
    #[serde(default)]
    content_offset_seconds: f64,
    #[serde(default)]
    source: Option<String>,
}

#[derive(Deserialize)]
struct CommenterWire {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct BodyWire {
    #[serde(default)]
    body: String,
    #[serde(default)]
    user_color: Option<String>,
    #[serde(default)]
    emoticons: Option<Vec<EmoteOccurrence>>,
    #[serde(default)]
    user_badges: Option<Vec<BadgeRef>>,
    #[serde(default)]
    bits_spent: Option<u32>,
}

impl From<CommentWire> for ChatMessage {
    fn from(w: CommentWire) -> Self {
        let author = w
            .commenter
            .display_name
            .filter(|n| !n.is_empty())
            .or(w.commenter.name)
            .unwrap_or_default();

        let color = w.message.user_color.as_deref().and_then(|c| {
            Rgba8::parse_hex(c)
                .inspect_err(|e| tracing::debug!(%author, color = c, "ignoring user color: {e}"))
                .ok()
        });

        let source = match w.source.as_deref() {
            Some("chat") | None => ChatSource::Live,
            Some(_) => ChatSource::Replay,
        };

        Self {
            author,
            color,
            text: w.message.body,
            time_offset: w.content_offset_seconds,
            emotes: w.message.emoticons.unwrap_or_default(),
            badges: w.message.user_badges.unwrap_or_default(),
            bits_spent: w.message.bits_spent.unwrap_or(0),
            source,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/chat/message.rs"]
mod tests;
