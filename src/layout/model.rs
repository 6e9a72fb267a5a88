use crate::assets::store::ImageId;
use crate::foundation::core::{FrameIndex, Rgba8};

/// What a [`Drawable`] paints.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawableKind {
    /// Author tag (`"Name:"`) in the bold font.
    User {
        /// Tag text.
        text: String,
        /// Legibility-corrected author color.
        color: Rgba8,
    },
    /// Badge image left of the author tag.
    Badge {
        /// Arena handle.
        image: ImageId,
    },
    /// Run of message text, or a cheer amount label.
    Text {
        /// Run text without its trailing space.
        text: String,
        /// Run color.
        color: Rgba8,
    },
    /// Inline emote or cheer image.
    Emote {
        /// Arena handle.
        image: ImageId,
        /// Animation sub-frame count (1 for still images).
        frame_count: usize,
        /// Sub-frame delay in milliseconds; informational only.
        delay_ms: u32,
    },
}

/// One positioned visual primitive inside a [`Line`].
#[derive(Clone, Debug, PartialEq)]
pub struct Drawable {
    /// Horizontal offset relative to the line.
    pub offset_x: f32,
    /// Vertical offset relative to the line, never negative.
    pub offset_y: f32,
    /// Width in pixels (measured text width or image width).
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
    /// Payload.
    pub kind: DrawableKind,
}

impl Drawable {
    /// Right edge relative to the line.
    pub fn right(&self) -> f32 {
        self.offset_x + self.width
    }

    /// Text payload of `User` and `Text` drawables.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            DrawableKind::User { text, .. } | DrawableKind::Text { text, .. } => Some(text),
            DrawableKind::Badge { .. } | DrawableKind::Emote { .. } => None,
        }
    }
}

/// A horizontal band of drawables produced by word wrapping.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Line {
    /// Horizontal offset relative to the message.
    pub offset_x: f32,
    /// Vertical offset relative to the message.
    pub offset_y: f32,
    /// Drawables, left to right.
    pub drawables: Vec<Drawable>,
}

impl Line {
    /// Maximum height over the drawables; 0 for an empty line.
    pub fn height(&self) -> f32 {
        self.drawables
            .iter()
            .map(|d| d.height)
            .fold(0.0, f32::max)
    }

    /// Right edge of the rightmost drawable, relative to the line.
    pub fn right(&self) -> f32 {
        self.drawables.iter().map(Drawable::right).fold(0.0, f32::max)
    }
}

/// Laid-out form of one chat message.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawableMessage {
    /// Lines, top to bottom.
    pub lines: Vec<Line>,
    /// First output frame the message may appear after.
    pub start_frame: FrameIndex,
    /// `true` for live chat, `false` for replay chat.
    pub live: bool,
}

impl DrawableMessage {
    /// Height of the message: bottom of its last line.
    pub fn height(&self) -> f32 {
        self.lines
            .last()
            .map_or(0.0, |l| l.offset_y + l.height())
    }

    /// Iterate every drawable with its line.
    pub fn drawables(&self) -> impl Iterator<Item = (&Line, &Drawable)> {
        self.lines
            .iter()
            .flat_map(|l| l.drawables.iter().map(move |d| (l, d)))
    }
}
