use crate::chat::message::ChatMessage;
use crate::foundation::core::{Fps, FrameIndex, Rgba8};
use crate::foundation::error::{ReelError, ReelResult};
use crate::layout::model::{Drawable, DrawableKind, DrawableMessage, Line};
use crate::layout::palette::AuthorPalette;
use crate::text::engine::{FontWeight, TextEngine};
use crate::tokens::resolver::{ResolvedImage, TokenResolver};

/// Gap between the frame edge and a line, left and right.
pub const HORIZONTAL_PAD: f32 = 5.0;
/// Gap between the frame edge and the stack, top and bottom.
pub const VERTICAL_PAD: f32 = 5.0;
/// Gap in front of every inline image.
pub const EMOTE_PAD: f32 = 3.0;
/// Gap after every badge.
pub const BADGE_PAD: f32 = 3.0;

/// Inputs of [`LayoutEngine`] that stay fixed for a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutOpts {
    /// Wrap width in pixels (the frame width).
    pub max_width: f32,
    /// Output frame rate; turns time offsets into start frames.
    pub fps: Fps,
    /// Color of message text.
    pub chat_color: Rgba8,
    /// Frame background; author colors are corrected against it.
    pub background: Rgba8,
    /// Emit badge images before the author tag.
    pub show_badges: bool,
}

/// Turns one [`ChatMessage`] into a word-wrapped [`DrawableMessage`].
#[derive(Debug)]
pub struct LayoutEngine {
    opts: LayoutOpts,
    palette: AuthorPalette,
}

impl LayoutEngine {
    /// Create an engine; `color_seed` drives generated author colors.
    pub fn new(opts: LayoutOpts, color_seed: u64) -> ReelResult<Self> {
        if !opts.max_width.is_finite() || opts.max_width <= 0.0 {
            return Err(ReelError::validation("layout width must be finite and > 0"));
        }
        Ok(Self {
            opts,
            palette: AuthorPalette::new(color_seed),
        })
    }

    /// Options this engine lays out with.
    pub fn opts(&self) -> &LayoutOpts {
        &self.opts
    }

    /// Author color memory shared by every message of a run.
    pub fn palette(&self) -> &AuthorPalette {
        &self.palette
    }

    /// Lay out `message`.
    ///
    /// Token misses degrade to text; only a text-engine failure is an error.
    pub fn layout(
        &self,
        message: &ChatMessage,
        resolver: &mut dyn TokenResolver,
        text: &mut dyn TextEngine,
    ) -> ReelResult<DrawableMessage> {
        let mut emotes: Vec<(usize, &str)> = message
            .emotes
            .iter()
            .map(|e| (e.begin, e.id.as_str()))
            .collect();
        let body = normalize_text(&message.text, &mut emotes, |g| resolver.knows_emoji(g));

        let mut b = LineBuilder::new(self.opts.max_width);

        let user_tag = format!("{}:", message.author);
        let user_size = text.measure(&user_tag, FontWeight::Bold)?;

        if self.opts.show_badges {
            for badge in &message.badges {
                let Some(img) = resolver.resolve_badge(&badge.id, &badge.version) else {
                    tracing::debug!(badge = %badge.id, version = %badge.version, "badge unavailable");
                    continue;
                };
                let (w, h) = (img.width as f32, img.height as f32);
                b.place(Drawable {
                    offset_x: b.x,
                    offset_y: user_size.height * 0.5 - h * 0.5,
                    width: w,
                    height: h,
                    kind: DrawableKind::Badge { image: img.id },
                });
                b.x += w + BADGE_PAD;
            }
        }

        let color = self
            .palette
            .color_for(&message.author, message.color, self.opts.background);
        b.place(Drawable {
            offset_x: b.x,
            offset_y: 0.0,
            width: user_size.width,
            height: user_size.height,
            kind: DrawableKind::User {
                text: user_tag,
                color,
            },
        });
        b.x += user_size.width;

        let font_height = text.font_height();
        let has_bits = message.bits_spent > 0;
        let mut cursor = 0usize;

        for word in body.split(' ').filter(|w| !w.is_empty()) {
            let native = emotes
                .iter()
                .find(|(begin, _)| *begin == cursor)
                .map(|(_, id)| *id);
            cursor += word.encode_utf16().count() + 1;

            let emote = resolver
                .resolve_emoji(word)
                .or_else(|| resolver.resolve_third_party(word))
                .or_else(|| native.and_then(|id| resolver.resolve_native(id)));
            if let Some(img) = emote {
                b.flush_run(text, self.opts.chat_color)?;
                b.place_inline(img, font_height);
                continue;
            }

            if let Some(cheer) = resolver.resolve_cheer(word, has_bits) {
                b.flush_run(text, self.opts.chat_color)?;
                b.place_inline(cheer.image, font_height);

                let label = cheer.amount.to_string();
                let size = text.measure(&label, FontWeight::Regular)?;
                if b.x + size.width + HORIZONTAL_PAD >= b.max_width {
                    b.end_line();
                }
                b.place(Drawable {
                    offset_x: b.x,
                    offset_y: 0.0,
                    width: size.width,
                    height: size.height,
                    kind: DrawableKind::Text {
                        text: label,
                        color: cheer.color,
                    },
                });
                b.x += size.width;
                continue;
            }

            let candidate = format!("{}{word} ", b.run);
            let size = text.measure(&candidate, FontWeight::Regular)?;
            if b.x + size.width + HORIZONTAL_PAD >= b.max_width && !b.at_line_start() {
                b.flush_run(text, self.opts.chat_color)?;
                b.end_line();
            }
            b.run.push_str(word);
            b.run.push(' ');
        }

        b.flush_run(text, self.opts.chat_color)?;
        b.end_line();

        Ok(DrawableMessage {
            lines: b.lines,
            start_frame: FrameIndex(self.opts.fps.secs_to_frames_floor(message.time_offset)),
            live: message.is_live(),
        })
    }
}

struct LineBuilder {
    max_width: f32,
    lines: Vec<Line>,
    current: Vec<Drawable>,
    run: String,
    x: f32,
    y: f32,
    max_negative: f32,
}

impl LineBuilder {
    fn new(max_width: f32) -> Self {
        Self {
            max_width,
            lines: Vec::new(),
            current: Vec::new(),
            run: String::new(),
            x: HORIZONTAL_PAD,
            y: 0.0,
            max_negative: 0.0,
        }
    }

    fn at_line_start(&self) -> bool {
        self.current.is_empty() && self.run.is_empty()
    }

    fn place(&mut self, d: Drawable) {
        if d.offset_y < 0.0 {
            self.max_negative = self.max_negative.max(-d.offset_y);
        }
        self.current.push(d);
    }

    fn place_inline(&mut self, img: ResolvedImage, font_height: f32) {
        let (w, h) = (img.width as f32, img.height as f32);
        if self.x + w + HORIZONTAL_PAD > self.max_width {
            self.end_line();
        }
        self.x += EMOTE_PAD;
        self.place(Drawable {
            offset_x: self.x,
            offset_y: font_height * 0.5 - h * 0.5,
            width: w,
            height: h,
            kind: DrawableKind::Emote {
                image: img.id,
                frame_count: img.frame_count.max(1),
                delay_ms: img.delay_ms,
            },
        });
        self.x += w;
    }

    fn flush_run(&mut self, text: &mut dyn TextEngine, color: Rgba8) -> ReelResult<()> {
        if self.run.is_empty() {
            return Ok(());
        }
        let size = text.measure(&self.run, FontWeight::Regular)?;
        let run = std::mem::take(&mut self.run);
        self.place(Drawable {
            offset_x: self.x,
            offset_y: 0.0,
            width: size.width,
            height: size.height,
            kind: DrawableKind::Text {
                text: run.trim_end_matches(' ').to_owned(),
                color,
            },
        });
        self.x += size.width;
        Ok(())
    }

    /// Close the current line, shifting its drawables so none sits above the line top.
    fn end_line(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let shift = self.max_negative;
        let mut drawables = std::mem::take(&mut self.current);
        for d in &mut drawables {
            d.offset_y += shift;
        }
        let line = Line {
            offset_x: HORIZONTAL_PAD,
            offset_y: self.y,
            drawables,
        };
        self.y += line.height();
        self.lines.push(line);
        self.max_negative = 0.0;
        self.x = HORIZONTAL_PAD;
    }
}

/// Replace astral code points: known emoji become `" glyph "`, anything else `'?'`.
///
/// Every emote begin offset past a replaced code point (UTF-16 position in `raw`) moves right
/// by one.
pub(crate) fn normalize_text(
    raw: &str,
    emotes: &mut [(usize, &str)],
    mut knows_emoji: impl FnMut(&str) -> bool,
) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut utf16_pos = 0usize;
    let mut glyph = [0u8; 4];
    for ch in raw.chars() {
        let units = ch.len_utf16();
        if units == 2 {
            for (begin, _) in emotes.iter_mut() {
                if *begin > utf16_pos {
                    *begin += 1;
                }
            }
            let g: &str = ch.encode_utf8(&mut glyph);
            if knows_emoji(g) {
                out.push(' ');
                out.push_str(g);
                out.push(' ');
            } else {
                out.push('?');
            }
        } else {
            out.push(ch);
        }
        utf16_pos += units;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/layout/engine.rs"]
mod tests;
