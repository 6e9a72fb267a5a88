use std::collections::VecDeque;

use crate::assets::store::ImageArena;
use crate::foundation::core::{FrameIndex, Rgba8};
use crate::foundation::error::{ReelError, ReelResult};
use crate::layout::engine::VERTICAL_PAD;
use crate::layout::model::{DrawableKind, DrawableMessage};
use crate::render::animator::sub_frame_for;
use crate::render::canvas::{CpuCanvas, FrameRGBA};
use crate::text::engine::{FontWeight, TextEngine};

/// Fixed inputs of a [`ScrollCompositor`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositorOpts {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Clear color.
    pub background: Rgba8,
    /// Vertical gap between messages.
    pub line_spacing: f32,
    /// Show replay (non-live) messages; when off they are dropped on admission.
    pub show_replay: bool,
}

/// Result of one [`ScrollCompositor::admit`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    /// The head message is not due yet, or nothing is pending.
    Waiting,
    /// The head message moved onto the visible stack.
    Admitted,
    /// The head message was a hidden replay message and was discarded.
    Dropped,
}

/// Where a visible message lands in the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Index into [`ScrollCompositor::visible`].
    pub index: usize,
    /// Top of the message in frame coordinates.
    pub y: f32,
}

/// Bottom-anchored chat stack revealed one message per frame.
#[derive(Debug)]
pub struct ScrollCompositor {
    opts: CompositorOpts,
    pending: VecDeque<DrawableMessage>,
    visible: Vec<DrawableMessage>,
}

impl ScrollCompositor {
    /// Queue `messages` in start-frame order (stable for equal frames).
    pub fn new(opts: CompositorOpts, messages: Vec<DrawableMessage>) -> ReelResult<Self> {
        if opts.width == 0 || opts.height == 0 {
            return Err(ReelError::validation("frame width/height must be non-zero"));
        }
        if !opts.line_spacing.is_finite() {
            return Err(ReelError::validation("line spacing must be finite"));
        }
        let mut messages = messages;
        messages.sort_by_key(|m| m.start_frame);
        Ok(Self {
            opts,
            pending: messages.into(),
            visible: Vec::new(),
        })
    }

    /// Options.
    pub fn opts(&self) -> &CompositorOpts {
        &self.opts
    }

    /// Messages not yet admitted.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Admitted messages, oldest first.
    pub fn visible(&self) -> &[DrawableMessage] {
        &self.visible
    }

    /// Consider the head of the pending queue for `frame`. Moves at most one message.
    pub fn admit(&mut self, frame: FrameIndex) -> Admission {
        let Some(head) = self.pending.front() else {
            return Admission::Waiting;
        };
        if !head.live && !self.opts.show_replay {
            self.pending.pop_front();
            tracing::debug!(frame = frame.0, "dropped replay message");
            return Admission::Dropped;
        }
        if head.start_frame < frame
            && let Some(msg) = self.pending.pop_front()
        {
            tracing::debug!(
                frame = frame.0,
                start_frame = msg.start_frame.0,
                "admitted message"
            );
            self.visible.push(msg);
            return Admission::Admitted;
        }
        Admission::Waiting
    }

    /// Visible messages that fit the viewport, most recent (lowest) first.
    pub fn placements(&self) -> Vec<Placement> {
        let limit = self.opts.height as f32 - 2.0 * VERTICAL_PAD;
        let mut acc = 0.0f32;
        let mut y = self.opts.height as f32 - VERTICAL_PAD;
        let mut out = Vec::new();
        for (index, msg) in self.visible.iter().enumerate().rev() {
            if acc >= limit {
                break;
            }
            let step = msg.height() + self.opts.line_spacing;
            acc += step;
            y -= step;
            out.push(Placement { index, y });
        }
        out
    }

    /// Paint the visible stack for `frame` without changing any state.
    pub fn paint(
        &self,
        canvas: &mut CpuCanvas,
        text: &mut dyn TextEngine,
        images: &ImageArena,
        frame: FrameIndex,
    ) -> ReelResult<FrameRGBA> {
        let (w, h) = (f64::from(self.opts.width), f64::from(self.opts.height));
        canvas.begin();
        canvas.fill_rect(kurbo::Rect::new(0.0, 0.0, w, h), self.opts.background);

        for placement in self.placements() {
            let msg = &self.visible[placement.index];
            for line in &msg.lines {
                for d in &line.drawables {
                    let origin = kurbo::Point::new(
                        f64::from(line.offset_x + d.offset_x),
                        f64::from(placement.y + line.offset_y + d.offset_y),
                    );
                    match &d.kind {
                        DrawableKind::User { text: t, color } => {
                            text.draw(canvas.ctx_mut(), t, FontWeight::Bold, *color, origin)?;
                        }
                        DrawableKind::Text { text: t, color } => {
                            text.draw(canvas.ctx_mut(), t, FontWeight::Regular, *color, origin)?;
                        }
                        DrawableKind::Badge { image } => {
                            canvas.draw_image(images, *image, 0, origin)?;
                        }
                        DrawableKind::Emote {
                            image, frame_count, ..
                        } => {
                            let sub = sub_frame_for(frame, *frame_count);
                            canvas.draw_image(images, *image, sub, origin)?;
                        }
                    }
                }
            }
        }

        canvas.fill_rect(
            kurbo::Rect::new(0.0, 0.0, w, f64::from(VERTICAL_PAD)),
            self.opts.background,
        );
        Ok(canvas.finish())
    }

    /// Admit at most one message, then paint `frame`.
    pub fn render_frame(
        &mut self,
        canvas: &mut CpuCanvas,
        text: &mut dyn TextEngine,
        images: &ImageArena,
        frame: FrameIndex,
    ) -> ReelResult<FrameRGBA> {
        self.admit(frame);
        self.paint(canvas, text, images, frame)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
