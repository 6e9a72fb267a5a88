use crate::foundation::core::Rgba8;
use crate::foundation::error::{ReelError, ReelResult};
use crate::text::engine::{FontWeight, TextEngine, TextSize};

/// Font-free [`TextEngine`] with a fixed advance per character.
///
/// Every non-whitespace character paints as a solid cell. Useful for previews without a font
/// file and for reproducible geometry in tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockText {
    advance: f32,
    bold_advance: f32,
    height: f32,
}

impl BlockText {
    /// Cells `advance` wide and `height` tall, for both weights.
    pub fn new(advance: f32, height: f32) -> ReelResult<Self> {
        if !(advance.is_finite() && advance > 0.0 && height.is_finite() && height > 0.0) {
            return Err(ReelError::validation(
                "block text advance and height must be finite and > 0",
            ));
        }
        Ok(Self {
            advance,
            bold_advance: advance,
            height,
        })
    }

    /// Use a different advance for bold runs.
    pub fn with_bold_advance(mut self, advance: f32) -> Self {
        if advance.is_finite() && advance > 0.0 {
            self.bold_advance = advance;
        }
        self
    }

    fn advance_for(&self, weight: FontWeight) -> f32 {
        match weight {
            FontWeight::Regular => self.advance,
            FontWeight::Bold => self.bold_advance,
        }
    }
}

impl TextEngine for BlockText {
    fn measure(&mut self, text: &str, weight: FontWeight) -> ReelResult<TextSize> {
        Ok(TextSize {
            width: text.chars().count() as f32 * self.advance_for(weight),
            height: self.height,
        })
    }

    fn font_height(&self) -> f32 {
        self.height
    }

    fn draw(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        weight: FontWeight,
        color: Rgba8,
        origin: kurbo::Point,
    ) -> ReelResult<()> {
        let adv = f64::from(self.advance_for(weight));
        let h = f64::from(self.height);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let x0 = i as f64 * adv;
            // one-pixel gutter keeps neighbouring cells apart
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                x0,
                0.0,
                x0 + (adv - 1.0).max(1.0),
                (h - 1.0).max(1.0),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/block.rs"]
mod tests;
