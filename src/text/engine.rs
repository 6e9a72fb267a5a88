use crate::foundation::core::Rgba8;
use crate::foundation::error::ReelResult;

/// Weight of the chat font a run is set in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontWeight {
    /// Message body, cheer amounts.
    Regular,
    /// Author tags.
    Bold,
}

/// Measured extent of a string.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextSize {
    /// Advance width in pixels, trailing spaces included.
    pub width: f32,
    /// Line height in pixels.
    pub height: f32,
}

/// Measures and paints chat text.
///
/// Implementations must be deterministic, and widths must not shrink as a string grows.
pub trait TextEngine {
    /// Measure `text` set in `weight`.
    fn measure(&mut self, text: &str, weight: FontWeight) -> ReelResult<TextSize>;

    /// Height of one line of the regular font; used to center inline images.
    fn font_height(&self) -> f32;

    /// Paint `text` with its top-left corner at `origin`.
    fn draw(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        weight: FontWeight,
        color: Rgba8,
        origin: kurbo::Point,
    ) -> ReelResult<()>;
}
