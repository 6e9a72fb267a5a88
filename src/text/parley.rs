use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{ReelError, ReelResult};
use crate::text::engine::{FontWeight, TextEngine, TextSize};

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

struct Face {
    family: String,
    weight: parley::style::FontWeight,
    data: vello_cpu::peniko::FontData,
}

/// [`TextEngine`] that shapes with Parley and paints glyph runs with `vello_cpu`.
///
/// Holds a regular face and an optional bold face; without one, bold runs use the regular face.
pub struct ParleyText {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    regular: Face,
    bold: Option<Face>,
    size_px: f32,
    line_height: f32,
}

impl ParleyText {
    /// Build an engine from raw font bytes (TTF/OTF) at `size_px`.
    pub fn new(regular: Vec<u8>, bold: Option<Vec<u8>>, size_px: f32) -> ReelResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ReelError::validation(
                "font size must be finite and > 0",
            ));
        }

        let mut font_ctx = parley::FontContext::default();
        let regular = register_face(&mut font_ctx, regular, parley::style::FontWeight::NORMAL)?;
        let bold = bold
            .map(|bytes| register_face(&mut font_ctx, bytes, parley::style::FontWeight::BOLD))
            .transpose()?;

        let mut engine = Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            regular,
            bold,
            size_px,
            line_height: 0.0,
        };
        engine.line_height = engine
            .layout("Ag", FontWeight::Regular, TextBrushRgba8::default())
            .height();
        if !(engine.line_height > 0.0) {
            return Err(ReelError::metrics("font reports a zero line height"));
        }
        Ok(engine)
    }

    /// Read font files from disk and build an engine.
    pub fn from_files(regular: &Path, bold: Option<&Path>, size_px: f32) -> ReelResult<Self> {
        let regular_bytes = std::fs::read(regular)
            .with_context(|| format!("read font '{}'", regular.display()))?;
        let bold_bytes = bold
            .map(|p| std::fs::read(p).with_context(|| format!("read font '{}'", p.display())))
            .transpose()?;
        Self::new(regular_bytes, bold_bytes, size_px)
    }

    fn face(&self, weight: FontWeight) -> &Face {
        match (weight, &self.bold) {
            (FontWeight::Bold, Some(bold)) => bold,
            _ => &self.regular,
        }
    }

    fn layout(
        &mut self,
        text: &str,
        weight: FontWeight,
        brush: TextBrushRgba8,
    ) -> parley::Layout<TextBrushRgba8> {
        let face = self.face(weight);
        let (family, face_weight) = (face.family.clone(), face.weight);
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontWeight(face_weight));
        builder.push_default(parley::style::StyleProperty::FontSize(self.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

fn register_face(
    font_ctx: &mut parley::FontContext,
    bytes: Vec<u8>,
    weight: parley::style::FontWeight,
) -> ReelResult<Face> {
    let families = font_ctx
        .collection
        .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
    let family_id = families
        .first()
        .map(|(id, _)| *id)
        .ok_or_else(|| ReelError::validation("no font families registered from font bytes"))?;
    let family = font_ctx
        .collection
        .family_name(family_id)
        .ok_or_else(|| ReelError::validation("registered font family has no name"))?
        .to_string();
    Ok(Face {
        family,
        weight,
        data: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0),
    })
}

impl TextEngine for ParleyText {
    fn measure(&mut self, text: &str, weight: FontWeight) -> ReelResult<TextSize> {
        let layout = self.layout(text, weight, TextBrushRgba8::default());
        let size = TextSize {
            width: layout.full_width(),
            height: layout.height().max(self.line_height),
        };
        if !size.width.is_finite() || !size.height.is_finite() {
            return Err(ReelError::metrics(format!("non-finite extent for {text:?}")));
        }
        Ok(size)
    }

    fn font_height(&self) -> f32 {
        self.line_height
    }

    fn draw(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        weight: FontWeight,
        color: Rgba8,
        origin: kurbo::Point,
    ) -> ReelResult<()> {
        let layout = self.layout(text, weight, color.into());
        let font = self.face(weight).data.clone();
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/parley.rs"]
mod tests;
