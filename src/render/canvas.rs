use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::store::{ImageArena, ImageId};
use crate::foundation::core::Rgba8;
use crate::foundation::error::{ReelError, ReelResult};

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**; the flag makes this explicit at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Opaque straight-alpha copy of the frame composited over `background`.
    pub fn flattened(&self, background: Rgba8) -> ReelResult<Vec<u8>> {
        if !self.premultiplied {
            return Ok(self.data.clone());
        }
        let mut out = vec![0u8; self.data.len()];
        crate::encode::ffmpeg::flatten_premul_over_bg_to_opaque_rgba8(
            &mut out, &self.data, background,
        )?;
        Ok(out)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct PaintKey {
    image: ImageId,
    sub_frame: usize,
}

/// Reusable CPU raster target powered by `vello_cpu`.
///
/// Image paints are built once per `(image, sub-frame)` and reused across frames.
pub struct CpuCanvas {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    paints: HashMap<PaintKey, vello_cpu::Image>,
}

impl CpuCanvas {
    /// Allocate a `width` x `height` target.
    pub fn new(width: u32, height: u32) -> ReelResult<Self> {
        if width == 0 || height == 0 {
            return Err(ReelError::validation("canvas width/height must be non-zero"));
        }
        let w: u16 = width
            .try_into()
            .map_err(|_| ReelError::validation("canvas width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| ReelError::validation("canvas height exceeds u16"))?;
        Ok(Self {
            width: w,
            height: h,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
            paints: HashMap::new(),
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// Number of cached image paints.
    pub fn cached_paints(&self) -> usize {
        self.paints.len()
    }

    /// Start a new frame; previously recorded draws are discarded.
    pub fn begin(&mut self) {
        self.ctx.reset();
    }

    /// Recording context, for text engines.
    pub fn ctx_mut(&mut self) -> &mut vello_cpu::RenderContext {
        &mut self.ctx
    }

    /// Fill `rect` with a solid color.
    pub fn fill_rect(&mut self, rect: kurbo::Rect, color: Rgba8) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            rect.x0, rect.y0, rect.x1, rect.y1,
        ));
    }

    /// Draw one sub-frame of an arena image with its top-left corner at `origin`.
    ///
    /// The origin is snapped to whole pixels so images are copied, not resampled.
    pub fn draw_image(
        &mut self,
        images: &ImageArena,
        image: ImageId,
        sub_frame: usize,
        origin: kurbo::Point,
    ) -> ReelResult<()> {
        let decoded = images
            .get(image)
            .ok_or_else(|| ReelError::validation(format!("unknown image id {}", image.0)))?;
        let key = PaintKey { image, sub_frame };
        let paint = match self.paints.get(&key) {
            Some(p) => p.clone(),
            None => {
                let frame = decoded.frames.get(sub_frame).ok_or_else(|| {
                    ReelError::validation(format!(
                        "image {} has no sub-frame {sub_frame}",
                        image.0
                    ))
                })?;
                let pixmap =
                    pixmap_from_premul_bytes(&frame.rgba8_premul, decoded.width, decoded.height)?;
                let paint = vello_cpu::Image {
                    image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                    sampler: vello_cpu::peniko::ImageSampler::default(),
                };
                self.paints.insert(key, paint.clone());
                paint
            }
        };

        let origin = origin.round();
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(paint);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(decoded.width),
            f64::from(decoded.height),
        ));
        Ok(())
    }

    /// Rasterize everything recorded since [`CpuCanvas::begin`] and read the frame back.
    pub fn finish(&mut self) -> FrameRGBA {
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        FrameRGBA {
            width: self.width(),
            height: self.height(),
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> ReelResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ReelError::validation("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ReelError::validation("image height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(ReelError::validation("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; arena bytes are already premultiplied.
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
