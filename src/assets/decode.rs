use anyhow::Context;

use crate::assets::store::DecodedImage;
use crate::foundation::error::{ReelError, ReelResult};

/// Decode encoded image bytes. GIFs keep every animation frame; other formats decode to one.
pub fn decode_image(bytes: &[u8]) -> ReelResult<DecodedImage> {
    let format = image::guess_format(bytes).context("detect image format")?;
    if format == image::ImageFormat::Gif {
        return decode_gif(bytes);
    }

    let dyn_img =
        image::load_from_memory_with_format(bytes, format).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    DecodedImage::from_rgba8_frames(width, height, vec![(rgba.into_raw(), 0)])
}

fn decode_gif(bytes: &[u8]) -> ReelResult<DecodedImage> {
    use image::AnimationDecoder as _;

    let decoder = image::codecs::gif::GifDecoder::new(std::io::Cursor::new(bytes))
        .context("open gif decoder")?;
    let frames = decoder
        .into_frames()
        .collect_frames()
        .context("decode gif frames")?;
    let Some(first) = frames.first() else {
        return Err(ReelError::validation("gif has no frames"));
    };
    let (width, height) = first.buffer().dimensions();

    let frames = frames
        .into_iter()
        .map(|f| {
            let (num, den) = f.delay().numer_denom_ms();
            let delay_ms = if den == 0 { 0 } else { num / den };
            (f.into_buffer().into_raw(), delay_ms)
        })
        .collect();
    DecodedImage::from_rgba8_frames(width, height, frames)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
