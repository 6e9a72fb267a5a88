use std::sync::Arc;

use crate::foundation::error::{ReelError, ReelResult};

/// One sub-frame of a decoded image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct ImageFrame {
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
    /// Display time of this sub-frame in milliseconds (0 for still images).
    pub delay_ms: u32,
}

/// Decoded raster image; animated images carry more than one frame.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Sub-frames in playback order, never empty.
    pub frames: Vec<ImageFrame>,
}

impl DecodedImage {
    /// Build an image from straight-alpha RGBA8 frames, premultiplying in place.
    pub fn from_rgba8_frames(
        width: u32,
        height: u32,
        frames: Vec<(Vec<u8>, u32)>,
    ) -> ReelResult<Self> {
        if width == 0 || height == 0 {
            return Err(ReelError::validation("image width/height must be non-zero"));
        }
        if frames.is_empty() {
            return Err(ReelError::validation("image must have at least one frame"));
        }
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);

        let mut out = Vec::with_capacity(frames.len());
        for (mut rgba, delay_ms) in frames {
            if rgba.len() != expected {
                return Err(ReelError::validation(format!(
                    "image frame byte len mismatch: got {}, expected {expected}",
                    rgba.len()
                )));
            }
            premultiply_rgba8_in_place(&mut rgba);
            out.push(ImageFrame {
                rgba8_premul: Arc::new(rgba),
                delay_ms,
            });
        }

        Ok(Self {
            width,
            height,
            frames: out,
        })
    }

    /// Number of sub-frames (1 for still images).
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Delay of the first sub-frame; informational only.
    pub fn frame_delay_ms(&self) -> u32 {
        self.frames.first().map_or(0, |f| f.delay_ms)
    }
}

/// Handle of an image stored in an [`ImageArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub u32);

/// Append-only owner of every decoded image used during a run.
///
/// Drawables refer to images by [`ImageId`]; the arena is released in bulk when the run ends.
#[derive(Debug, Default)]
pub struct ImageArena {
    images: Vec<Arc<DecodedImage>>,
}

impl ImageArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an image and return its handle.
    pub fn insert(&mut self, image: DecodedImage) -> ImageId {
        let id = ImageId(self.images.len() as u32);
        self.images.push(Arc::new(image));
        id
    }

    /// Borrow an image by handle.
    pub fn get(&self, id: ImageId) -> Option<&DecodedImage> {
        self.images.get(id.0 as usize).map(Arc::as_ref)
    }

    /// Number of stored images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// `true` when no image has been stored.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
