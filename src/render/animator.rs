use crate::foundation::core::FrameIndex;

/// Active sub-frame of an image with `frame_count` sub-frames at output frame `frame`.
///
/// Animation advances one sub-frame per output frame, independent of encoded delays.
pub fn sub_frame_for(frame: FrameIndex, frame_count: usize) -> usize {
    if frame_count <= 1 {
        return 0;
    }
    (frame.0 % frame_count as u64) as usize
}

#[cfg(test)]
#[path = "../../tests/unit/render/animator.rs"]
mod tests;
