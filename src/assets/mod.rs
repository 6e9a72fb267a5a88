//! Image loading for emotes, badges and cheer tiers.

/// Decoding of still and animated images into premultiplied frames.
pub mod decode;
/// Byte sources for image assets.
pub mod fetch;
/// Decoded image storage addressed by [`store::ImageId`].
pub mod store;
