//! Emote, badge and cheer resolution.

/// Cheermote tiers and token parsing.
pub mod cheer;
/// Emote pack manifest.
pub mod manifest;
/// Token-to-image resolution backed by an emote pack.
pub mod resolver;
