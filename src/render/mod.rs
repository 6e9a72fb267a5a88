//! Frame composition for the scrolling chat overlay.

/// Animated image frame selection.
pub mod animator;
/// CPU raster target.
pub mod canvas;
/// Message admission and bottom-anchored stacking.
pub mod compositor;
