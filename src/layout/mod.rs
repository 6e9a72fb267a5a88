//! Chat message layout: tokens to positioned drawables.

/// Line breaking and drawable placement.
pub mod engine;
/// Laid-out message model.
pub mod model;
/// Author name colors.
pub mod palette;
