/// Frame indices, frame rates, canvas sizes and colors.
pub mod core;
/// Crate error type.
pub mod error;
pub(crate) mod math;
