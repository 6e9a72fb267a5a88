//! End-to-end driver: chat history in, frames out.

/// Progress reporting and cancellation.
pub mod progress;
/// The render driver.
pub mod video;
