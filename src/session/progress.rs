use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Stage of a run, as reported to observers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Nothing running (also reported after cancellation).
    Idle,
    /// Reading chat history.
    LoadingChat,
    /// Loading emote, badge and cheer images.
    LoadingEmotes,
    /// Laying out messages.
    LayingOut,
    /// Producing frames.
    Rendering,
    /// Finalizing the output.
    CleaningUp,
}

/// One progress report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    /// Units done in this phase.
    pub current: u64,
    /// Units in this phase.
    pub total: u64,
    /// Phase.
    pub phase: Phase,
}

impl Progress {
    /// Completed fraction in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.current as f64 / self.total as f64).clamp(0.0, 1.0)
    }
}

/// Receives progress reports.
pub trait ProgressObserver {
    /// Called for every report.
    fn report(&mut self, progress: Progress);
}

impl<F: FnMut(Progress)> ProgressObserver for F {
    fn report(&mut self, progress: Progress) {
        self(progress)
    }
}

/// Observer that ignores every report.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn report(&mut self, _progress: Progress) {}
}

/// Shared cancellation flag, checked once per output frame.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Fresh, not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; visible to every clone.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// `true` once [`CancelToken::cancel`] was called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/progress.rs"]
mod tests;
