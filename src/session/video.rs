use crate::chat::message::ChatMessage;
use crate::config::VideoConfig;
use crate::encode::sink::FrameSink;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::ReelResult;
use crate::layout::engine::LayoutEngine;
use crate::layout::model::DrawableMessage;
use crate::render::canvas::{CpuCanvas, FrameRGBA};
use crate::render::compositor::{Admission, ScrollCompositor};
use crate::session::progress::{CancelToken, NoProgress, Phase, Progress, ProgressObserver};
use crate::text::engine::TextEngine;
use crate::tokens::resolver::TokenResolver;

/// Counters of one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Messages laid out.
    pub messages: u64,
    /// Frames the run was asked to produce.
    pub frames_total: u64,
    /// Frames pushed to the sink.
    pub frames_rendered: u64,
    /// Messages moved onto the visible stack.
    pub admitted: u64,
    /// Replay messages discarded on admission.
    pub dropped: u64,
}

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Every frame reached the sink and the sink finished.
    Completed(RenderStats),
    /// The cancel token fired; the sink was aborted.
    Cancelled(RenderStats),
}

/// Turns a chat history into frames: layout once per message, then one composite per frame.
pub struct ChatVideo {
    config: VideoConfig,
    layout: LayoutEngine,
    resolver: Box<dyn TokenResolver>,
    text: Box<dyn TextEngine>,
}

impl ChatVideo {
    /// Validate `config` and assemble a driver.
    pub fn new(
        config: VideoConfig,
        resolver: Box<dyn TokenResolver>,
        text: Box<dyn TextEngine>,
    ) -> ReelResult<Self> {
        config.validate()?;
        let layout = LayoutEngine::new(config.layout_opts()?, config.color_seed)?;
        Ok(Self {
            config,
            layout,
            resolver,
            text,
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &VideoConfig {
        &self.config
    }

    /// Index of the last output frame; frames `0..=total_frames` are produced.
    pub fn total_frames(&self, messages: &[ChatMessage]) -> ReelResult<u64> {
        let last = messages
            .iter()
            .map(|m| m.time_offset)
            .fold(None, |acc: Option<f64>, t| Some(acc.map_or(t, |a| a.max(t))));
        let duration = self.config.duration_for(last);
        Ok(self.config.frame_rate()?.secs_to_frames_floor(duration))
    }

    /// Lay out every message. The author palette starts empty.
    #[tracing::instrument(skip_all, fields(messages = messages.len()))]
    pub fn layout_all(
        &mut self,
        messages: &[ChatMessage],
        progress: &mut dyn ProgressObserver,
    ) -> ReelResult<Vec<DrawableMessage>> {
        self.layout.palette().clear();
        let total = messages.len() as u64;
        let mut out = Vec::with_capacity(messages.len());
        for (i, message) in messages.iter().enumerate() {
            progress.report(Progress {
                current: i as u64 + 1,
                total,
                phase: Phase::LayingOut,
            });
            let drawable = self
                .layout
                .layout(message, &mut *self.resolver, &mut *self.text)
                .map_err(|e| e.at_message(i))?;
            out.push(drawable);
        }
        tracing::info!(
            messages = out.len(),
            images = self.resolver.images().len(),
            "layout finished"
        );
        Ok(out)
    }

    /// Render the single frame `frame` as the full run would produce it.
    ///
    /// Admission is replayed from frame 0, so the stack matches the streamed output.
    pub fn render_still(&mut self, messages: &[ChatMessage], frame: FrameIndex) -> ReelResult<FrameRGBA> {
        let drawables = self.layout_all(messages, &mut NoProgress)?;
        let mut compositor = ScrollCompositor::new(self.config.compositor_opts(), drawables)?;
        for i in 0..=frame.0 {
            compositor.admit(FrameIndex(i));
        }
        let mut canvas = CpuCanvas::new(self.config.width, self.config.height)?;
        compositor
            .paint(&mut canvas, &mut *self.text, self.resolver.images(), frame)
            .map_err(|e| e.at_frame(frame.0))
    }

    /// Produce the whole video into `sink`.
    ///
    /// `cancel` is polled before every frame. Any failure aborts the sink before returning.
    #[tracing::instrument(skip_all, fields(messages = messages.len()))]
    pub fn render(
        &mut self,
        messages: &[ChatMessage],
        sink: &mut dyn FrameSink,
        progress: &mut dyn ProgressObserver,
        cancel: &CancelToken,
    ) -> ReelResult<RenderOutcome> {
        let sink_cfg = self.config.sink_config()?;
        let last_frame = self.total_frames(messages)?;
        let drawables = self.layout_all(messages, progress)?;

        let mut stats = RenderStats {
            messages: drawables.len() as u64,
            frames_total: last_frame + 1,
            ..RenderStats::default()
        };
        let mut compositor = ScrollCompositor::new(self.config.compositor_opts(), drawables)?;
        let mut canvas = CpuCanvas::new(self.config.width, self.config.height)?;

        tracing::info!(frames = stats.frames_total, "rendering");
        sink.begin(sink_cfg)?;

        for i in 0..=last_frame {
            if cancel.is_cancelled() {
                tracing::info!(frame = i, "render cancelled");
                sink.abort();
                progress.report(Progress {
                    current: 0,
                    total: 0,
                    phase: Phase::Idle,
                });
                return Ok(RenderOutcome::Cancelled(stats));
            }

            let idx = FrameIndex(i);
            match compositor.admit(idx) {
                Admission::Admitted => stats.admitted += 1,
                Admission::Dropped => stats.dropped += 1,
                Admission::Waiting => {}
            }
            let pushed = compositor
                .paint(&mut canvas, &mut *self.text, self.resolver.images(), idx)
                .and_then(|frame| sink.push_frame(idx, &frame));
            if let Err(e) = pushed {
                sink.abort();
                return Err(e.at_frame(i));
            }
            stats.frames_rendered += 1;
            progress.report(Progress {
                current: stats.frames_rendered,
                total: stats.frames_total,
                phase: Phase::Rendering,
            });
        }

        progress.report(Progress {
            current: 0,
            total: 1,
            phase: Phase::CleaningUp,
        });
        if let Err(e) = sink.end() {
            sink.abort();
            return Err(e);
        }
        tracing::info!(
            frames = stats.frames_rendered,
            admitted = stats.admitted,
            dropped = stats.dropped,
            "render finished"
        );
        Ok(RenderOutcome::Completed(stats))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/video.rs"]
mod tests;
