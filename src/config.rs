//! Run configuration.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::encode::sink::SinkConfig;
use crate::foundation::core::{Fps, Rgba8};
use crate::foundation::error::{ReelError, ReelResult};
use crate::layout::engine::LayoutOpts;
use crate::render::compositor::CompositorOpts;

/// Everything that shapes one chat video. Missing JSON fields take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VideoConfig {
    /// Frame width in pixels; also the wrap width.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Output frames per second.
    pub fps: u32,
    /// Regular chat font (TTF/OTF).
    pub font_path: Option<PathBuf>,
    /// Bold font for author tags; the regular font is used when absent.
    pub bold_font_path: Option<PathBuf>,
    /// Font size in pixels.
    pub font_size: f32,
    /// Frame background.
    pub background: Rgba8,
    /// Message text color.
    pub chat_color: Rgba8,
    /// Vertical gap between messages.
    pub line_spacing: f32,
    /// Draw badges in front of author names.
    pub show_badges: bool,
    /// Include replay chat posted after the broadcast.
    pub show_replay: bool,
    /// Seed for generated author colors.
    pub color_seed: u64,
    /// Video length; defaults to the last message plus `tail_secs`.
    pub duration_secs: Option<f64>,
    /// Time kept after the last message when `duration_secs` is unset.
    pub tail_secs: f64,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 300,
            fps: 24,
            font_path: None,
            bold_font_path: None,
            font_size: 10.0,
            background: Rgba8::BLACK,
            chat_color: Rgba8::WHITE,
            line_spacing: 4.0,
            show_badges: true,
            show_replay: false,
            color_seed: 0,
            duration_secs: None,
            tail_secs: 5.0,
        }
    }
}

impl VideoConfig {
    /// Parse a config from JSON.
    pub fn from_json(json: &str) -> ReelResult<Self> {
        serde_json::from_str(json).map_err(|e| ReelError::serde(format!("config: {e}")))
    }

    /// Read a config file. Relative font paths resolve against the file's directory.
    pub fn load(path: &Path) -> ReelResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let mut cfg = Self::from_json(&json)?;
        if let Some(dir) = path.parent() {
            for p in [&mut cfg.font_path, &mut cfg.bold_font_path]
                .into_iter()
                .flatten()
            {
                if p.is_relative() {
                    *p = dir.join(&*p);
                }
            }
        }
        Ok(cfg)
    }

    /// Reject values no run can work with.
    pub fn validate(&self) -> ReelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ReelError::validation("width/height must be non-zero"));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(ReelError::validation("width/height must fit in u16"));
        }
        if self.fps == 0 {
            return Err(ReelError::validation("fps must be non-zero"));
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(ReelError::validation("font_size must be finite and > 0"));
        }
        if !self.line_spacing.is_finite() || self.line_spacing < 0.0 {
            return Err(ReelError::validation("line_spacing must be finite and >= 0"));
        }
        if let Some(d) = self.duration_secs
            && (!d.is_finite() || d < 0.0)
        {
            return Err(ReelError::validation("duration_secs must be finite and >= 0"));
        }
        if !self.tail_secs.is_finite() || self.tail_secs < 0.0 {
            return Err(ReelError::validation("tail_secs must be finite and >= 0"));
        }
        Ok(())
    }

    /// Output frame rate.
    pub fn frame_rate(&self) -> ReelResult<Fps> {
        Fps::integer(self.fps)
    }

    /// Video length in seconds for a chat whose last message is at `last_offset`.
    pub fn duration_for(&self, last_offset: Option<f64>) -> f64 {
        self.duration_secs
            .unwrap_or_else(|| last_offset.unwrap_or(0.0).max(0.0) + self.tail_secs)
    }

    /// Layout inputs derived from this config.
    pub fn layout_opts(&self) -> ReelResult<LayoutOpts> {
        Ok(LayoutOpts {
            max_width: self.width as f32,
            fps: self.frame_rate()?,
            chat_color: self.chat_color,
            background: self.background,
            show_badges: self.show_badges,
        })
    }

    /// Compositor inputs derived from this config.
    pub fn compositor_opts(&self) -> CompositorOpts {
        CompositorOpts {
            width: self.width,
            height: self.height,
            background: self.background,
            line_spacing: self.line_spacing,
            show_replay: self.show_replay,
        }
    }

    /// Sink inputs derived from this config.
    pub fn sink_config(&self) -> ReelResult<SinkConfig> {
        Ok(SinkConfig {
            width: self.width,
            height: self.height,
            fps: self.frame_rate()?,
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
