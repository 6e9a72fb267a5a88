use std::collections::HashMap;
use std::path::Path;

use anyhow::Context as _;
use serde::Deserialize;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{ReelError, ReelResult};

/// Local description of every emote, badge and cheer image available to a run.
///
/// All image values are keys understood by the run's [`ImageFetcher`](crate::ImageFetcher),
/// typically paths relative to the pack directory.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct EmotePack {
    /// Emoji glyph (a single astral code point) to image.
    pub emoji: HashMap<String, String>,
    /// FrankerFaceZ emote code to image.
    pub ffz: HashMap<String, String>,
    /// BetterTTV emote code to image.
    pub bttv: HashMap<String, String>,
    /// Native emote id to image.
    pub native: HashMap<String, String>,
    /// Badge set id to version to image.
    pub badges: HashMap<String, HashMap<String, String>>,
    /// Cheer actions.
    pub cheers: Vec<CheerAction>,
}

/// One cheer prefix and its tiers.
#[derive(Clone, Debug, Deserialize)]
pub struct CheerAction {
    /// Prefix as typed in chat (`Cheer`, `Kappa`, ...); matched case-insensitively.
    pub prefix: String,
    /// Tiers in any order.
    pub tiers: Vec<CheerTierDef>,
}

/// One cheer tier.
#[derive(Clone, Debug, Deserialize)]
pub struct CheerTierDef {
    /// Smallest amount that selects this tier.
    pub min_bits: u32,
    /// Color of the amount label.
    pub color: Rgba8,
    /// Tier image key.
    pub image: String,
    /// Tiers that cannot be cheered are ignored.
    #[serde(default = "yes")]
    pub can_cheer: bool,
}

fn yes() -> bool {
    true
}

impl EmotePack {
    /// Parse a pack manifest from JSON.
    pub fn from_json(json: &str) -> ReelResult<Self> {
        serde_json::from_str(json).map_err(|e| ReelError::serde(format!("emote pack: {e}")))
    }

    /// Read and parse a pack manifest file.
    pub fn load(path: &Path) -> ReelResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read emote pack '{}'", path.display()))?;
        let pack = Self::from_json(&json)?;
        tracing::info!(
            emoji = pack.emoji.len(),
            ffz = pack.ffz.len(),
            bttv = pack.bttv.len(),
            native = pack.native.len(),
            badge_sets = pack.badges.len(),
            cheers = pack.cheers.len(),
            "loaded emote pack"
        );
        Ok(pack)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tokens/manifest.rs"]
mod tests;
