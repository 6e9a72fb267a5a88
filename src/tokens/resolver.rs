use std::collections::HashMap;

use crate::assets::decode::decode_image;
use crate::assets::fetch::ImageFetcher;
use crate::assets::store::{ImageArena, ImageId};
use crate::foundation::error::ReelResult;
use crate::tokens::cheer::{Cheer, CheerTable};
use crate::tokens::manifest::EmotePack;

/// Handle to a resolved image plus the metadata layout needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedImage {
    /// Arena handle.
    pub id: ImageId,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Number of animation sub-frames (1 for still images).
    pub frame_count: usize,
    /// Delay of one sub-frame in milliseconds; informational.
    pub delay_ms: u32,
}

/// Third-party emote providers, in lookup priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ThirdPartyProvider {
    /// FrankerFaceZ.
    FrankerFaceZ,
    /// BetterTTV.
    BetterTtv,
}

impl ThirdPartyProvider {
    /// Lookup order used by [`TokenResolver::resolve_third_party`].
    pub const PRIORITY: [Self; 2] = [Self::FrankerFaceZ, Self::BetterTtv];
}

/// Decides what a chat word denotes and supplies its image.
///
/// Misses are never errors: every method answers `None` and layout falls back to text.
pub trait TokenResolver {
    /// `true` when `glyph` (one astral code point) is a known emoji.
    fn knows_emoji(&self, glyph: &str) -> bool;

    /// Image for an emoji glyph.
    fn resolve_emoji(&mut self, word: &str) -> Option<ResolvedImage>;

    /// Image for a third-party emote code, trying providers in [`ThirdPartyProvider::PRIORITY`].
    fn resolve_third_party(&mut self, word: &str) -> Option<ResolvedImage>;

    /// Image for a native emote id.
    fn resolve_native(&mut self, id: &str) -> Option<ResolvedImage>;

    /// Cheer image, label color and amount for a `<prefix><amount>` token.
    ///
    /// Only consulted when the message spent bits (`has_bits`).
    fn resolve_cheer(&mut self, word: &str, has_bits: bool) -> Option<Cheer>;

    /// Image for a badge version.
    fn resolve_badge(&mut self, id: &str, version: &str) -> Option<ResolvedImage>;

    /// Arena holding every image handed out so far.
    fn images(&self) -> &ImageArena;
}

/// [`TokenResolver`] backed by an [`EmotePack`] manifest and an [`ImageFetcher`].
///
/// Images are fetched and decoded lazily on first use and cached per image key, failures included.
pub struct PackResolver<F: ImageFetcher> {
    pack: EmotePack,
    cheers: CheerTable,
    fetcher: F,
    arena: ImageArena,
    cache: HashMap<String, Option<ResolvedImage>>,
}

impl<F: ImageFetcher> PackResolver<F> {
    /// Create a resolver over `pack`, reading image bytes from `fetcher`.
    pub fn new(pack: EmotePack, fetcher: F) -> Self {
        let cheers = CheerTable::new(&pack.cheers);
        Self {
            pack,
            cheers,
            fetcher,
            arena: ImageArena::new(),
            cache: HashMap::new(),
        }
    }

    /// Manifest this resolver serves.
    pub fn pack(&self) -> &EmotePack {
        &self.pack
    }

    /// Decode every image named by the pack up front. Returns the number of usable images.
    ///
    /// Optional: lookups load lazily anyway; this moves the cost into a separate phase.
    #[tracing::instrument(skip(self))]
    pub fn preload(&mut self) -> usize {
        let mut keys: Vec<String> = self
            .pack
            .emoji
            .values()
            .chain(self.pack.ffz.values())
            .chain(self.pack.bttv.values())
            .chain(self.pack.native.values())
            .chain(self.pack.badges.values().flat_map(|v| v.values()))
            .chain(
                self.pack
                    .cheers
                    .iter()
                    .flat_map(|c| c.tiers.iter().map(|t| &t.image)),
            )
            .cloned()
            .collect();
        keys.sort();
        keys.dedup();
        let loaded = keys.iter().filter(|k| self.load(k).is_some()).count();
        tracing::info!(loaded, total = keys.len(), "preloaded emote pack images");
        loaded
    }

    fn load(&mut self, key: &str) -> Option<ResolvedImage> {
        if let Some(hit) = self.cache.get(key) {
            return *hit;
        }
        let resolved = match self.fetch_decode(key) {
            Ok(img) => Some(img),
            Err(e) => {
                tracing::debug!(key, error = %e, "image unavailable");
                None
            }
        };
        self.cache.insert(key.to_owned(), resolved);
        resolved
    }

    fn fetch_decode(&mut self, key: &str) -> ReelResult<ResolvedImage> {
        let bytes = self.fetcher.fetch(key)?;
        let decoded = decode_image(&bytes)?;
        let (width, height) = (decoded.width, decoded.height);
        let frame_count = decoded.frame_count();
        let delay_ms = decoded.frame_delay_ms();
        let id = self.arena.insert(decoded);
        Ok(ResolvedImage {
            id,
            width,
            height,
            frame_count,
            delay_ms,
        })
    }

    fn provider_key(&self, provider: ThirdPartyProvider, word: &str) -> Option<String> {
        let table = match provider {
            ThirdPartyProvider::FrankerFaceZ => &self.pack.ffz,
            ThirdPartyProvider::BetterTtv => &self.pack.bttv,
        };
        table.get(word).cloned()
    }
}

impl<F: ImageFetcher> TokenResolver for PackResolver<F> {
    fn knows_emoji(&self, glyph: &str) -> bool {
        self.pack.emoji.contains_key(glyph)
    }

    fn resolve_emoji(&mut self, word: &str) -> Option<ResolvedImage> {
        let key = self.pack.emoji.get(word)?.clone();
        self.load(&key)
    }

    fn resolve_third_party(&mut self, word: &str) -> Option<ResolvedImage> {
        for provider in ThirdPartyProvider::PRIORITY {
            if let Some(key) = self.provider_key(provider, word)
                && let Some(img) = self.load(&key)
            {
                return Some(img);
            }
        }
        None
    }

    fn resolve_native(&mut self, id: &str) -> Option<ResolvedImage> {
        let key = self.pack.native.get(id)?.clone();
        self.load(&key)
    }

    fn resolve_cheer(&mut self, word: &str, has_bits: bool) -> Option<Cheer> {
        if !has_bits {
            return None;
        }
        let (tier, amount) = self.cheers.lookup(word)?;
        let (key, color) = (tier.image.clone(), tier.color);
        let image = self.load(&key)?;
        Some(Cheer {
            image,
            color,
            amount,
        })
    }

    fn resolve_badge(&mut self, id: &str, version: &str) -> Option<ResolvedImage> {
        let key = self.pack.badges.get(id)?.get(version)?.clone();
        self.load(&key)
    }

    fn images(&self) -> &ImageArena {
        &self.arena
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tokens/resolver.rs"]
mod tests;
