use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::foundation::core::Rgba8;
use crate::foundation::math::Fnv1a64;

/// Per-run author color memory.
///
/// Authors without an explicit color get a stable pseudo-random color derived from the seed and
/// their name. Legibility-corrected colors are remembered per author. Both maps are cleared at the
/// start of every run.
#[derive(Debug, Default)]
pub struct AuthorPalette {
    seed: u64,
    random: Mutex<HashMap<String, Rgba8>>,
    corrected: Mutex<HashMap<String, (Rgba8, Rgba8)>>,
}

impl AuthorPalette {
    /// Empty palette; `seed` selects the family of generated colors.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Forget every remembered color.
    pub fn clear(&self) {
        self.random
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.corrected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of authors with a generated color.
    pub fn generated_len(&self) -> usize {
        self.random
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Color for `author`, legible against `background`.
    pub fn color_for(&self, author: &str, explicit: Option<Rgba8>, background: Rgba8) -> Rgba8 {
        let base = explicit.unwrap_or_else(|| self.random_color(author));
        let mut corrected = self
            .corrected
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(&(src, out)) = corrected.get(author)
            && src == base
        {
            return out;
        }
        let out = contrast(base, background);
        corrected.insert(author.to_owned(), (base, out));
        out
    }

    fn random_color(&self, author: &str) -> Rgba8 {
        let mut random = self.random.lock().unwrap_or_else(PoisonError::into_inner);
        *random
            .entry(author.to_owned())
            .or_insert_with(|| seeded_color(self.seed, author))
    }
}

/// Opaque color in `0..255` per channel, stable for `(seed, name)`.
pub(crate) fn seeded_color(seed: u64, name: &str) -> Rgba8 {
    let mut h = Fnv1a64::new(seed);
    h.write_bytes(name.as_bytes());
    let v = h.finish();
    let channel = |shift: u32| ((v >> shift) & 0xFFFF) as u16 % 255;
    Rgba8::rgb(channel(0) as u8, channel(16) as u8, channel(32) as u8)
}

/// Push `value` away from `background` when every channel is within the wrapping 128 window.
pub fn contrast(value: Rgba8, background: Rgba8) -> Rgba8 {
    let close = |c: u8, bg: u8| c.wrapping_sub(bg) < 128;
    if close(value.r, background.r) && close(value.g, background.g) && close(value.b, background.b)
    {
        let flip = |c: u8| ((u16::from(c) + 128) % 255) as u8;
        return Rgba8 {
            r: flip(value.r),
            g: flip(value.g),
            b: flip(value.b),
            a: value.a,
        };
    }
    value
}

#[cfg(test)]
#[path = "../../tests/unit/layout/palette.rs"]
mod tests;
