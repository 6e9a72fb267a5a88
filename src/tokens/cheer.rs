use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::Regex;

use crate::foundation::core::Rgba8;
use crate::tokens::manifest::{CheerAction, CheerTierDef};
use crate::tokens::resolver::ResolvedImage;

static CHEER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]+)(\d+)$").expect("valid cheer token regex"));

/// A resolved cheer token: tier image, amount label color, and the amount itself.
#[derive(Clone, Debug, PartialEq)]
pub struct Cheer {
    /// Image of the selected tier.
    pub image: ResolvedImage,
    /// Color of the amount label.
    pub color: Rgba8,
    /// Number of bits in the token.
    pub amount: u32,
}

/// Split a `<letters><digits>` token into its lowercase prefix and amount.
///
/// Returns `None` for anything else, including amounts that overflow `u32`.
pub fn parse_cheer_token(word: &str) -> Option<(String, u32)> {
    let caps = CHEER_TOKEN.captures(word)?;
    let prefix = caps.get(1)?.as_str().to_ascii_lowercase();
    let amount = caps.get(2)?.as_str().parse::<u32>().ok()?;
    Some((prefix, amount))
}

/// Cheerable tiers grouped by lowercase prefix.
#[derive(Clone, Debug, Default)]
pub struct CheerTable {
    actions: HashMap<String, BTreeMap<u32, CheerTierDef>>,
}

impl CheerTable {
    /// Index cheer actions, skipping tiers that cannot be cheered and prefixes left with none.
    pub fn new(actions: &[CheerAction]) -> Self {
        let mut out: HashMap<String, BTreeMap<u32, CheerTierDef>> = HashMap::new();
        for action in actions {
            let tiers: BTreeMap<u32, CheerTierDef> = action
                .tiers
                .iter()
                .filter(|t| t.can_cheer)
                .map(|t| (t.min_bits, t.clone()))
                .collect();
            if tiers.is_empty() {
                continue;
            }
            out.entry(action.prefix.to_ascii_lowercase())
                .or_default()
                .extend(tiers);
        }
        Self { actions: out }
    }

    /// Number of cheerable prefixes.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// `true` when no prefix is cheerable.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Highest tier of `prefix` whose minimum does not exceed `amount`.
    pub fn select_tier(&self, prefix: &str, amount: u32) -> Option<&CheerTierDef> {
        let tiers = self.actions.get(&prefix.to_ascii_lowercase())?;
        tiers.range(..=amount).next_back().map(|(_, t)| t)
    }

    /// Parse `word` and select its tier. Zero amounts never match.
    pub fn lookup(&self, word: &str) -> Option<(&CheerTierDef, u32)> {
        let (prefix, amount) = parse_cheer_token(word)?;
        if amount == 0 {
            return None;
        }
        self.select_tier(&prefix, amount).map(|t| (t, amount))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tokens/cheer.rs"]
mod tests;
