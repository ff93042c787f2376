//! Loyalty tier lookup.
//!
//! Maps a tier identifier to the tint applied over the background, the label
//! of the next tier up and the card graphic shown under the arcs.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::color::Rgb;

/// The five named loyalty tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Classic,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::Classic,
        Tier::Silver,
        Tier::Gold,
        Tier::Platinum,
        Tier::Diamond,
    ];

    /// Case-insensitive, whitespace-tolerant parse. Unknown values yield `None`.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "classic" => Some(Tier::Classic),
            "silver" => Some(Tier::Silver),
            "gold" => Some(Tier::Gold),
            "platinum" => Some(Tier::Platinum),
            "diamond" => Some(Tier::Diamond),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Classic => "classic",
            Tier::Silver => "silver",
            Tier::Gold => "gold",
            Tier::Platinum => "platinum",
            Tier::Diamond => "diamond",
        }
    }
}

impl Default for Tier {
    fn default() -> Self {
        Tier::Gold
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assets and colors derived from a tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierAssets {
    pub tint_color: Rgb,
    pub next_tier_label: &'static str,
    pub card_asset_name: &'static str,
}

const CLASSIC: TierAssets = TierAssets {
    tint_color: Rgb::new(0x05, 0x00, 0x33),
    next_tier_label: "Silver",
    card_asset_name: "card_silver.png",
};

const SILVER: TierAssets = TierAssets {
    tint_color: Rgb::new(0x76, 0x77, 0x7A),
    next_tier_label: "Gold",
    card_asset_name: "card_gold.png",
};

const GOLD: TierAssets = TierAssets {
    tint_color: Rgb::new(0xAF, 0x91, 0x3A),
    next_tier_label: "Platinum",
    card_asset_name: "card_platinum.png",
};

const PLATINUM: TierAssets = TierAssets {
    tint_color: Rgb::new(0x39, 0x40, 0x49),
    next_tier_label: "Diamond",
    card_asset_name: "card_diamond.png",
};

/// Diamond and unrecognized tiers: diamond card and label with the gold tint.
const FALLBACK: TierAssets = TierAssets {
    tint_color: Rgb::new(0xAF, 0x91, 0x3A),
    next_tier_label: "Diamond",
    card_asset_name: "card_diamond.png",
};

/// Pure tier-to-assets table.
#[derive(Debug, Clone, Copy, Default)]
pub struct TierPolicy;

impl TierPolicy {
    /// Resolve raw tier input (any case, surrounding whitespace allowed).
    pub fn resolve(&self, tier_input: &str) -> TierAssets {
        self.resolve_tier(Tier::parse(tier_input))
    }

    pub fn resolve_tier(&self, tier: Option<Tier>) -> TierAssets {
        match tier {
            Some(Tier::Classic) => CLASSIC,
            Some(Tier::Silver) => SILVER,
            Some(Tier::Gold) => GOLD,
            Some(Tier::Platinum) => PLATINUM,
            Some(Tier::Diamond) | None => FALLBACK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive_and_trimmed() {
        assert_eq!(Tier::parse("  PlAtInUm "), Some(Tier::Platinum));
        assert_eq!(Tier::parse("gold"), Some(Tier::Gold));
        assert_eq!(Tier::parse("bronze"), None);
    }

    #[test]
    fn test_tier_names_round_trip() {
        for tier in Tier::ALL {
            assert_eq!(Tier::parse(tier.as_str()), Some(tier));
        }
    }
}
