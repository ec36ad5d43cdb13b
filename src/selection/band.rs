use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{BALANCED_TIER_MAX, EASY_TIER_MAX};

/// 难度档位，由词条的 tier 派生，不单独持久化。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyBand {
    Easy,
    Balanced,
    Advanced,
}

impl DifficultyBand {
    /// Classify a nullable numeric tier into a band. This is the single
    /// classification point; eligibility filters and the fallback table
    /// must agree on it.
    pub fn from_tier(tier: Option<i64>) -> Self {
        match tier {
            Some(t) if t <= EASY_TIER_MAX => Self::Easy,
            Some(t) if t > BALANCED_TIER_MAX => Self::Advanced,
            _ => Self::Balanced,
        }
    }

    /// The ordered list of bands tried when the requested band has no
    /// eligible, unused word. The requested band is always first.
    pub fn fallback_chain(self) -> &'static [DifficultyBand] {
        match self {
            Self::Easy => &[Self::Easy, Self::Balanced],
            Self::Balanced => &[Self::Balanced, Self::Easy, Self::Advanced],
            Self::Advanced => &[Self::Advanced, Self::Balanced],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Balanced => "balanced",
            Self::Advanced => "advanced",
        }
    }
}

impl fmt::Display for DifficultyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyBand {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Self::Easy),
            "balanced" => Ok(Self::Balanced),
            "advanced" => Ok(Self::Advanced),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_thresholds() {
        assert_eq!(DifficultyBand::from_tier(Some(1)), DifficultyBand::Easy);
        assert_eq!(DifficultyBand::from_tier(Some(35)), DifficultyBand::Easy);
        assert_eq!(DifficultyBand::from_tier(Some(36)), DifficultyBand::Balanced);
        assert_eq!(DifficultyBand::from_tier(Some(60)), DifficultyBand::Balanced);
        assert_eq!(DifficultyBand::from_tier(Some(61)), DifficultyBand::Advanced);
        assert_eq!(DifficultyBand::from_tier(None), DifficultyBand::Balanced);
    }

    #[test]
    fn fallback_chains_start_with_requested_band() {
        for band in [
            DifficultyBand::Easy,
            DifficultyBand::Balanced,
            DifficultyBand::Advanced,
        ] {
            assert_eq!(band.fallback_chain()[0], band);
        }
    }

    #[test]
    fn balanced_chain_covers_all_bands() {
        assert_eq!(
            DifficultyBand::Balanced.fallback_chain(),
            &[
                DifficultyBand::Balanced,
                DifficultyBand::Easy,
                DifficultyBand::Advanced
            ]
        );
    }

    #[test]
    fn round_trips_through_str() {
        for band in [
            DifficultyBand::Easy,
            DifficultyBand::Balanced,
            DifficultyBand::Advanced,
        ] {
            assert_eq!(band.as_str().parse::<DifficultyBand>(), Ok(band));
        }
    }
}
