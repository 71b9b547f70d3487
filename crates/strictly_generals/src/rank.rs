//! Rank catalog: the fifteen piece kinds with their display codes,
//! combat power and per-side instance caps.
//!
//! The catalog is a static table indexed by [`Rank`]. Combat compares
//! power levels; the two exceptions (spy versus private, flag versus
//! flag) live in [`crate::rules::combat`], not here.

use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, IntoEnumIterator};
use tracing::instrument;

/// A piece kind.
///
/// Serialized as its display code (`"G5"`, `"PVT"`, ...).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumCount,
)]
#[serde(try_from = "String", into = "String")]
pub enum Rank {
    /// General of the army (five stars).
    FiveStarGeneral,
    /// General (four stars).
    FourStarGeneral,
    /// Lieutenant general (three stars).
    ThreeStarGeneral,
    /// Major general (two stars).
    TwoStarGeneral,
    /// Brigadier general (one star).
    OneStarGeneral,
    /// Colonel.
    Colonel,
    /// Lieutenant colonel.
    LieutenantColonel,
    /// Major.
    Major,
    /// Captain.
    Captain,
    /// First lieutenant.
    FirstLieutenant,
    /// Second lieutenant.
    SecondLieutenant,
    /// Sergeant.
    Sergeant,
    /// Private. The only rank that defeats a spy.
    Private,
    /// Flag. Losing it loses the game.
    Flag,
    /// Spy. Defeats every officer, loses to a private.
    Spy,
}

/// Static description of one rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankSpec {
    /// Short display code.
    pub code: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Power level used for combat comparisons.
    pub power: u8,
    /// Maximum number of instances per side.
    pub max_instances: u8,
}

// Indexed by `Rank as usize`; keep in declaration order.
const CATALOG: [RankSpec; Rank::COUNT] = [
    RankSpec {
        code: "G5",
        name: "Five-star general",
        power: 13,
        max_instances: 1,
    },
    RankSpec {
        code: "G4",
        name: "Four-star general",
        power: 12,
        max_instances: 1,
    },
    RankSpec {
        code: "G3",
        name: "Three-star general",
        power: 11,
        max_instances: 1,
    },
    RankSpec {
        code: "G2",
        name: "Two-star general",
        power: 10,
        max_instances: 1,
    },
    RankSpec {
        code: "G1",
        name: "One-star general",
        power: 9,
        max_instances: 1,
    },
    RankSpec {
        code: "COL",
        name: "Colonel",
        power: 8,
        max_instances: 1,
    },
    RankSpec {
        code: "LTC",
        name: "Lieutenant colonel",
        power: 7,
        max_instances: 1,
    },
    RankSpec {
        code: "MAJ",
        name: "Major",
        power: 6,
        max_instances: 1,
    },
    RankSpec {
        code: "CPT",
        name: "Captain",
        power: 5,
        max_instances: 1,
    },
    RankSpec {
        code: "1LT",
        name: "First lieutenant",
        power: 4,
        max_instances: 1,
    },
    RankSpec {
        code: "2LT",
        name: "Second lieutenant",
        power: 3,
        max_instances: 1,
    },
    RankSpec {
        code: "SGT",
        name: "Sergeant",
        power: 2,
        max_instances: 1,
    },
    RankSpec {
        code: "PVT",
        name: "Private",
        power: 1,
        max_instances: 6,
    },
    RankSpec {
        code: "FLG",
        name: "Flag",
        power: 0,
        max_instances: 1,
    },
    RankSpec {
        code: "SPY",
        name: "Spy",
        power: 14,
        max_instances: 2,
    },
];

/// Number of pieces each side fields in a complete layout.
pub const PIECES_PER_SIDE: usize = 21;

impl Rank {
    /// Returns the catalog entry for this rank.
    pub fn spec(self) -> &'static RankSpec {
        &CATALOG[self as usize]
    }

    /// Short display code, e.g. `"SGT"`.
    pub fn code(self) -> &'static str {
        self.spec().code
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Power level used in combat.
    pub fn power(self) -> u8 {
        self.spec().power
    }

    /// Maximum instances of this rank per side.
    pub fn max_instances(self) -> u8 {
        self.spec().max_instances
    }

    /// Returns true for the flag.
    pub fn is_flag(self) -> bool {
        self == Rank::Flag
    }

    /// Looks up a rank by display code (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`UnknownRank`] if no rank carries the code.
    #[instrument]
    pub fn from_code(code: &str) -> Result<Self, UnknownRank> {
        let wanted = code.trim();
        Rank::iter()
            .find(|rank| rank.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownRank(code.to_string()))
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl From<Rank> for String {
    fn from(rank: Rank) -> Self {
        rank.code().to_string()
    }
}

impl TryFrom<String> for Rank {
    type Error = UnknownRank;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Rank::from_code(&code)
    }
}

/// A display code that names no rank in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("Unknown rank code {:?}", _0)]
pub struct UnknownRank(pub String);

impl std::error::Error for UnknownRank {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_has_fifteen_ranks() {
        assert_eq!(Rank::iter().count(), 15);
    }

    #[test]
    fn test_codes_are_unique() {
        let codes: HashSet<_> = Rank::iter().map(Rank::code).collect();
        assert_eq!(codes.len(), Rank::COUNT);
    }

    #[test]
    fn test_powers_are_distinct() {
        let powers: HashSet<_> = Rank::iter().map(Rank::power).collect();
        assert_eq!(powers.len(), Rank::COUNT);
    }

    #[test]
    fn test_full_side_is_twenty_one_pieces() {
        let total: usize = Rank::iter().map(|r| r.max_instances() as usize).sum();
        assert_eq!(total, PIECES_PER_SIDE);
    }

    #[test]
    fn test_officer_ordering() {
        assert!(Rank::FiveStarGeneral.power() > Rank::FourStarGeneral.power());
        assert!(Rank::Colonel.power() > Rank::LieutenantColonel.power());
        assert!(Rank::Sergeant.power() > Rank::Private.power());
        assert!(Rank::Private.power() > Rank::Flag.power());
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Rank::from_code("SPY"), Ok(Rank::Spy));
        assert_eq!(Rank::from_code("pvt"), Ok(Rank::Private));
        assert_eq!(Rank::from_code(" 1LT "), Ok(Rank::FirstLieutenant));
    }

    #[test]
    fn test_unknown_code() {
        let err = Rank::from_code("KING").unwrap_err();
        assert!(err.to_string().contains("KING"));
    }

    #[test]
    fn test_serializes_as_code() {
        let json = serde_json::to_string(&Rank::TwoStarGeneral).unwrap();
        assert_eq!(json, "\"G2\"");
        let back: Rank = serde_json::from_str("\"FLG\"").unwrap();
        assert_eq!(back, Rank::Flag);
        assert!(serde_json::from_str::<Rank>("\"XX\"").is_err());
    }
}
