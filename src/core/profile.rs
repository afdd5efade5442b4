//! Regional sizing charts.
//!
//! Every chart is expressed in centimeters. Chest bounds apply to the
//! half-circumference (chest width), not the full circumference.

use crate::domain::model::{Classification, SizeLabel, Unit};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileName {
    Default,
    East,
    West,
}

impl ProfileName {
    pub const ALL: [ProfileName; 3] = [ProfileName::Default, ProfileName::East, ProfileName::West];

    pub fn profile(self) -> &'static SizeProfile {
        match self {
            ProfileName::Default => &DEFAULT_PROFILE,
            ProfileName::East => &EAST_PROFILE,
            ProfileName::West => &WEST_PROFILE,
        }
    }
}

impl fmt::Display for ProfileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProfileName::Default => "Default",
            ProfileName::East => "East",
            ProfileName::West => "West",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for ProfileName {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(ProfileName::Default),
            "east" | "eu" => Ok(ProfileName::East),
            "west" | "us" | "en" => Ok(ProfileName::West),
            other => Err(format!("unknown sizing profile '{}'", other)),
        }
    }
}

/// Threshold table for a single measurement dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundTable {
    /// `(upper, label)` pairs scanned in order; the first bound strictly
    /// greater than the input wins, anything past the last bound is `XXL`.
    UpperBounds(&'static [(f64, SizeLabel)]),
    /// `(lower, upper, label)` inclusive intervals scanned in order. Intervals
    /// may overlap; the first containing one wins. No match is out of range.
    ClosedIntervals(&'static [(f64, f64, SizeLabel)]),
}

impl BoundTable {
    pub fn lookup(&self, input: f64) -> Classification {
        match self {
            BoundTable::UpperBounds(bounds) => {
                let label = bounds
                    .iter()
                    .find(|(upper, _)| input < *upper)
                    .map(|&(_, label)| label)
                    .unwrap_or(SizeLabel::XXL);
                Classification::Size(label)
            }
            BoundTable::ClosedIntervals(intervals) => intervals
                .iter()
                .find(|(lower, upper, _)| *lower <= input && input <= *upper)
                .map(|&(_, _, label)| Classification::Size(label))
                .unwrap_or(Classification::OutOfRange),
        }
    }

    /// Bounds never decrease from one row to the next.
    pub fn is_monotonic(&self) -> bool {
        match self {
            BoundTable::UpperBounds(bounds) => bounds.windows(2).all(|w| w[0].0 <= w[1].0),
            BoundTable::ClosedIntervals(intervals) => intervals
                .windows(2)
                .all(|w| w[0].0 <= w[1].0 && w[0].1 <= w[1].1)
                && intervals.iter().all(|(lower, upper, _)| lower <= upper),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeProfile {
    pub name: ProfileName,
    pub unit: Unit,
    pub chest: BoundTable,
    pub shoulder: BoundTable,
    pub length: BoundTable,
}

const SHOULDER_CM: &[(f64, SizeLabel)] = &[
    (41.0, SizeLabel::XS),
    (43.0, SizeLabel::S),
    (45.0, SizeLabel::M),
    (47.0, SizeLabel::L),
    (49.0, SizeLabel::XL),
];

const LENGTH_CM: &[(f64, SizeLabel)] = &[
    (64.5, SizeLabel::XS),
    (67.5, SizeLabel::S),
    (70.5, SizeLabel::M),
    (73.0, SizeLabel::L),
    (75.0, SizeLabel::XL),
];

const DEFAULT_CHEST_CM: &[(f64, SizeLabel)] = &[
    (45.5, SizeLabel::XS),
    (48.5, SizeLabel::S),
    (51.5, SizeLabel::M),
    (54.5, SizeLabel::L),
    (57.5, SizeLabel::XL),
];

const EAST_CHEST_CM: &[(f64, f64, SizeLabel)] = &[
    (40.51, 43.56, SizeLabel::XS),
    (42.55, 45.47, SizeLabel::S),
    (44.45, 47.50, SizeLabel::M),
    (46.48, 49.53, SizeLabel::L),
    (48.51, 51.56, SizeLabel::XL),
    (50.80, 53.47, SizeLabel::XXL),
];

const WEST_CHEST_CM: &[(f64, f64, SizeLabel)] = &[
    (40.51, 43.05, SizeLabel::XS),
    (43.05, 45.47, SizeLabel::S),
    (45.47, 48.01, SizeLabel::M),
    (48.01, 50.55, SizeLabel::L),
    (50.55, 53.47, SizeLabel::XL),
    (53.47, 56.52, SizeLabel::XXL),
];

pub static DEFAULT_PROFILE: SizeProfile = SizeProfile {
    name: ProfileName::Default,
    unit: Unit::Centimeters,
    chest: BoundTable::UpperBounds(DEFAULT_CHEST_CM),
    shoulder: BoundTable::UpperBounds(SHOULDER_CM),
    length: BoundTable::UpperBounds(LENGTH_CM),
};

pub static EAST_PROFILE: SizeProfile = SizeProfile {
    name: ProfileName::East,
    unit: Unit::Centimeters,
    chest: BoundTable::ClosedIntervals(EAST_CHEST_CM),
    shoulder: BoundTable::UpperBounds(SHOULDER_CM),
    length: BoundTable::UpperBounds(LENGTH_CM),
};

pub static WEST_PROFILE: SizeProfile = SizeProfile {
    name: ProfileName::West,
    unit: Unit::Centimeters,
    chest: BoundTable::ClosedIntervals(WEST_CHEST_CM),
    shoulder: BoundTable::UpperBounds(SHOULDER_CM),
    length: BoundTable::UpperBounds(LENGTH_CM),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_tables_are_monotonic() {
        for name in ProfileName::ALL {
            let profile = name.profile();
            assert!(profile.chest.is_monotonic(), "{} chest", name);
            assert!(profile.shoulder.is_monotonic(), "{} shoulder", name);
            assert!(profile.length.is_monotonic(), "{} length", name);
        }
    }

    #[test]
    fn test_shoulder_table_is_shared() {
        assert_eq!(EAST_PROFILE.shoulder, DEFAULT_PROFILE.shoulder);
        assert_eq!(WEST_PROFILE.shoulder, DEFAULT_PROFILE.shoulder);
    }

    #[test]
    fn test_upper_bound_lookup_is_strict() {
        let table = DEFAULT_PROFILE.chest;
        assert_eq!(table.lookup(45.49), Classification::Size(SizeLabel::XS));
        assert_eq!(table.lookup(45.5), Classification::Size(SizeLabel::S));
        assert_eq!(table.lookup(57.5), Classification::Size(SizeLabel::XXL));
        assert_eq!(table.lookup(0.0), Classification::Size(SizeLabel::XS));
    }

    #[test]
    fn test_closed_interval_lookup() {
        let table = EAST_PROFILE.chest;
        assert_eq!(table.lookup(40.51), Classification::Size(SizeLabel::XS));
        // Overlap between XS and S resolves to the earlier row.
        assert_eq!(table.lookup(43.0), Classification::Size(SizeLabel::XS));
        assert_eq!(table.lookup(53.47), Classification::Size(SizeLabel::XXL));
        assert_eq!(table.lookup(53.48), Classification::OutOfRange);
        assert_eq!(table.lookup(40.0), Classification::OutOfRange);
    }

    #[test]
    fn test_profile_name_parse() {
        assert_eq!("EU".parse::<ProfileName>(), Ok(ProfileName::East));
        assert_eq!("west".parse::<ProfileName>(), Ok(ProfileName::West));
        assert!("north".parse::<ProfileName>().is_err());
    }
}
