//! Presentation tables for a resonance level.
//!
//! # Responsibility
//! - Describe display bands, progress tones and encouragement messages as
//!   ordered `(min_level, value)` tables.
//!
//! # Invariants
//! - Tables are sorted by descending `min_level` and evaluated top-down.
//! - Lower edges are inclusive: exactly `70.0` belongs to the `>= 70` row.
//! - The last row of every table is a catch-all, so any level (including
//!   out-of-range or NaN input) resolves to exactly one row.

use super::calculator::ResonanceLevel;
use serde::Serialize;

/// One labeled level band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelBand {
    /// Inclusive lower edge.
    pub min_level: f64,
    pub label: &'static str,
    /// Color family used by displays for the band badge.
    pub accent: &'static str,
}

pub static LEVEL_BANDS: [LevelBand; 8] = [
    LevelBand {
        min_level: 90.0,
        label: "Christ-like Awareness",
        accent: "yellow",
    },
    LevelBand {
        min_level: 80.0,
        label: "Tesla-level Genius",
        accent: "purple",
    },
    LevelBand {
        min_level: 70.0,
        label: "High Resonance",
        accent: "blue",
    },
    LevelBand {
        min_level: 60.0,
        label: "Rising Awareness",
        accent: "green",
    },
    LevelBand {
        min_level: 50.0,
        label: "Balanced State",
        accent: "gray",
    },
    LevelBand {
        min_level: 40.0,
        label: "Seeking Balance",
        accent: "orange",
    },
    LevelBand {
        min_level: 30.0,
        label: "Lower Vibration",
        accent: "red",
    },
    LevelBand {
        min_level: 0.0,
        label: "Shadow Work Needed",
        accent: "deep-red",
    },
];

/// Progress bar styling bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressTone {
    Ascendant,
    Rising,
    Neutral,
    Warming,
    Shadow,
}

pub const PROGRESS_TONES: [(f64, ProgressTone); 5] = [
    (70.0, ProgressTone::Ascendant),
    (60.0, ProgressTone::Rising),
    (50.0, ProgressTone::Neutral),
    (40.0, ProgressTone::Warming),
    (0.0, ProgressTone::Shadow),
];

pub const ENCOURAGEMENTS: [(f64, &str); 3] = [
    (70.0, "You're radiating high-frequency energy"),
    (50.0, "Every positive thought raises your vibration"),
    (0.0, "Shadow work leads to light - keep going"),
];

/// Returns the band containing `level`.
pub fn band_for_level(level: f64) -> &'static LevelBand {
    LEVEL_BANDS
        .iter()
        .find(|band| level >= band.min_level)
        .unwrap_or(&LEVEL_BANDS[LEVEL_BANDS.len() - 1])
}

/// Returns the progress tone for `level`.
pub fn tone_for_level(level: f64) -> ProgressTone {
    lookup(&PROGRESS_TONES, level)
}

/// Returns the encouragement line for `level`.
pub fn encouragement_for_level(level: f64) -> &'static str {
    lookup(&ENCOURAGEMENTS, level)
}

fn lookup<T: Copy, const N: usize>(table: &[(f64, T); N], level: f64) -> T {
    table
        .iter()
        .find(|(min_level, _)| level >= *min_level)
        .unwrap_or(&table[N - 1])
        .1
}

/// A level together with everything a display needs to render it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelSummary {
    #[serde(flatten)]
    pub level: ResonanceLevel,
    pub band: &'static LevelBand,
    pub tone: ProgressTone,
    pub message: &'static str,
}

impl LevelSummary {
    pub fn from_level(level: ResonanceLevel) -> Self {
        Self {
            band: band_for_level(level.level),
            tone: tone_for_level(level.level),
            message: encouragement_for_level(level.level),
            level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_sorted_descending_with_zero_floor() {
        assert!(LEVEL_BANDS
            .windows(2)
            .all(|pair| pair[0].min_level > pair[1].min_level));
        assert_eq!(LEVEL_BANDS[LEVEL_BANDS.len() - 1].min_level, 0.0);
        assert!(PROGRESS_TONES.windows(2).all(|pair| pair[0].0 > pair[1].0));
        assert!(ENCOURAGEMENTS.windows(2).all(|pair| pair[0].0 > pair[1].0));
    }

    #[test]
    fn every_tenth_of_a_level_matches_exactly_one_band() {
        for tenths in 0..=1000 {
            let level = f64::from(tenths) / 10.0;
            let matching = LEVEL_BANDS
                .iter()
                .enumerate()
                .filter(|(index, band)| {
                    let upper = index
                        .checked_sub(1)
                        .map(|above| LEVEL_BANDS[above].min_level)
                        .unwrap_or(f64::INFINITY);
                    level >= band.min_level && level < upper
                })
                .count();
            assert_eq!(matching, 1, "level {level} matched {matching} bands");
            assert!(std::ptr::eq(
                band_for_level(level),
                LEVEL_BANDS
                    .iter()
                    .find(|band| level >= band.min_level)
                    .unwrap()
            ));
        }
    }

    #[test]
    fn out_of_range_levels_fall_back_to_edge_rows() {
        assert_eq!(band_for_level(-5.0).label, "Shadow Work Needed");
        assert_eq!(band_for_level(f64::NAN).label, "Shadow Work Needed");
        assert_eq!(band_for_level(150.0).label, "Christ-like Awareness");
        assert_eq!(tone_for_level(f64::NAN), ProgressTone::Shadow);
    }

    #[test]
    fn tone_and_message_follow_their_tables() {
        assert_eq!(tone_for_level(70.0), ProgressTone::Ascendant);
        assert_eq!(tone_for_level(65.0), ProgressTone::Rising);
        assert_eq!(tone_for_level(50.0), ProgressTone::Neutral);
        assert_eq!(tone_for_level(49.9), ProgressTone::Warming);
        assert_eq!(tone_for_level(12.0), ProgressTone::Shadow);

        assert_eq!(
            encouragement_for_level(50.0),
            "Every positive thought raises your vibration"
        );
        assert_eq!(
            encouragement_for_level(49.9),
            "Shadow work leads to light - keep going"
        );
    }
}
