//! Level calculator over entry polarities.
//!
//! # Responsibility
//! - Count positive/negative entries and derive the weighted level.
//!
//! # Invariants
//! - `0.0 <= level <= 100.0` and `percentage == level` for any input.
//! - The empty snapshot yields the neutral baseline `50.0`.
//! - Items with an unknown polarity count toward `total` only. This mirrors
//!   historical behavior for rows that slipped past validation and is kept
//!   on purpose; `total` may therefore exceed `positive + negative`.

use crate::model::entry::{ResonanceEntry, ResonanceKind};
use serde::{Deserialize, Serialize};

/// Score added per positive entry.
pub const POSITIVE_WEIGHT: f64 = 0.5;
/// Score removed per negative entry.
pub const NEGATIVE_WEIGHT: f64 = 0.3;
/// Neutral level for an empty or balanced journal.
pub const BASELINE_LEVEL: f64 = 50.0;
/// Largest distance the modifier may move the level from baseline.
pub const MAX_MODIFIER: f64 = 50.0;

const RAW_SCORE_SCALE: f64 = 2.0;
const MIN_LEVEL: f64 = 0.0;
const MAX_LEVEL: f64 = 100.0;

/// Anything the calculator can read a polarity from.
///
/// `None` means the polarity is unknown.
pub trait Polarized {
    fn polarity(&self) -> Option<ResonanceKind>;
}

impl Polarized for ResonanceKind {
    fn polarity(&self) -> Option<ResonanceKind> {
        Some(*self)
    }
}

impl Polarized for Option<ResonanceKind> {
    fn polarity(&self) -> Option<ResonanceKind> {
        *self
    }
}

impl Polarized for ResonanceEntry {
    fn polarity(&self) -> Option<ResonanceKind> {
        Some(self.kind)
    }
}

impl<T: Polarized + ?Sized> Polarized for &T {
    fn polarity(&self) -> Option<ResonanceKind> {
        (**self).polarity()
    }
}

/// Derived aggregate state of the whole journal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResonanceLevel {
    /// Bounded score in `[0, 100]`, rounded to one decimal.
    pub level: f64,
    pub total: u64,
    pub positive: u64,
    pub negative: u64,
    /// Same value as `level`, kept separate for progress displays.
    pub percentage: f64,
}

impl ResonanceLevel {
    /// Number of items that were neither positive nor negative.
    pub fn unknown(&self) -> u64 {
        self.total
            .saturating_sub(self.positive)
            .saturating_sub(self.negative)
    }
}

/// Computes the resonance level from a snapshot of entries.
///
/// Order does not matter and duplicates are counted independently.
pub fn calculate_level<I>(entries: I) -> ResonanceLevel
where
    I: IntoIterator,
    I::Item: Polarized,
{
    let mut total = 0_u64;
    let mut positive = 0_u64;
    let mut negative = 0_u64;

    for entry in entries {
        total += 1;
        match entry.polarity() {
            Some(ResonanceKind::Positive) => positive += 1,
            Some(ResonanceKind::Negative) => negative += 1,
            None => {}
        }
    }

    let level = round_one_decimal(level_from_counts(positive, negative));
    ResonanceLevel {
        level,
        total,
        positive,
        negative,
        percentage: level,
    }
}

/// Unrounded level for the given counts.
pub fn level_from_counts(positive: u64, negative: u64) -> f64 {
    let raw_score = raw_score(positive, negative);
    let modifier = (raw_score * RAW_SCORE_SCALE).clamp(-MAX_MODIFIER, MAX_MODIFIER);
    (BASELINE_LEVEL + modifier).clamp(MIN_LEVEL, MAX_LEVEL)
}

/// Unbounded weighted sum before any clamping.
pub fn raw_score(positive: u64, negative: u64) -> f64 {
    positive as f64 * POSITIVE_WEIGHT - negative as f64 * NEGATIVE_WEIGHT
}

// Half-up; callers only pass non-negative values, where `f64::round`
// (half away from zero) agrees.
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::{calculate_level, raw_score, round_one_decimal, ResonanceLevel};
    use crate::model::entry::ResonanceKind;

    #[test]
    fn empty_snapshot_is_neutral() {
        let level = calculate_level(Vec::<ResonanceKind>::new());
        assert_eq!(level.level, 50.0);
        assert_eq!(level.percentage, 50.0);
        assert_eq!(level.total, 0);
        assert_eq!(level.unknown(), 0);
    }

    #[test]
    fn unknown_polarity_counts_toward_total_only() {
        let snapshot = [
            Some(ResonanceKind::Positive),
            None,
            Some(ResonanceKind::Negative),
            None,
        ];
        let level = calculate_level(snapshot);
        assert_eq!(level.total, 4);
        assert_eq!(level.positive, 1);
        assert_eq!(level.negative, 1);
        assert_eq!(level.unknown(), 2);
        assert_eq!(level.level, 50.4);
    }

    #[test]
    fn unknown_saturates_on_inconsistent_counts() {
        let level: ResonanceLevel = serde_json::from_str(
            r#"{"level":50.0,"total":1,"positive":3,"negative":2,"percentage":50.0}"#,
        )
        .unwrap();
        assert_eq!(level.unknown(), 0);
    }

    #[test]
    fn raw_score_weights_are_asymmetric() {
        assert_eq!(raw_score(1, 0), 0.5);
        assert!((raw_score(0, 1) + 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn rounding_is_half_up_at_one_decimal() {
        assert_eq!(round_one_decimal(43.999_999_999_999_99), 44.0);
        assert_eq!(round_one_decimal(50.25), 50.3);
        assert_eq!(round_one_decimal(0.0), 0.0);
    }
}
