//! Display signal levels and the exclusivity rule.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{SIGNAL_LOW_MAX, SIGNAL_MEDIUM_MAX, SIGNAL_NO_CHANCE_MAX, SIGNAL_VERY_LOW_MAX};

/// Discrete chance of a sighting, ordered from none to high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignalLevel {
    NoChance,
    VeryLow,
    Low,
    Medium,
    High,
}

impl SignalLevel {
    /// Band for a 0-100 visibility percentage.
    pub fn from_percent(percent: u8) -> Self {
        match percent {
            p if p <= SIGNAL_NO_CHANCE_MAX => Self::NoChance,
            p if p <= SIGNAL_VERY_LOW_MAX => Self::VeryLow,
            p if p <= SIGNAL_LOW_MAX => Self::Low,
            p if p <= SIGNAL_MEDIUM_MAX => Self::Medium,
            _ => Self::High,
        }
    }

    /// Medium or High: strong enough to be the declared month start.
    pub fn is_confident(&self) -> bool {
        matches!(self, Self::Medium | Self::High)
    }
}

impl fmt::Display for SignalLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NoChance => "noChance",
            Self::VeryLow => "veryLow",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.write_str(s)
    }
}

/// Level for an evening. A moon setting at or before sunset has no chance
/// whatever the percentage says.
pub fn classify_signal(percent: u8, lag_minutes: Option<f64>) -> SignalLevel {
    match lag_minutes {
        Some(lag) if lag <= 0.0 => SignalLevel::NoChance,
        _ => SignalLevel::from_percent(percent),
    }
}

/// One evening's signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalEntry {
    pub date: NaiveDate,
    pub level: SignalLevel,
    pub percent: u8,
    /// Downgraded because an earlier evening was already confident.
    pub normalized_by_previous_day: bool,
}

impl SignalEntry {
    pub fn new(date: NaiveDate, percent: u8, lag_minutes: Option<f64>) -> Self {
        Self { date, level: classify_signal(percent, lag_minutes), percent, normalized_by_previous_day: false }
    }
}

/// Forces every entry after the first confident one to `NoChance` with 0%.
/// Only entries that actually change are flagged.
pub fn apply_exclusivity<'a, I>(entries: I)
where
    I: IntoIterator<Item = &'a mut SignalEntry>,
{
    let mut seen_confident = false;
    for entry in entries {
        if seen_confident {
            if entry.level != SignalLevel::NoChance || entry.percent != 0 {
                entry.level = SignalLevel::NoChance;
                entry.percent = 0;
                entry.normalized_by_previous_day = true;
            }
        } else if entry.level.is_confident() {
            seen_confident = true;
        }
    }
}

/// Exclusivity over bare levels.
pub fn normalize_signal_levels(levels: &[SignalLevel]) -> Vec<SignalLevel> {
    let mut seen_confident = false;
    levels
        .iter()
        .map(|&level| {
            if seen_confident {
                SignalLevel::NoChance
            } else {
                seen_confident = level.is_confident();
                level
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use SignalLevel::*;

    #[test]
    fn test_bands() {
        assert_eq!(SignalLevel::from_percent(0), NoChance);
        assert_eq!(SignalLevel::from_percent(1), VeryLow);
        assert_eq!(SignalLevel::from_percent(10), VeryLow);
        assert_eq!(SignalLevel::from_percent(11), Low);
        assert_eq!(SignalLevel::from_percent(35), Low);
        assert_eq!(SignalLevel::from_percent(36), Medium);
        assert_eq!(SignalLevel::from_percent(65), Medium);
        assert_eq!(SignalLevel::from_percent(66), High);
        assert_eq!(SignalLevel::from_percent(100), High);
    }

    #[test]
    fn test_non_positive_lag_is_no_chance() {
        assert_eq!(classify_signal(95, Some(0.0)), NoChance);
        assert_eq!(classify_signal(95, Some(-4.0)), NoChance);
        assert_eq!(classify_signal(95, Some(0.5)), High);
        assert_eq!(classify_signal(50, None), Medium);
    }

    #[test]
    fn test_exclusivity_levels() {
        assert_eq!(normalize_signal_levels(&[Low, Medium, High, Medium]), vec![Low, Medium, NoChance, NoChance]);
        assert_eq!(normalize_signal_levels(&[Low, VeryLow]), vec![Low, VeryLow]);
        assert!(normalize_signal_levels(&[]).is_empty());
    }

    #[test]
    fn test_exclusivity_entries_flag_only_changes() {
        let d = |day| NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
        let mut entries = vec![
            SignalEntry::new(d(1), 20, Some(10.0)),
            SignalEntry::new(d(2), 60, Some(40.0)),
            SignalEntry::new(d(3), 0, Some(60.0)),
            SignalEntry::new(d(4), 90, Some(70.0)),
        ];
        apply_exclusivity(entries.iter_mut());

        assert_eq!(entries[1].level, Medium);
        assert!(!entries[1].normalized_by_previous_day);
        assert_eq!(entries[2].level, NoChance);
        assert!(!entries[2].normalized_by_previous_day);
        assert_eq!(entries[3].level, NoChance);
        assert_eq!(entries[3].percent, 0);
        assert!(entries[3].normalized_by_previous_day);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&NoChance).unwrap(), "\"noChance\"");
        assert_eq!(VeryLow.to_string(), "veryLow");
    }

    proptest::proptest! {
        #[test]
        fn level_is_monotonic_in_percent(a in 0u8..=100, b in 0u8..=100) {
            let (lo, hi) = (a.min(b), a.max(b));
            proptest::prop_assert!(SignalLevel::from_percent(lo) <= SignalLevel::from_percent(hi));
        }

        #[test]
        fn positive_lag_keeps_percent_band(p in 0u8..=100, lag in 0.01f64..240.0) {
            proptest::prop_assert_eq!(classify_signal(p, Some(lag)), SignalLevel::from_percent(p));
        }
    }
}
