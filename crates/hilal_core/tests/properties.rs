use chrono::{Duration, NaiveDate};
use hilal_core::astronomy::score::{visibility_percent, ScoreInputs};
use hilal_core::prelude::*;
use hilal_core::{apply_exclusivity, normalize_signal_levels, EstimateMetrics, EstimatedCalendarIterator, SignalEntry, VisibilityScoreModel};
use proptest::prelude::*;

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

fn location() -> GeoCoordinate {
    GeoCoordinate::new_unchecked(-6.2088, 106.8456)
}

fn verdict(visible: bool) -> MonthStartEstimate {
    let (lag, alt, age, elong, score) = if visible { (40.0, 7.0, 20.0, 11.0, 0.8) } else { (-5.0, -1.0, 6.0, 2.0, 0.0) };
    MonthStartEstimate::new(
        if visible { Likelihood::High } else { Likelihood::Low },
        EstimateMetrics {
            lag_minutes: Some(lag),
            moon_altitude_deg: Some(alt),
            moon_age_hours: Some(age),
            elongation_deg: Some(elong),
            visibility_score: Some(score),
            ..Default::default()
        },
    )
}

fn signal_level() -> impl Strategy<Value = SignalLevel> {
    prop_oneof![
        Just(SignalLevel::NoChance),
        Just(SignalLevel::VeryLow),
        Just(SignalLevel::Low),
        Just(SignalLevel::Medium),
        Just(SignalLevel::High),
    ]
}

proptest! {
    /// Invariant: civil conversion round-trips inside the supported years.
    #[test]
    fn civil_round_trip(days in 0i64..(365 * 130)) {
        let date = NaiveDate::from_ymd_opt(1940, 1, 1).unwrap() + Duration::days(days);
        let hijri = to_hijri(date, 0).unwrap();
        prop_assert_eq!(hilal_core::to_gregorian(hijri).unwrap(), date);
    }

    /// Invariant: the heuristic score is always within [0, 1] and a new
    /// crescent older than three days is never High.
    #[test]
    fn score_is_bounded(
        alt in -30.0f64..60.0,
        elong in 0.0f64..180.0,
        age in 0.0f64..400.0,
        lag in proptest::option::of(-300.0f64..300.0),
        phase in 0.0f64..1.0,
    ) {
        let model = VisibilityScoreModel::default();
        let inputs = ScoreInputs {
            moon_altitude_deg: alt,
            elongation_deg: elong,
            moon_age_hours: age,
            lag_minutes: lag,
            moon_phase_fraction: phase,
        };
        let (likelihood, score) = model.classify(&inputs);
        prop_assert!((0.0..=1.0).contains(&score));
        prop_assert!(visibility_percent(score) <= 100);
        if age > 72.0 || phase > 0.5 {
            prop_assert_eq!(likelihood, Likelihood::Low);
            prop_assert_eq!(score, 0.0);
        }
        if alt <= 0.0 {
            prop_assert_ne!(likelihood, Likelihood::High);
        }
    }

    /// Invariant: whatever the evenings say, the calendar covers every day,
    /// stays continuous and keeps months within [min_end, 30] days.
    #[test]
    fn calendar_structure_holds(
        sightings in proptest::collection::vec(any::<bool>(), 400),
        min_end in 1usize..=30,
        offset in 0i64..3000,
    ) {
        let start = base() + Duration::days(offset);
        let end = start + Duration::days(sightings.len() as i64 - 1);
        let provider = |date: NaiveDate, _: GeoCoordinate| {
            verdict(sightings[(date - start).num_days() as usize])
        };
        let options = CalendarOptions::default().min_end_of_month_day(min_end);
        let seed = HijriDate::new_unchecked(1441, 5, 1);
        let cal: Vec<_> = EstimatedCalendarIterator::with_seed(start, end, seed, location(), &options, &provider).collect();

        prop_assert_eq!(cal.len(), sightings.len());
        let mut month_len = 1;
        for pair in cal.windows(2) {
            prop_assert_eq!(pair[1].gregorian, pair[0].gregorian + Duration::days(1));
            prop_assert!(pair[0].hijri.is_followed_by(&pair[1].hijri));
            if pair[1].hijri.day == 1 {
                prop_assert!(month_len >= min_end && month_len <= 30, "month of {} days", month_len);
                // A month ends early only on a sighting evening
                if month_len < 30 {
                    prop_assert!(sightings[(pair[0].gregorian - start).num_days() as usize]);
                }
                month_len = 1;
            } else {
                month_len += 1;
            }
        }
        prop_assert!(month_len <= 30);
    }

    /// Invariant: exclusivity is idempotent and leaves at most one confident
    /// level, the first one.
    #[test]
    fn exclusivity_is_idempotent(levels in proptest::collection::vec(signal_level(), 0..8)) {
        let once = normalize_signal_levels(&levels);
        let twice = normalize_signal_levels(&once);
        prop_assert_eq!(&once, &twice);
        prop_assert!(once.iter().filter(|l| l.is_confident()).count() <= 1);
        if let Some(first) = levels.iter().position(|l| l.is_confident()) {
            prop_assert_eq!(once[..=first].to_vec(), levels[..=first].to_vec());
        }
    }

    /// Invariant: entry exclusivity flags exactly the entries it changes.
    #[test]
    fn exclusivity_flags_only_changes(percents in proptest::collection::vec(0u8..=100, 1..6)) {
        let mut entries: Vec<SignalEntry> = percents
            .iter()
            .enumerate()
            .map(|(i, p)| SignalEntry::new(base() + Duration::days(i as i64), *p, Some(10.0)))
            .collect();
        let before = entries.clone();
        apply_exclusivity(entries.iter_mut());
        for (old, new) in before.iter().zip(&entries) {
            prop_assert_eq!(new.normalized_by_previous_day, old != new);
        }
        let mut again = entries.clone();
        apply_exclusivity(again.iter_mut());
        prop_assert_eq!(again, entries);
    }
}
