use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate};
use hilal_core::prelude::*;
use hilal_core::{
    build_calendar_from_config, build_estimated_hijri_calendar_with, estimate_month_start_window_with,
    estimated_gregorian_candidates, find_estimated_gregorian_for_hijri_month_day, EstimateMetrics,
    EstimatedCalendarIterator,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn mecca() -> GeoCoordinate {
    GeoCoordinate::new(21.4225, 39.8262).unwrap()
}

fn sighting(percent: u8) -> MonthStartEstimate {
    MonthStartEstimate::new(
        Likelihood::High,
        EstimateMetrics {
            lag_minutes: Some(45.0),
            moon_altitude_deg: Some(8.0),
            moon_age_hours: Some(26.0),
            elongation_deg: Some(12.5),
            visibility_score: Some(f64::from(percent) / 100.0),
            visibility_percent: Some(percent),
            ..Default::default()
        },
    )
}

fn no_sighting() -> MonthStartEstimate {
    MonthStartEstimate::new(
        Likelihood::Low,
        EstimateMetrics {
            lag_minutes: Some(-12.0),
            moon_altitude_deg: Some(-2.0),
            moon_age_hours: Some(4.0),
            elongation_deg: Some(3.0),
            visibility_score: Some(0.0),
            visibility_percent: Some(0),
            ..Default::default()
        },
    )
}

/// Provider that reports a sighting only on the listed evenings.
fn scripted(evenings: &[NaiveDate]) -> impl Fn(NaiveDate, GeoCoordinate) -> MonthStartEstimate + use<> {
    let set: BTreeSet<NaiveDate> = evenings.iter().copied().collect();
    move |date, _| if set.contains(&date) { sighting(90) } else { no_sighting() }
}

#[test]
fn test_scripted_sightings_drive_month_lengths() {
    // Sha'ban 1446 from 2025-01-31; sightings on the evenings of day 29 and day 30
    let provider = scripted(&[d(2025, 2, 28), d(2025, 3, 30)]);
    let options = CalendarOptions::default();
    let seed = HijriDate::new(1446, 8, 1).unwrap();
    let cal: Vec<_> =
        EstimatedCalendarIterator::with_seed(d(2025, 1, 31), d(2025, 4, 30), seed, mecca(), &options, &provider)
            .collect();

    let ramadan_1 = cal.iter().find(|day| day.hijri == HijriDate::new_unchecked(1446, 9, 1)).unwrap();
    assert_eq!(ramadan_1.gregorian, d(2025, 3, 1));

    // Ramadan evening 29 (Mar 29) has no sighting, evening 30 is forced
    let shawwal_1 = cal.iter().find(|day| day.hijri == HijriDate::new_unchecked(1446, 10, 1)).unwrap();
    assert_eq!(shawwal_1.gregorian, d(2025, 3, 31));
}

#[test]
fn test_calendar_is_continuous() {
    let provider = scripted(&[d(2025, 2, 28), d(2025, 4, 28), d(2025, 6, 26)]);
    let options = CalendarOptions::default();
    let seed = HijriDate::new(1446, 8, 1).unwrap();
    let cal: Vec<_> =
        EstimatedCalendarIterator::with_seed(d(2025, 1, 31), d(2025, 12, 31), seed, mecca(), &options, &provider)
            .collect();

    assert_eq!(cal.len(), (d(2025, 12, 31) - d(2025, 1, 31)).num_days() as usize + 1);
    for pair in cal.windows(2) {
        assert_eq!(pair[1].gregorian, pair[0].gregorian + Duration::days(1));
        assert!(pair[0].hijri.is_followed_by(&pair[1].hijri), "{:?} -> {:?}", pair[0], pair[1]);
        assert!((1..=30).contains(&pair[0].hijri.day));
    }
}

#[test]
fn test_score_threshold_rule_through_options() {
    let weak = |_: NaiveDate, _: GeoCoordinate| sighting(35);
    let seed = HijriDate::new(1446, 8, 1).unwrap();

    let strict = CalendarOptions::default().rule(MonthStartRule::ScoreThreshold).score_threshold(0.4);
    let cal: Vec<_> =
        EstimatedCalendarIterator::with_seed(d(2025, 1, 31), d(2025, 3, 5), seed, mecca(), &strict, &weak).collect();
    assert_eq!(cal[30].hijri, HijriDate::new_unchecked(1446, 9, 1), "35% < 0.4, month runs to 30");

    let lenient = CalendarOptions::default().rule(MonthStartRule::ScoreThreshold).score_threshold(0.3);
    let cal: Vec<_> =
        EstimatedCalendarIterator::with_seed(d(2025, 1, 31), d(2025, 3, 5), seed, mecca(), &lenient, &weak).collect();
    assert_eq!(cal[29].hijri, HijriDate::new_unchecked(1446, 9, 1));
}

#[test]
fn test_empty_and_single_day_ranges() {
    let provider = scripted(&[]);
    let options = CalendarOptions::default();
    let empty = build_estimated_hijri_calendar_with(d(2025, 3, 2), d(2025, 3, 1), mecca(), &options, &provider).unwrap();
    assert!(empty.is_empty());

    let single = build_estimated_hijri_calendar_with(d(2025, 3, 2), d(2025, 3, 2), mecca(), &options, &provider).unwrap();
    assert_eq!(single.len(), 1);
    assert_eq!(single[0].hijri, to_hijri(d(2025, 3, 2), 0).unwrap());
}

#[test]
fn test_lookups_over_built_calendar() {
    let provider = scripted(&[d(2025, 2, 28), d(2025, 3, 30)]);
    let options = CalendarOptions::default();
    let seed = HijriDate::new(1446, 8, 1).unwrap();
    let cal: Vec<_> =
        EstimatedCalendarIterator::with_seed(d(2025, 1, 31), d(2025, 4, 30), seed, mecca(), &options, &provider)
            .collect();

    let eid = find_estimated_gregorian_for_hijri_month_day(&cal, 10, 1, d(2025, 3, 15)).unwrap();
    assert_eq!(eid.gregorian, d(2025, 3, 31));
    assert_eq!(estimated_gregorian_candidates(&cal, HijriDate::new_unchecked(1446, 9, 15)).len(), 1);
    assert!(estimated_gregorian_candidates(&cal, HijriDate::new_unchecked(1447, 1, 1)).is_empty());
}

#[test]
fn test_month_start_window_signals() {
    // Civil 1 Ramadan 1446 is 2025-03-01; the window covers Feb 27 .. Mar 2
    let provider = |date: NaiveDate, _: GeoCoordinate| match date.day() {
        27 => no_sighting(),
        28 => sighting(70),
        _ => sighting(90),
    };
    let window = estimate_month_start_window_with(1446, 9, mecca(), &provider).unwrap();
    assert_eq!(window.len(), 4);
    assert_eq!(window[0].evening, d(2025, 2, 27));

    let levels: Vec<_> = window.iter().map(|e| e.signal.level).collect();
    assert_eq!(levels, vec![SignalLevel::NoChance, SignalLevel::High, SignalLevel::NoChance, SignalLevel::NoChance]);
    assert!(!window[1].signal.normalized_by_previous_day);
    assert!(window[2].signal.normalized_by_previous_day);
    assert_eq!(window[3].signal.percent, 0);
}

#[test]
fn test_config_without_location_cannot_build() {
    let config = HilalConfig::default();
    let err = build_calendar_from_config(&config, d(2025, 3, 1), d(2025, 3, 2)).unwrap_err();
    assert!(matches!(err, HilalError::InvalidConfiguration { .. }));
}

#[test]
fn test_config_round_trip_through_json() -> anyhow::Result<()> {
    let config = HilalConfig::new()
        .with_location(mecca())
        .with_calendar(CalendarOptions::default().method(EstimationMethod::Odeh).min_end_of_month_day(30))
        .with_warm_up_days(45);
    let json = serde_json::to_string(&config)?;
    assert!(json.contains("\"warmUpDays\":45"));
    assert!(json.contains("\"minEndOfMonthDay\":30"));
    let back = HilalConfig::from_json_str(&json)?;
    assert_eq!(back, config);
    Ok(())
}

#[test]
fn test_civil_seed_through_extension() -> anyhow::Result<()> {
    let hijri = d(2025, 3, 1).civil_hijri()?;
    assert_eq!((hijri.year, hijri.month, hijri.day), (1446, 9, 1));
    assert_eq!(hijri.month_name(), "Ramadhan");
    Ok(())
}
