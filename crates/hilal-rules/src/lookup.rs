//! Gregorian lookups in a built calendar.

use chrono::NaiveDate;
use hilal_types::{EstimatedHijriDay, HijriDate};
use smallvec::SmallVec;

/// Every day in `calendar` carrying `hijri`. A calendar spans far less than
/// a Hijri year per match, so two slots cover the realistic cases.
pub fn estimated_gregorian_candidates(calendar: &[EstimatedHijriDay], hijri: HijriDate) -> SmallVec<[EstimatedHijriDay; 2]> {
    calendar.iter().filter(|day| day.hijri == hijri).copied().collect()
}

fn nearest<'a, I>(days: I, target: NaiveDate) -> Option<EstimatedHijriDay>
where
    I: Iterator<Item = &'a EstimatedHijriDay>,
{
    days.min_by_key(|day| ((day.gregorian - target).num_days().abs(), day.gregorian))
        .copied()
}

/// The day carrying `hijri` closest to `target`; ties go to the earlier date.
pub fn find_estimated_gregorian_for_hijri_date(
    calendar: &[EstimatedHijriDay],
    hijri: HijriDate,
    target: NaiveDate,
) -> Option<EstimatedHijriDay> {
    nearest(calendar.iter().filter(|day| day.hijri == hijri), target)
}

/// The day with Hijri `month`/`day` (any year) closest to `target`.
pub fn find_estimated_gregorian_for_hijri_month_day(
    calendar: &[EstimatedHijriDay],
    month: usize,
    day: usize,
    target: NaiveDate,
) -> Option<EstimatedHijriDay> {
    nearest(calendar.iter().filter(|d| d.hijri.month == month && d.hijri.day == day), target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(g: (i32, u32, u32), h: (usize, usize, usize)) -> EstimatedHijriDay {
        EstimatedHijriDay::new(
            NaiveDate::from_ymd_opt(g.0, g.1, g.2).unwrap(),
            HijriDate::new_unchecked(h.0, h.1, h.2),
        )
    }

    fn sample() -> Vec<EstimatedHijriDay> {
        vec![
            day((2024, 3, 11), (1445, 9, 1)),
            day((2024, 3, 12), (1445, 9, 2)),
            day((2025, 3, 1), (1446, 9, 1)),
            day((2025, 3, 2), (1446, 9, 2)),
        ]
    }

    #[test]
    fn test_exact_date_lookup() {
        let cal = sample();
        let target = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let hit = find_estimated_gregorian_for_hijri_date(&cal, HijriDate::new_unchecked(1446, 9, 1), target).unwrap();
        assert_eq!(hit.gregorian, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert!(find_estimated_gregorian_for_hijri_date(&cal, HijriDate::new_unchecked(1447, 9, 1), target).is_none());
    }

    #[test]
    fn test_month_day_lookup_picks_nearest() {
        let cal = sample();
        let near_2025 = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let hit = find_estimated_gregorian_for_hijri_month_day(&cal, 9, 1, near_2025).unwrap();
        assert_eq!(hit.hijri.year, 1446);

        let near_2024 = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let hit = find_estimated_gregorian_for_hijri_month_day(&cal, 9, 1, near_2024).unwrap();
        assert_eq!(hit.hijri.year, 1445);
    }

    #[test]
    fn test_tie_goes_to_earlier_date() {
        let cal = vec![day((2025, 3, 1), (1446, 9, 1)), day((2025, 3, 5), (1446, 9, 1))];
        let mid = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let hit = find_estimated_gregorian_for_hijri_date(&cal, HijriDate::new_unchecked(1446, 9, 1), mid).unwrap();
        assert_eq!(hit.gregorian, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(estimated_gregorian_candidates(&cal, HijriDate::new_unchecked(1446, 9, 1)).len(), 2);
    }
}
