//! Calendar arithmetic for payroll periods. Weekends are Saturday and
//! Sunday; no public-holiday calendar is modeled.

use chrono::{Datelike, NaiveDate, Weekday};

pub fn is_working_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// First and last day of a month, or `None` for an invalid month number.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next_month_first.pred_opt()?))
}

/// Inclusive working-day count between two dates. Returns 0 when
/// `start > end`.
pub fn count_working_days_in_range(start: NaiveDate, end: NaiveDate) -> u32 {
    let mut days = 0;
    let mut day = start;
    while day <= end {
        if is_working_day(day) {
            days += 1;
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    days
}

/// Calendar days of the month minus Saturdays and Sundays.
pub fn working_days_in_month(year: i32, month: u32) -> Option<u32> {
    let (first, last) = month_bounds(year, month)?;
    Some(count_working_days_in_range(first, last))
}

/// Intersects an arbitrary inclusive date range with month bounds.
/// `None` means no overlap.
pub fn clamp_to_month(
    start: NaiveDate,
    end: NaiveDate,
    month_start: NaiveDate,
    month_end: NaiveDate,
) -> Option<(NaiveDate, NaiveDate)> {
    let clamped_start = start.max(month_start);
    let clamped_end = end.min(month_end);
    (clamped_start <= clamped_end).then_some((clamped_start, clamped_end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn february_2024_has_21_working_days() {
        // Leap year, 29 days, starts on a Thursday: 8 weekend days.
        assert_eq!(working_days_in_month(2024, 2), Some(21));
    }

    #[test]
    fn june_2024_has_20_working_days() {
        assert_eq!(working_days_in_month(2024, 6), Some(20));
    }

    #[test]
    fn invalid_month_yields_none() {
        assert_eq!(working_days_in_month(2024, 13), None);
        assert_eq!(month_bounds(2024, 0), None);
    }

    #[test]
    fn month_bounds_cover_december_rollover() {
        assert_eq!(
            month_bounds(2023, 12),
            Some((date(2023, 12, 1), date(2023, 12, 31)))
        );
    }

    #[test]
    fn range_count_is_zero_for_inverted_range() {
        assert_eq!(count_working_days_in_range(date(2024, 1, 10), date(2024, 1, 5)), 0);
    }

    #[test]
    fn range_count_skips_weekends() {
        // Mon Jan 1 2024 .. Sun Jan 7 2024 -> Mon-Fri
        assert_eq!(count_working_days_in_range(date(2024, 1, 1), date(2024, 1, 7)), 5);
    }

    #[test]
    fn clamp_keeps_contained_range() {
        let (month_start, month_end) = month_bounds(2024, 1).unwrap();
        assert_eq!(
            clamp_to_month(date(2024, 1, 10), date(2024, 1, 12), month_start, month_end),
            Some((date(2024, 1, 10), date(2024, 1, 12)))
        );
    }

    #[test]
    fn clamp_rejects_disjoint_range() {
        let (month_start, month_end) = month_bounds(2024, 1).unwrap();
        assert_eq!(
            clamp_to_month(date(2024, 3, 1), date(2024, 3, 5), month_start, month_end),
            None
        );
    }

    #[test]
    fn straddling_leave_splits_cleanly_across_months() {
        // Jan 28 - Feb 3 2024: the January and February clamps must be
        // disjoint and together cover the whole span's working days.
        let span_start = date(2024, 1, 28);
        let span_end = date(2024, 2, 3);

        let (jan_start, jan_end) = month_bounds(2024, 1).unwrap();
        let (feb_start, feb_end) = month_bounds(2024, 2).unwrap();

        let jan_clamp = clamp_to_month(span_start, span_end, jan_start, jan_end).unwrap();
        let feb_clamp = clamp_to_month(span_start, span_end, feb_start, feb_end).unwrap();

        assert_eq!(jan_clamp, (date(2024, 1, 28), date(2024, 1, 31)));
        assert_eq!(feb_clamp, (date(2024, 2, 1), date(2024, 2, 3)));
        assert!(jan_clamp.1 < feb_clamp.0);

        let total = count_working_days_in_range(span_start, span_end);
        let jan_days = count_working_days_in_range(jan_clamp.0, jan_clamp.1);
        let feb_days = count_working_days_in_range(feb_clamp.0, feb_clamp.1);
        assert_eq!(jan_days + feb_days, total);
    }
}
