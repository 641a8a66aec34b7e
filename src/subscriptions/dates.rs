use chrono::{Datelike, Duration, NaiveDate};

/// Later of two dates.
pub fn max_date(a: NaiveDate, b: NaiveDate) -> NaiveDate {
    if a > b {
        a
    } else {
        b
    }
}

/// Earlier of two dates.
pub fn min_date(a: NaiveDate, b: NaiveDate) -> NaiveDate {
    if a < b {
        a
    } else {
        b
    }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

/// Last calendar day of the month containing `date`. `None` only at the
/// upper edge of the representable calendar.
pub fn last_of_month(date: NaiveDate) -> Option<NaiveDate> {
    if date.month() == 12 {
        return NaiveDate::from_ymd_opt(date.year(), 12, 31);
    }
    NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)?.pred_opt()
}

/// Number of calendar months touched by the inclusive range `[start, end]`.
///
/// A month counts once any day of it falls inside the range, so
/// `2024-01-31..=2024-02-01` spans two months. Inverted ranges span zero.
pub fn months_spanned(start: NaiveDate, end: NaiveDate) -> i64 {
    if start > end {
        return 0;
    }
    let years = i64::from(end.year() - start.year());
    let months = i64::from(end.month()) - i64::from(start.month());
    years * 12 + months + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn max_and_min_pick_the_right_bound() {
        let early = date(2024, 1, 15);
        let late = date(2024, 3, 1);
        assert_eq!(max_date(early, late), late);
        assert_eq!(max_date(late, early), late);
        assert_eq!(min_date(early, late), early);
        assert_eq!(min_date(late, early), early);
        assert_eq!(max_date(early, early), early);
        assert_eq!(min_date(late, late), late);
    }

    #[test]
    fn month_bounds() {
        assert_eq!(first_of_month(date(2024, 2, 29)), date(2024, 2, 1));
        assert_eq!(first_of_month(date(2024, 2, 1)), date(2024, 2, 1));
        assert_eq!(last_of_month(date(2024, 2, 1)), Some(date(2024, 2, 29)));
        assert_eq!(last_of_month(date(2023, 2, 10)), Some(date(2023, 2, 28)));
        assert_eq!(last_of_month(date(2024, 4, 30)), Some(date(2024, 4, 30)));
        assert_eq!(last_of_month(date(2024, 12, 5)), Some(date(2024, 12, 31)));
    }

    #[test]
    fn month_span_counts_partial_months_in_full() {
        assert_eq!(months_spanned(date(2024, 1, 15), date(2024, 3, 31)), 3);
        assert_eq!(months_spanned(date(2024, 1, 31), date(2024, 2, 1)), 2);
        assert_eq!(months_spanned(date(2024, 2, 10), date(2024, 2, 10)), 1);
        assert_eq!(months_spanned(date(2023, 11, 1), date(2024, 2, 1)), 4);
        assert_eq!(months_spanned(date(2024, 3, 1), date(2024, 2, 28)), 0);
    }
}
