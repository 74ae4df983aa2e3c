//! Date interval utilities
//!
//! This module provides the closed-open [`DateRange`] interval used to reason
//! about period durations, month bucketing, and interval differences. All
//! ranges are half-open: the lower bound is included, the upper bound is not.

use chrono::{Datelike, Days, Local, NaiveDate};
use smallvec::SmallVec;

/// Returns the first day of the month that follows the month of `date`
#[must_use]
pub fn first_day_of_next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).expect("first of month is always a valid date")
}

/// A closed-open range of dates: `[lower_bound_inclusive, upper_bound_exclusive)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    /// First date inside the range
    pub lower_bound_inclusive: NaiveDate,
    /// First date after the range
    pub upper_bound_exclusive: NaiveDate,
}

impl DateRange {
    /// Create a new range from explicit bounds
    #[must_use]
    pub fn new(lower_bound_inclusive: NaiveDate, upper_bound_exclusive: NaiveDate) -> Self {
        Self {
            lower_bound_inclusive,
            upper_bound_exclusive,
        }
    }

    /// The range covering every day of the given month
    #[must_use]
    pub fn for_month(year: i32, month: u32) -> Self {
        let lower = NaiveDate::from_ymd_opt(year, month, 1)
            .expect("first of month is always a valid date");
        Self::new(lower, first_day_of_next_month(lower))
    }

    /// Build a range from a start date and an optional end date.
    ///
    /// A missing end date closes the range at tomorrow, so that an open
    /// period counts as covering today.
    #[must_use]
    pub fn from_maybe_open_range(start: NaiveDate, end: Option<NaiveDate>) -> Self {
        let upper = end.unwrap_or_else(|| {
            Local::now()
                .date_naive()
                .checked_add_days(Days::new(1))
                .expect("tomorrow is representable")
        });
        Self::new(start, upper)
    }

    /// Whether the range contains no days at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.upper_bound_exclusive <= self.lower_bound_inclusive
    }

    /// Whether the given date falls inside the range
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.lower_bound_inclusive <= date && date < self.upper_bound_exclusive
    }

    /// Every (year, month) pair this range overlaps for at least one day
    #[must_use]
    pub fn months_overlapping(&self) -> Vec<(i32, u32)> {
        let mut months = Vec::new();
        let mut cursor = self.lower_bound_inclusive;
        while cursor < self.upper_bound_exclusive {
            months.push((cursor.year(), cursor.month()));
            cursor = first_day_of_next_month(cursor);
        }
        months
    }

    /// The sub-range of this range falling within the given month, if any
    #[must_use]
    pub fn portion_overlapping_with_month(&self, year: i32, month: u32) -> Option<DateRange> {
        DateRangeDiff::new(*self, Self::for_month(year, month)).overlapping_range()
    }
}

/// The overlap and differences between two date ranges
#[derive(Debug, Clone, Copy)]
pub struct DateRangeDiff {
    /// First range being compared
    pub range_1: DateRange,
    /// Second range being compared
    pub range_2: DateRange,
}

impl DateRangeDiff {
    /// Pair up two ranges for comparison
    #[must_use]
    pub fn new(range_1: DateRange, range_2: DateRange) -> Self {
        Self { range_1, range_2 }
    }

    /// The range covered by both ranges, if they share any day
    #[must_use]
    pub fn overlapping_range(&self) -> Option<DateRange> {
        if self.range_1.is_empty() || self.range_2.is_empty() {
            return None;
        }
        let lower = self
            .range_1
            .lower_bound_inclusive
            .max(self.range_2.lower_bound_inclusive);
        let upper = self
            .range_1
            .upper_bound_exclusive
            .min(self.range_2.upper_bound_exclusive);
        if lower < upper {
            Some(DateRange::new(lower, upper))
        } else {
            None
        }
    }

    /// The parts of `range_1` not covered by `range_2`
    #[must_use]
    pub fn range_1_non_overlapping_parts(&self) -> SmallVec<[DateRange; 2]> {
        Self::non_overlapping_parts(self.range_1, self.overlapping_range())
    }

    /// The parts of `range_2` not covered by `range_1`
    #[must_use]
    pub fn range_2_non_overlapping_parts(&self) -> SmallVec<[DateRange; 2]> {
        Self::non_overlapping_parts(self.range_2, self.overlapping_range())
    }

    fn non_overlapping_parts(
        range: DateRange,
        overlap: Option<DateRange>,
    ) -> SmallVec<[DateRange; 2]> {
        let mut parts = SmallVec::new();
        if range.is_empty() {
            return parts;
        }
        let Some(overlap) = overlap else {
            parts.push(range);
            return parts;
        };
        if range.lower_bound_inclusive < overlap.lower_bound_inclusive {
            parts.push(DateRange::new(
                range.lower_bound_inclusive,
                overlap.lower_bound_inclusive,
            ));
        }
        if overlap.upper_bound_exclusive < range.upper_bound_exclusive {
            parts.push(DateRange::new(
                overlap.upper_bound_exclusive,
                range.upper_bound_exclusive,
            ));
        }
        parts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_for_month() {
        let range = DateRange::for_month(2019, 12);
        assert_eq!(range.lower_bound_inclusive, ymd(2019, 12, 1));
        assert_eq!(range.upper_bound_exclusive, ymd(2020, 1, 1));
        assert!(range.contains_date(ymd(2019, 12, 31)));
        assert!(!range.contains_date(ymd(2020, 1, 1)));
    }

    #[test]
    fn test_zero_day_range_is_empty() {
        let range = DateRange::new(ymd(2019, 3, 5), ymd(2019, 3, 5));
        assert!(range.is_empty());
        assert!(range.months_overlapping().is_empty());
        assert!(!range.contains_date(ymd(2019, 3, 5)));
    }

    #[test]
    fn test_months_overlapping_spans_year_boundary() {
        let range = DateRange::new(ymd(2019, 11, 14), ymd(2020, 2, 3));
        assert_eq!(
            range.months_overlapping(),
            vec![(2019, 11), (2019, 12), (2020, 1), (2020, 2)]
        );
    }

    #[test]
    fn test_portion_overlapping_with_month() {
        let range = DateRange::new(ymd(2019, 11, 14), ymd(2020, 1, 10));
        assert_eq!(
            range.portion_overlapping_with_month(2019, 11),
            Some(DateRange::new(ymd(2019, 11, 14), ymd(2019, 12, 1)))
        );
        assert_eq!(
            range.portion_overlapping_with_month(2019, 12),
            Some(DateRange::for_month(2019, 12))
        );
        assert_eq!(range.portion_overlapping_with_month(2020, 2), None);
    }

    #[test]
    fn test_diff_overlapping_range() {
        let diff = DateRangeDiff::new(
            DateRange::new(ymd(2019, 1, 1), ymd(2019, 6, 1)),
            DateRange::new(ymd(2019, 3, 1), ymd(2019, 9, 1)),
        );
        assert_eq!(
            diff.overlapping_range(),
            Some(DateRange::new(ymd(2019, 3, 1), ymd(2019, 6, 1)))
        );
        assert_eq!(
            diff.range_1_non_overlapping_parts().as_slice(),
            &[DateRange::new(ymd(2019, 1, 1), ymd(2019, 3, 1))]
        );
        assert_eq!(
            diff.range_2_non_overlapping_parts().as_slice(),
            &[DateRange::new(ymd(2019, 6, 1), ymd(2019, 9, 1))]
        );
    }

    #[test]
    fn test_diff_no_overlap_keeps_whole_ranges() {
        let diff = DateRangeDiff::new(
            DateRange::new(ymd(2019, 1, 1), ymd(2019, 2, 1)),
            DateRange::new(ymd(2019, 5, 1), ymd(2019, 6, 1)),
        );
        assert_eq!(diff.overlapping_range(), None);
        assert_eq!(
            diff.range_2_non_overlapping_parts().as_slice(),
            &[DateRange::new(ymd(2019, 5, 1), ymd(2019, 6, 1))]
        );
    }

    #[test]
    fn test_diff_contained_range_splits_container() {
        let diff = DateRangeDiff::new(
            DateRange::new(ymd(2019, 3, 1), ymd(2019, 4, 1)),
            DateRange::new(ymd(2019, 1, 1), ymd(2019, 12, 1)),
        );
        assert!(diff.range_1_non_overlapping_parts().is_empty());
        assert_eq!(
            diff.range_2_non_overlapping_parts().as_slice(),
            &[
                DateRange::new(ymd(2019, 1, 1), ymd(2019, 3, 1)),
                DateRange::new(ymd(2019, 4, 1), ymd(2019, 12, 1)),
            ]
        );
    }

    #[test]
    fn test_from_maybe_open_range_closed() {
        let range = DateRange::from_maybe_open_range(ymd(2019, 1, 1), Some(ymd(2019, 2, 1)));
        assert_eq!(range.upper_bound_exclusive, ymd(2019, 2, 1));
    }

    #[test]
    fn test_from_maybe_open_range_open_covers_today() {
        let range = DateRange::from_maybe_open_range(ymd(2019, 1, 1), None);
        assert!(range.contains_date(Local::now().date_naive()));
    }
}
