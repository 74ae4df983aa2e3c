//! Chronological ordering of incarceration periods
//!
//! Periods are sorted by admission date, falling back to release date for
//! records missing an admission. Records sharing a date are ordered by a set
//! of tie-break rules recovered from observed source-data shapes: zero-day
//! records sort ahead of open records, open records ahead of longer closed
//! records, and release-only records ahead of dated zero-day records, so
//! that the inference pass sees each record next to the neighbor that can
//! close it. The tie-breaks are shape-local rules, not a single global
//! formula; inputs mixing every shape at one date have no defined order.

use crate::common::DateRangeDiff;
use crate::models::period::IncarcerationPeriod;
use crate::models::types::AdmissionReason;
use chrono::NaiveDate;
use std::cmp::Ordering;

/// Sorts periods chronologically by their set dates and statuses.
///
/// Placeholder periods must already be removed; every period is expected to
/// carry at least one of admission date or release date.
pub fn standard_date_sort(periods: &mut [IncarcerationPeriod]) {
    periods.sort_by(compare_periods);
}

/// The date a period sorts on: the admission date when set, otherwise the
/// release date
fn primary_sort_date(period: &IncarcerationPeriod) -> Option<NaiveDate> {
    period.admission_date.or(period.release_date)
}

/// Relative order of two periods under the standard date sort
#[must_use]
pub fn compare_periods(a: &IncarcerationPeriod, b: &IncarcerationPeriod) -> Ordering {
    match (primary_sort_date(a), primary_sort_date(b)) {
        (Some(date_a), Some(date_b)) if date_a != date_b => date_a.cmp(&date_b),
        (Some(_), Some(_)) => compare_same_day(a, b),
        // Undated records cannot be ordered meaningfully; push them last
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => final_tie_breaks(a, b),
    }
}

/// Shape of a period relative to its sort date, used to order records that
/// share a date
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SameDayShape {
    /// Admission and release on the same day
    ZeroDay,
    /// Admission set, release missing
    Open,
    /// Admission set, release on a later day
    Closed,
}

fn shape(period: &IncarcerationPeriod) -> SameDayShape {
    match period.release_date {
        None => SameDayShape::Open,
        Some(release) if Some(release) == period.admission_date => SameDayShape::ZeroDay,
        Some(_) => SameDayShape::Closed,
    }
}

fn compare_same_day(a: &IncarcerationPeriod, b: &IncarcerationPeriod) -> Ordering {
    match (a.admission_date.is_some(), b.admission_date.is_some()) {
        (true, true) => {
            let (shape_a, shape_b) = (shape(a), shape(b));
            if shape_a != shape_b {
                return shape_a.cmp(&shape_b);
            }
            if shape_a == SameDayShape::Closed && a.release_date != b.release_date {
                return a.release_date.cmp(&b.release_date);
            }
            final_tie_breaks(a, b)
        }
        // A release-only record is an instantaneous event on its date: it
        // sorts after an open record admitted that day (the release closes
        // it), but ahead of records that demonstrably continue past the date.
        (true, false) => {
            if a.release_date.is_none() {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }
        (false, true) => {
            if b.release_date.is_none() {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        }
        (false, false) => final_tie_breaks(a, b),
    }
}

fn is_transfer_start(period: &IncarcerationPeriod) -> bool {
    period.admission_reason == Some(AdmissionReason::Transfer)
}

fn final_tie_breaks(a: &IncarcerationPeriod, b: &IncarcerationPeriod) -> Ordering {
    // A record admitted by transfer continues an existing stay, so the
    // record that started it sorts first.
    is_transfer_start(a)
        .cmp(&is_transfer_start(b))
        .then_with(|| a.status.sort_rank().cmp(&b.status.sort_rank()))
        .then_with(|| a.external_id.cmp(&b.external_id))
        .then_with(|| a.period_id.cmp(&b.period_id))
}

/// Returns whether `period` is entirely nested within `previous`: the two
/// overlap and no part of `period` falls outside `previous`.
///
/// Zero-day periods span no days, so they overlap nothing and are never
/// nested. Expects `period` to carry both dates and `previous` to carry an
/// admission date; callers check this before asking.
#[must_use]
pub fn is_nested_in_previous_period(
    period: &IncarcerationPeriod,
    previous: &IncarcerationPeriod,
) -> bool {
    let (Ok(period_duration), Ok(previous_duration)) = (period.duration(), previous.duration())
    else {
        return false;
    };
    let diff = DateRangeDiff::new(period_duration, previous_duration);
    diff.overlapping_range().is_some() && diff.range_1_non_overlapping_parts().is_empty()
}
