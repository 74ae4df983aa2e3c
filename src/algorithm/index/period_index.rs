//! Cached information about one person's pre-processed incarceration periods
//!
//! The index is built once over the output of the pre-processing pipeline
//! and is read-only afterwards. All derived lookups (month overlaps,
//! supervision-population exclusions, admission-date buckets, original
//! admission reasons) are computed at construction.

use crate::common::{DateRange, DateRangeDiff};
use crate::error::{PipelineError, Result};
use crate::models::period::IncarcerationPeriod;
use crate::models::types::{AdmissionReason, CustodialAuthority, ReleaseReason};
use chrono::NaiveDate;
use itertools::Itertools;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

/// Original admission reason resolved for a period: the most recent official
/// (non-transfer) admission reason at or before it, with its raw text
pub type OriginalAdmissionReason = (AdmissionReason, Option<String>);

/// A queryable cache over a set of pre-processed incarceration periods
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodIndex {
    /// The processed periods, in chronological order
    periods: Vec<IncarcerationPeriod>,
    /// Positions of periods during which the person cannot also be counted
    /// in the supervision population. A person in a facility but under the
    /// custodial authority of a supervision department still counts as
    /// supervised.
    not_under_supervision_authority: Vec<usize>,
    /// Duration of each period in `not_under_supervision_authority`,
    /// captured at construction
    durations_by_position: FxHashMap<usize, DateRange>,
    /// (year, month) -> positions of non-supervision-authority periods
    /// overlapping any day of that month
    month_to_overlapping_periods: FxHashMap<(i32, u32), Vec<usize>>,
    /// Months the person spent entirely incarcerated outside supervision
    /// authority
    months_excluded_from_supervision_population: FxHashSet<(i32, u32)>,
    /// Admission date -> positions of periods admitted that day
    periods_by_admission_date: FxHashMap<NaiveDate, Vec<usize>>,
    /// Period id -> the admission reason that started the stint of
    /// incarceration the period belongs to
    original_admission_reasons_by_period_id: FxHashMap<i64, OriginalAdmissionReason>,
}

impl PeriodIndex {
    /// Build an index over pre-processed periods.
    ///
    /// Fails if pre-processing's guarantees do not hold: every period must
    /// carry a `period_id`, an `admission_date`, and an `admission_reason`.
    pub fn new(periods: Vec<IncarcerationPeriod>) -> Result<Self> {
        let not_under_supervision_authority: Vec<usize> = periods
            .iter()
            .enumerate()
            .filter(|(_, ip)| {
                ip.custodial_authority != Some(CustodialAuthority::SupervisionAuthority)
            })
            .map(|(position, _)| position)
            .collect();

        let mut durations_by_position = FxHashMap::default();
        for &position in &not_under_supervision_authority {
            durations_by_position.insert(position, periods[position].duration()?);
        }

        let mut month_to_overlapping_periods: FxHashMap<(i32, u32), Vec<usize>> =
            FxHashMap::default();
        for &position in &not_under_supervision_authority {
            for month in durations_by_position[&position].months_overlapping() {
                month_to_overlapping_periods
                    .entry(month)
                    .or_default()
                    .push(position);
            }
        }

        let months_excluded_from_supervision_population = Self::excluded_months(
            &not_under_supervision_authority,
            &durations_by_position,
            &month_to_overlapping_periods,
        );

        let mut periods_by_admission_date: FxHashMap<NaiveDate, Vec<usize>> = FxHashMap::default();
        for (position, ip) in periods.iter().enumerate() {
            if let Some(admission) = ip.admission_date {
                periods_by_admission_date
                    .entry(admission)
                    .or_default()
                    .push(position);
            }
        }

        let original_admission_reasons_by_period_id =
            Self::original_admission_reasons(&periods)?;

        Ok(Self {
            periods,
            not_under_supervision_authority,
            durations_by_position,
            month_to_overlapping_periods,
            months_excluded_from_supervision_population,
            periods_by_admission_date,
            original_admission_reasons_by_period_id,
        })
    }

    /// Months where every day is covered by some non-supervision-authority
    /// period
    fn excluded_months(
        not_under_supervision_authority: &[usize],
        durations_by_position: &FxHashMap<usize, DateRange>,
        month_to_overlapping_periods: &FxHashMap<(i32, u32), Vec<usize>>,
    ) -> FxHashSet<(i32, u32)> {
        not_under_supervision_authority
            .iter()
            .flat_map(|position| durations_by_position[position].months_overlapping())
            .unique()
            .filter(|&(year, month)| {
                let overlapping = month_to_overlapping_periods
                    .get(&(year, month))
                    .map_or(&[][..], Vec::as_slice);
                let durations: Vec<DateRange> = overlapping
                    .iter()
                    .map(|position| durations_by_position[position])
                    .collect();
                Self::portions_not_covered(DateRange::for_month(year, month), &durations).is_empty()
            })
            .collect()
    }

    /// Determines the original admission reason of each period of
    /// incarceration.
    ///
    /// People are often transferred between facilities while incarcerated,
    /// so this is in practice the most recent official (non-transfer)
    /// admission reason at or before each period, reset whenever a release
    /// officially ends the stint.
    fn original_admission_reasons(
        periods: &[IncarcerationPeriod],
    ) -> Result<FxHashMap<i64, OriginalAdmissionReason>> {
        let mut reasons_by_period_id = FxHashMap::default();
        let mut most_recent_official: Option<OriginalAdmissionReason> = None;

        for (index, ip) in periods.iter().enumerate() {
            let period_id = ip.period_id.ok_or(PipelineError::MissingPeriodId)?;
            let admission_reason = ip
                .admission_reason
                .ok_or(PipelineError::MissingAdmissionReason { period_id })?;

            if index == 0 || admission_reason.is_official_admission() {
                // Incarceration is officially starting here
                most_recent_official =
                    Some((admission_reason, ip.admission_reason_raw_text.clone()));
            }

            let original = most_recent_official
                .clone()
                .unwrap_or_else(|| (admission_reason, ip.admission_reason_raw_text.clone()));
            reasons_by_period_id.insert(period_id, original);

            if ip
                .release_reason
                .is_some_and(ReleaseReason::is_official_release)
            {
                // The stint officially ended; later periods start fresh
                most_recent_official = None;
            }
        }

        Ok(reasons_by_period_id)
    }

    /// The parts of `range_to_cover` that the given durations do not overlap
    fn portions_not_covered(
        range_to_cover: DateRange,
        durations: &[DateRange],
    ) -> SmallVec<[DateRange; 2]> {
        let mut remaining: SmallVec<[DateRange; 2]> = SmallVec::new();
        remaining.push(range_to_cover);

        for duration in durations {
            let mut next_remaining = SmallVec::new();
            for range in &remaining {
                next_remaining
                    .extend(DateRangeDiff::new(*duration, *range).range_2_non_overlapping_parts());
            }
            remaining = next_remaining;
            if remaining.is_empty() {
                break;
            }
        }

        remaining
    }

    /// The processed periods, in chronological order
    #[must_use]
    pub fn periods(&self) -> &[IncarcerationPeriod] {
        &self.periods
    }

    /// The periods during which the person cannot also be counted in the
    /// supervision population
    #[must_use]
    pub fn periods_not_under_supervision_authority(&self) -> Vec<&IncarcerationPeriod> {
        self.not_under_supervision_authority
            .iter()
            .map(|&position| &self.periods[position])
            .collect()
    }

    /// Months the person spent entirely incarcerated outside supervision
    /// authority, as (year, month) pairs
    #[must_use]
    pub fn months_excluded_from_supervision_population(&self) -> &FxHashSet<(i32, u32)> {
        &self.months_excluded_from_supervision_population
    }

    /// The non-supervision-authority periods overlapping any day of the
    /// given month
    #[must_use]
    pub fn periods_overlapping_month(&self, year: i32, month: u32) -> Vec<&IncarcerationPeriod> {
        self.month_to_overlapping_periods
            .get(&(year, month))
            .map_or(&[][..], Vec::as_slice)
            .iter()
            .map(|&position| &self.periods[position])
            .collect()
    }

    /// The periods admitted on the given day
    #[must_use]
    pub fn periods_by_admission_date(&self, admission_date: NaiveDate) -> Vec<&IncarcerationPeriod> {
        self.periods_by_admission_date
            .get(&admission_date)
            .map_or(&[][..], Vec::as_slice)
            .iter()
            .map(|&position| &self.periods[position])
            .collect()
    }

    /// The original admission reason resolved for each period id
    #[must_use]
    pub fn original_admission_reasons_by_period_id(
        &self,
    ) -> &FxHashMap<i64, OriginalAdmissionReason> {
        &self.original_admission_reasons_by_period_id
    }

    /// Returns true if the person is incarcerated outside supervision
    /// authority for the full duration of the date range.
    #[must_use]
    pub fn is_excluded_from_supervision_population_for_range(
        &self,
        range_to_cover: &DateRange,
    ) -> bool {
        let months_overlapping = range_to_cover.months_overlapping();
        if months_overlapping.is_empty() {
            return false;
        }

        for (year, month) in months_overlapping {
            if self
                .months_excluded_from_supervision_population
                .contains(&(year, month))
            {
                continue;
            }

            // The month is only partially covered; the sub-range inside it
            // must be covered by the overlapping periods themselves
            let Some(portion) = range_to_cover.portion_overlapping_with_month(year, month) else {
                // Months came from the range itself, so a missing portion is
                // impossible for a non-empty range
                return false;
            };

            let durations: Vec<DateRange> = self
                .month_to_overlapping_periods
                .get(&(year, month))
                .map_or(&[][..], Vec::as_slice)
                .iter()
                .map(|position| self.durations_by_position[position])
                .collect();

            if !Self::portions_not_covered(portion, &durations).is_empty() {
                return false;
            }
        }

        true
    }

    /// Whether any incarceration admission falls within
    /// `[start_inclusive, end_exclusive)`
    #[must_use]
    pub fn incarceration_admissions_between_dates(
        &self,
        start_inclusive: NaiveDate,
        end_exclusive: NaiveDate,
    ) -> bool {
        self.periods
            .iter()
            .any(|ip| ip.admitted_between(start_inclusive, end_exclusive))
    }

    /// The periods with admissions within `[start_inclusive, end_exclusive)`
    #[must_use]
    pub fn periods_with_admissions_between_dates(
        &self,
        start_inclusive: NaiveDate,
        end_exclusive: NaiveDate,
    ) -> Vec<&IncarcerationPeriod> {
        self.periods
            .iter()
            .filter(|ip| ip.admitted_between(start_inclusive, end_exclusive))
            .collect()
    }

    /// The period which occurs immediately before the given period in this
    /// index, or None if the given period is the first.
    ///
    /// Returns an error if the given period is not a member of this index.
    pub fn preceding_period(
        &self,
        period: &IncarcerationPeriod,
    ) -> Result<Option<&IncarcerationPeriod>> {
        let period_id = period.period_id.ok_or(PipelineError::MissingPeriodId)?;
        let position = self
            .periods
            .iter()
            .position(|candidate| candidate.period_id == Some(period_id))
            .ok_or(PipelineError::PeriodNotInIndex { period_id })?;
        if position > 0 {
            Ok(Some(&self.periods[position - 1]))
        } else {
            Ok(None)
        }
    }
}
