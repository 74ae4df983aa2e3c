//! Pre-processing pipeline for a single person's incarceration periods
//!
//! The manager validates, sorts, and collapses raw period records and hands
//! the result to downstream calculations as a [`PeriodIndex`]. One manager
//! instance is scoped to one person's processing request: it owns a private
//! copy of the raw periods and a private result cache per configuration, so
//! repeated calls with the same configuration return the same cached index.

use crate::algorithm::index::PeriodIndex;
use crate::algorithm::preprocessing::delegate::{StatePreProcessingDelegate, purposes_block_collapse};
use crate::algorithm::preprocessing::sort::{is_nested_in_previous_period, standard_date_sort};
use crate::config::PreProcessingConfig;
use crate::error::Result;
use crate::models::period::IncarcerationPeriod;
use crate::models::types::{AdmissionReason, PeriodStatus, ReleaseReason};
use chrono::{Local, NaiveDate};
use rustc_hash::FxHashMap;

/// Generalized and state-specific pre-processing of incarceration periods
/// for use in calculations
#[derive(Debug)]
pub struct PreProcessingManager {
    /// Pristine copy of the raw input, re-copied at the start of every
    /// configuration's pipeline run
    incarceration_periods: Vec<IncarcerationPeriod>,
    delegate: Box<dyn StatePreProcessingDelegate>,
    /// End date of the earliest incarceration or supervision period ending
    /// in death. None if no period ends in death.
    earliest_death_date: Option<NaiveDate>,
    /// Boundary for future-date detection; injected so behavior is
    /// reproducible in tests
    today: NaiveDate,
    index_cache: FxHashMap<PreProcessingConfig, PeriodIndex>,
}

impl PreProcessingManager {
    /// Create a manager over a defensive copy of the given raw periods
    #[must_use]
    pub fn new(
        incarceration_periods: &[IncarcerationPeriod],
        delegate: Box<dyn StatePreProcessingDelegate>,
        earliest_death_date: Option<NaiveDate>,
    ) -> Self {
        Self::with_today(
            incarceration_periods,
            delegate,
            earliest_death_date,
            Local::now().date_naive(),
        )
    }

    /// Create a manager with an explicit "today" for the future-date checks
    #[must_use]
    pub fn with_today(
        incarceration_periods: &[IncarcerationPeriod],
        delegate: Box<dyn StatePreProcessingDelegate>,
        earliest_death_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Self {
        Self {
            incarceration_periods: incarceration_periods.to_vec(),
            delegate,
            earliest_death_date,
            today,
            index_cache: FxHashMap::default(),
        }
    }

    /// The pristine raw periods this manager was constructed over
    #[must_use]
    pub fn raw_periods(&self) -> &[IncarcerationPeriod] {
        &self.incarceration_periods
    }

    /// Validates, sorts, and collapses the incarceration period inputs and
    /// returns them wrapped in a queryable index.
    ///
    /// Ensures the necessary dates and fields are set on each period. If
    /// `config.collapse_transfers` is true, collapses adjacent periods
    /// connected by a transfer. The result is computed once per distinct
    /// configuration and cached for the lifetime of the manager.
    pub fn period_index_for_calculations(
        &mut self,
        config: &PreProcessingConfig,
    ) -> Result<&PeriodIndex> {
        if !self.index_cache.contains_key(config) {
            let index = if self.incarceration_periods.is_empty() {
                PeriodIndex::new(Vec::new())?
            } else {
                // Work on a fresh copy so runs with other configurations
                // never observe this run's mutations
                let periods = self.incarceration_periods.clone();
                let periods = Self::drop_placeholder_periods(periods);
                let periods = self.sort_and_infer_missing_dates_and_statuses(periods);
                let periods = self.drop_periods_from_calculations(periods);
                let periods = if config.collapse_transfers {
                    self.collapse_period_transfers(
                        periods,
                        config.overwrite_facility_information_in_transfers,
                    )
                } else {
                    periods
                };
                PeriodIndex::new(periods)?
            };
            self.index_cache.insert(*config, index);
        }
        Ok(&self.index_cache[config])
    }

    /// Removes periods that carry no admission or release information
    fn drop_placeholder_periods(periods: Vec<IncarcerationPeriod>) -> Vec<IncarcerationPeriod> {
        periods
            .into_iter()
            .filter(|ip| !ip.is_placeholder())
            .collect()
    }

    /// Sorts the periods chronologically, then infers missing dates and
    /// statuses for each period from its neighbors in the sorted list.
    ///
    /// Periods that cannot be repaired are dropped with a diagnostic;
    /// dropped periods still serve as neighbors for the records around them.
    fn sort_and_infer_missing_dates_and_statuses(
        &self,
        mut periods: Vec<IncarcerationPeriod>,
    ) -> Vec<IncarcerationPeriod> {
        standard_date_sort(&mut periods);

        let mut updated_periods: Vec<IncarcerationPeriod> = Vec::with_capacity(periods.len());

        for index in 0..periods.len() {
            let mut ip = periods[index].clone();
            let previous_ip = if index > 0 {
                Some(periods[index - 1].clone())
            } else {
                None
            };
            let next_ip = periods.get(index + 1).cloned();

            let keep = self.infer_missing_dates_and_statuses(
                &mut ip,
                previous_ip.as_ref(),
                next_ip.as_ref(),
                updated_periods.last(),
            );

            // Write the inferred values back so later periods see them when
            // they look at their predecessor
            periods[index] = ip.clone();

            if keep {
                updated_periods.push(ip);
            }
        }

        updated_periods
    }

    /// Repairs one period in place. Returns false if the period should be
    /// dropped instead.
    fn infer_missing_dates_and_statuses(
        &self,
        ip: &mut IncarcerationPeriod,
        previous_ip: Option<&IncarcerationPeriod>,
        next_ip: Option<&IncarcerationPeriod>,
        last_valid_ip: Option<&IncarcerationPeriod>,
    ) -> bool {
        if let Some(death_date) = self.earliest_death_date {
            if ip.admission_date.is_some_and(|admission| death_date <= admission) {
                // Nobody is newly admitted after their recorded death
                log::info!(
                    "Dropping incarceration period [{:?}] with an admission_date after a release due to death",
                    ip.period_id
                );
                return false;
            }
            if ip.release_date.is_none_or(|release| release > death_date) {
                // The period runs past the death date or is unterminated;
                // clamp it to the death date
                ip.release_date = Some(death_date);
                ip.release_reason = Some(ReleaseReason::Death);
                ip.status = PeriodStatus::NotInCustody;
            }
        }

        match ip.release_date {
            None => {
                if let Some(next_ip) = next_ip {
                    // Not the last period in the list; close it against the
                    // next period's admission (or release) date
                    ip.release_date = next_ip.admission_date.or(next_ip.release_date);
                    if ip.release_reason.is_none()
                        && next_ip.admission_reason == Some(AdmissionReason::Transfer)
                    {
                        // They were transferred into the next period, so this
                        // release was a transfer
                        ip.release_reason = Some(ReleaseReason::Transfer);
                    }
                    ip.status = PeriodStatus::NotInCustody;
                } else if ip.status != PeriodStatus::InCustody {
                    // Last period in the list, and the person is no longer in
                    // custody on it
                    ip.release_date = ip.admission_date;
                    ip.release_reason = Some(ReleaseReason::InternalUnknown);
                } else if ip.release_reason.is_some() || ip.release_reason_raw_text.is_some() {
                    // No release date, but the set release_reason says the
                    // person already left custody
                    ip.release_date = ip.admission_date;
                    ip.status = PeriodStatus::NotInCustody;
                    log::warn!(
                        "No release_date for incarceration period [{:?}] with nonnull release_reason [{:?}] or release_reason_raw_text [{:?}]",
                        ip.period_id,
                        ip.release_reason,
                        ip.release_reason_raw_text
                    );
                }
            }
            Some(release) if release > self.today => {
                // An erroneous release date in the future; clear the release
                // information and treat the period as open
                ip.release_date = None;
                ip.release_reason = None;
                ip.status = PeriodStatus::InCustody;
            }
            Some(_) => {}
        }

        match ip.admission_date {
            None => {
                if let Some(previous_ip) = previous_ip {
                    // Open this period against the end of the preceding one
                    ip.admission_date = previous_ip.release_date.or(previous_ip.admission_date);
                    if ip.admission_reason.is_none()
                        && previous_ip.release_reason == Some(ReleaseReason::Transfer)
                    {
                        // They were transferred out of the previous period,
                        // so this admission was a transfer
                        ip.admission_reason = Some(AdmissionReason::Transfer);
                    }
                } else {
                    // First period in the list; collapse it onto its release
                    // date
                    ip.admission_date = ip.release_date;
                    ip.admission_reason = Some(AdmissionReason::InternalUnknown);
                }
            }
            Some(admission) if admission > self.today => {
                log::info!(
                    "Dropping incarceration period [{:?}] with admission_date in the future",
                    ip.period_id
                );
                return false;
            }
            Some(_) => {}
        }

        if ip.admission_reason.is_none() {
            ip.admission_reason = Some(AdmissionReason::InternalUnknown);
        }
        if ip.release_date.is_some() && ip.release_reason.is_none() {
            ip.release_reason = Some(ReleaseReason::InternalUnknown);
        }

        if let (Some(admission), Some(release)) = (ip.admission_date, ip.release_date) {
            if release < admission {
                log::info!(
                    "Dropping incarceration period [{:?}] with release before admission",
                    ip.period_id
                );
                return false;
            }
            if let Some(last_valid_ip) = last_valid_ip {
                if is_nested_in_previous_period(ip, last_valid_ip) {
                    // Entirely contained in the period before it; it adds no
                    // information and would corrupt collapsing
                    log::info!(
                        "Dropping incarceration period [{:?}] that is nested in period [{:?}]",
                        ip.period_id,
                        last_valid_ip.period_id
                    );
                    return false;
                }
            }
        }

        true
    }

    /// Drops periods matching the jurisdiction's filter policies, along with
    /// zero-day erroneous periods.
    ///
    /// Predecessor checks run against the filtered-so-far list, successor
    /// checks against the unfiltered remainder.
    fn drop_periods_from_calculations(
        &self,
        periods: Vec<IncarcerationPeriod>,
    ) -> Vec<IncarcerationPeriod> {
        let admission_reasons_to_filter = self.delegate.admission_reasons_to_filter();
        let incarceration_types_to_filter = self.delegate.incarceration_types_to_filter();

        let mut filtered_periods: Vec<IncarcerationPeriod> = Vec::with_capacity(periods.len());

        for (idx, ip) in periods.iter().enumerate() {
            if ip
                .admission_reason
                .is_some_and(|reason| admission_reasons_to_filter.contains(&reason))
            {
                continue;
            }
            if ip
                .incarceration_type
                .is_some_and(|kind| incarceration_types_to_filter.contains(&kind))
            {
                continue;
            }

            let previous_ip = filtered_periods.last();
            let next_ip = periods.get(idx + 1);

            if Self::is_zero_day_erroneous_period(ip, previous_ip, next_ip) {
                log::info!(
                    "Dropping zero-day erroneous incarceration period [{:?}]",
                    ip.period_id
                );
                continue;
            }
            filtered_periods.push(ip.clone());
        }

        filtered_periods
    }

    /// Returns whether the period is a zero-day erroneous period.
    ///
    /// Zero-day erroneous periods are periods where the admission date equals
    /// the release date, and any of the following hold:
    /// - the person was released from an erroneous admission after a
    ///   non-transfer admission
    /// - the person was admitted from supervision and conditionally released
    ///   on the same day
    /// - the release borders the previous period's release with the same
    ///   release reason, and the edge between them is not a transfer edge
    /// - the admission borders the next period's admission with the same
    ///   admission reason, and the edge between them is not a transfer edge
    fn is_zero_day_erroneous_period(
        ip: &IncarcerationPeriod,
        previous_ip: Option<&IncarcerationPeriod>,
        next_ip: Option<&IncarcerationPeriod>,
    ) -> bool {
        if ip.admission_date.is_none() || ip.admission_date != ip.release_date {
            return false;
        }

        if ip.release_reason == Some(ReleaseReason::ReleasedFromErroneousAdmission)
            && ip.admission_reason != Some(AdmissionReason::Transfer)
        {
            return true;
        }

        if ip.admission_reason == Some(AdmissionReason::AdmittedFromSupervision)
            && ip.release_reason == Some(ReleaseReason::ConditionalRelease)
        {
            return true;
        }

        if let Some(previous_ip) = previous_ip {
            if ip.release_date == previous_ip.release_date
                && ip.release_reason == previous_ip.release_reason
            {
                if previous_ip.release_reason == Some(ReleaseReason::Transfer)
                    && ip.admission_reason == Some(AdmissionReason::Transfer)
                {
                    // A transfer edge; the collapsing stage handles these
                    return false;
                }
                return true;
            }
        }

        if let Some(next_ip) = next_ip {
            if ip.admission_date == next_ip.admission_date
                && ip.admission_reason == next_ip.admission_reason
            {
                if ip.release_reason == Some(ReleaseReason::Transfer)
                    && next_ip.admission_reason == Some(AdmissionReason::Transfer)
                {
                    return false;
                }
                return true;
            }
        }

        false
    }

    /// Collapses periods that are connected by a transfer release followed
    /// by a transfer admission.
    fn collapse_period_transfers(
        &self,
        periods: Vec<IncarcerationPeriod>,
        overwrite_facility_information_in_transfers: bool,
    ) -> Vec<IncarcerationPeriod> {
        let mut new_periods: Vec<IncarcerationPeriod> = Vec::with_capacity(periods.len());
        let mut open_transfer = false;

        for ip in periods {
            let collapsible_admission = open_transfer
                && ip
                    .admission_reason
                    .is_some_and(|reason| {
                        // Never collapse across an official admission
                        !reason.is_official_admission() && reason == AdmissionReason::Transfer
                    });

            // The collapsed period's release reason mirrors this period's,
            // so the flag is read before the period is consumed
            let ends_in_transfer = ip.release_reason == Some(ReleaseReason::Transfer);

            if collapsible_admission {
                if let Some(start_period) = new_periods.pop() {
                    if purposes_block_collapse(
                        self.delegate.as_ref(),
                        start_period.specialized_purpose,
                        ip.specialized_purpose,
                    ) {
                        // This jurisdiction keeps distinct specialized
                        // purposes apart; emit both periods separately
                        new_periods.push(start_period);
                        new_periods.push(ip);
                    } else {
                        new_periods.push(combine_periods(
                            &start_period,
                            &ip,
                            false,
                            overwrite_facility_information_in_transfers,
                        ));
                    }
                } else {
                    new_periods.push(ip);
                }
            } else {
                new_periods.push(ip);
            }

            open_transfer = ends_in_transfer;
        }

        new_periods
    }
}

/// Combines two incarceration periods into one.
///
/// The merged period keeps the identity and admission-side fields of
/// `start`; the release-side fields (status, release date and reason,
/// projected release reason) always come from `end`. Facility, housing,
/// security-level, and specialized-purpose information comes from `end` only
/// when `overwrite_facility_information` is set, and the specialized purpose
/// specifically is only overwritten by a non-null value. The admission
/// reason comes from `end` only when `overwrite_admission_reason` is set,
/// which is reserved for backfilling periods with missing admission data.
#[must_use]
pub fn combine_periods(
    start: &IncarcerationPeriod,
    end: &IncarcerationPeriod,
    overwrite_admission_reason: bool,
    overwrite_facility_information: bool,
) -> IncarcerationPeriod {
    let mut combined = start.clone();

    if overwrite_admission_reason {
        combined.admission_reason = end.admission_reason;
        combined.admission_reason_raw_text = end.admission_reason_raw_text.clone();
    }

    if overwrite_facility_information {
        combined.facility = end.facility.clone();
        combined.facility_security_level = end.facility_security_level;
        combined.facility_security_level_raw_text = end.facility_security_level_raw_text.clone();
        combined.housing_unit = end.housing_unit.clone();
        // The latest non-null specialized purpose wins
        if end.specialized_purpose.is_some() {
            combined.specialized_purpose = end.specialized_purpose;
            combined.specialized_purpose_raw_text = end.specialized_purpose_raw_text.clone();
        }
    }

    combined.status = end.status;
    combined.release_date = end.release_date;
    combined.release_reason = end.release_reason;
    combined.release_reason_raw_text = end.release_reason_raw_text.clone();
    combined.projected_release_reason = end.projected_release_reason;
    combined.projected_release_reason_raw_text = end.projected_release_reason_raw_text.clone();

    combined
}
