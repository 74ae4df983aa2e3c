//! Incarceration period entity model
//!
//! This module contains the `IncarcerationPeriod` model, the canonical record
//! of one continuous stay in a facility. Raw periods arrive from the
//! ingestion boundary with nulls, contradictions, and overlaps; the
//! pre-processing pipeline mutates working copies of them until they satisfy
//! the invariants the calculation pipelines depend on.

use crate::common::DateRange;
use crate::error::{PipelineError, Result};
use crate::models::types::{
    AdmissionReason, CustodialAuthority, FacilitySecurityLevel, IncarcerationType, PeriodStatus,
    ReleaseReason, SpecializedPurpose,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Representation of one continuous period of incarceration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncarcerationPeriod {
    /// Identifier unique within a person's period list. Required once
    /// normalization completes.
    pub period_id: Option<i64>,
    /// Provenance identifier from the source system; may be a composite when
    /// periods have been merged upstream
    pub external_id: Option<String>,
    /// Jurisdiction the record was ingested from
    pub state_code: String,
    /// Custody status of the person over this period
    pub status: PeriodStatus,
    /// Kind of institution the period was served in
    pub incarceration_type: Option<IncarcerationType>,
    /// Day the person was admitted
    pub admission_date: Option<NaiveDate>,
    /// Why the person was admitted
    pub admission_reason: Option<AdmissionReason>,
    /// Source string the admission reason was parsed from
    pub admission_reason_raw_text: Option<String>,
    /// Day the person was released
    pub release_date: Option<NaiveDate>,
    /// Why the person was released
    pub release_reason: Option<ReleaseReason>,
    /// Source string the release reason was parsed from
    pub release_reason_raw_text: Option<String>,
    /// Expected reason for the eventual release, if recorded
    pub projected_release_reason: Option<ReleaseReason>,
    /// Source string the projected release reason was parsed from
    pub projected_release_reason_raw_text: Option<String>,
    /// Why the person is being held
    pub specialized_purpose: Option<SpecializedPurpose>,
    /// Source string the specialized purpose was parsed from
    pub specialized_purpose_raw_text: Option<String>,
    /// Facility the person is held in
    pub facility: Option<String>,
    /// Housing unit within the facility
    pub housing_unit: Option<String>,
    /// Security level of the facility
    pub facility_security_level: Option<FacilitySecurityLevel>,
    /// Source string the security level was parsed from
    pub facility_security_level_raw_text: Option<String>,
    /// Agency legally responsible for the person during this period
    pub custodial_authority: Option<CustodialAuthority>,
}

impl Default for IncarcerationPeriod {
    fn default() -> Self {
        Self {
            period_id: None,
            external_id: None,
            state_code: String::new(),
            status: PeriodStatus::PresentWithoutInfo,
            incarceration_type: None,
            admission_date: None,
            admission_reason: None,
            admission_reason_raw_text: None,
            release_date: None,
            release_reason: None,
            release_reason_raw_text: None,
            projected_release_reason: None,
            projected_release_reason_raw_text: None,
            specialized_purpose: None,
            specialized_purpose_raw_text: None,
            facility: None,
            housing_unit: None,
            facility_security_level: None,
            facility_security_level_raw_text: None,
            custodial_authority: None,
        }
    }
}

impl IncarcerationPeriod {
    /// Whether this record carries no admission or release information at
    /// all. Placeholder records cannot be dated or ordered and are removed
    /// before any inference runs.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.admission_date.is_none()
            && self.admission_reason.is_none()
            && self.release_date.is_none()
            && self.release_reason.is_none()
    }

    /// The days this period spans, as a closed-open range.
    ///
    /// An open period (no release date) is treated as extending through
    /// today. A zero-day period yields an empty range.
    pub fn duration(&self) -> Result<DateRange> {
        let admission_date =
            self.admission_date
                .ok_or_else(|| PipelineError::UndatedPeriod {
                    period_id: self.period_id.unwrap_or(-1),
                })?;
        Ok(DateRange::from_maybe_open_range(
            admission_date,
            self.release_date,
        ))
    }

    /// Whether an admission on this period happened within
    /// `[start_inclusive, end_exclusive)`
    #[must_use]
    pub fn admitted_between(&self, start_inclusive: NaiveDate, end_exclusive: NaiveDate) -> bool {
        self.admission_date
            .is_some_and(|admission| start_inclusive <= admission && admission < end_exclusive)
    }
}
