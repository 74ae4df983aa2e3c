//! Fixture helpers shared by the test suites

use crate::models::period::IncarcerationPeriod;
use crate::models::types::{
    AdmissionReason, IncarcerationType, PeriodStatus, ReleaseReason,
};
use chrono::NaiveDate;

/// Shorthand for building fixture dates
#[must_use]
pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("fixture dates are valid")
}

/// A closed state-prison period with ordinary admission and release reasons.
/// Override fields with struct-update syntax as needed.
#[must_use]
pub fn closed_period(period_id: i64, admission_date: NaiveDate, release_date: NaiveDate) -> IncarcerationPeriod {
    IncarcerationPeriod {
        period_id: Some(period_id),
        state_code: "US_XX".to_string(),
        status: PeriodStatus::NotInCustody,
        incarceration_type: Some(IncarcerationType::StatePrison),
        admission_date: Some(admission_date),
        admission_reason: Some(AdmissionReason::NewAdmission),
        release_date: Some(release_date),
        release_reason: Some(ReleaseReason::SentenceServed),
        ..IncarcerationPeriod::default()
    }
}

/// An open state-prison period for a person still in custody
#[must_use]
pub fn open_period(period_id: i64, admission_date: NaiveDate) -> IncarcerationPeriod {
    IncarcerationPeriod {
        period_id: Some(period_id),
        state_code: "US_XX".to_string(),
        status: PeriodStatus::InCustody,
        incarceration_type: Some(IncarcerationType::StatePrison),
        admission_date: Some(admission_date),
        admission_reason: Some(AdmissionReason::NewAdmission),
        ..IncarcerationPeriod::default()
    }
}
