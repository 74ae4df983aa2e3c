//! Canonical entity model for corrections records.

pub mod period;
pub mod types;

pub use period::IncarcerationPeriod;
pub use types::{
    AdmissionReason, CustodialAuthority, FacilitySecurityLevel, IncarcerationType, PeriodStatus,
    ReleaseReason, SpecializedPurpose,
};
