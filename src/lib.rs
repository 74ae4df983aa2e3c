//! A Rust library for normalizing state corrections records: raw, often
//! inconsistent incarceration-period records are validated, sorted, repaired,
//! and collapsed into a clean, temporally ordered sequence, then exposed as a
//! queryable per-person index for population and recidivism calculations.

pub mod algorithm;
pub mod common;
pub mod config;
pub mod error;
pub mod models;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::PreProcessingConfig;
pub use error::{PipelineError, Result};
pub use models::period::IncarcerationPeriod;
pub use models::types::{
    AdmissionReason, CustodialAuthority, FacilitySecurityLevel, IncarcerationType, PeriodStatus,
    ReleaseReason, SpecializedPurpose,
};

// Pre-processing pipeline
pub use algorithm::preprocessing::delegate::{
    DefaultPreProcessingDelegate, StatePreProcessingDelegate, UsYyPreProcessingDelegate,
};
pub use algorithm::preprocessing::manager::{PreProcessingManager, combine_periods};

// Derived index
pub use algorithm::index::PeriodIndex;

// Interval utilities
pub use common::date::{DateRange, DateRangeDiff};
