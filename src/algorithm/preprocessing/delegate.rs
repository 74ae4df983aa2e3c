//! Jurisdiction-specific pre-processing policy
//!
//! Each jurisdiction records transfers and administrative stays differently,
//! so a handful of pre-processing decisions are delegated to a per-state
//! policy object. Implementations are pure: every method is a function of
//! the jurisdiction baked into the type, never of the data being processed.

use crate::models::types::{AdmissionReason, IncarcerationType, SpecializedPurpose};
use rustc_hash::FxHashSet;
use std::fmt::Debug;

/// State-specific decisions involved in pre-processing incarceration
/// periods.
///
/// The provided method bodies are the default policy; a jurisdiction
/// overrides only the decisions where its records deviate.
pub trait StatePreProcessingDelegate: Debug + Send + Sync {
    /// Whether to collapse chronologically adjacent periods that are
    /// connected by a transfer release and transfer admission but have
    /// different specialized-purpose values.
    fn collapse_transfers_with_different_purposes(&self) -> bool {
        true
    }

    /// Admission reasons that indicate a period should be dropped entirely
    /// from calculations.
    fn admission_reasons_to_filter(&self) -> FxHashSet<AdmissionReason> {
        FxHashSet::default()
    }

    /// Incarceration types that indicate a period should be dropped entirely
    /// from calculations.
    fn incarceration_types_to_filter(&self) -> FxHashSet<IncarcerationType> {
        FxHashSet::default()
    }
}

/// Policy for jurisdictions with no deviations from the default behavior
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultPreProcessingDelegate;

impl StatePreProcessingDelegate for DefaultPreProcessingDelegate {}

/// Policy for US_YY, a jurisdiction whose parole-board holds must stay
/// distinct from general incarceration and whose county-jail temporary
/// custody records are not usable in calculations.
#[derive(Debug, Default, Clone, Copy)]
pub struct UsYyPreProcessingDelegate;

impl StatePreProcessingDelegate for UsYyPreProcessingDelegate {
    fn collapse_transfers_with_different_purposes(&self) -> bool {
        // Board holds are reported as transfers but represent a different
        // legal posture than the general population stay around them.
        false
    }

    fn admission_reasons_to_filter(&self) -> FxHashSet<AdmissionReason> {
        [AdmissionReason::TemporaryCustody].into_iter().collect()
    }

    fn incarceration_types_to_filter(&self) -> FxHashSet<IncarcerationType> {
        [IncarcerationType::CountyJail].into_iter().collect()
    }
}

/// Whether two periods' specialized purposes should block a transfer
/// collapse under the given policy
#[must_use]
pub fn purposes_block_collapse(
    delegate: &dyn StatePreProcessingDelegate,
    start_purpose: Option<SpecializedPurpose>,
    end_purpose: Option<SpecializedPurpose>,
) -> bool {
    !delegate.collapse_transfers_with_different_purposes() && start_purpose != end_purpose
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_delegate_policy() {
        let delegate = DefaultPreProcessingDelegate;
        assert!(delegate.collapse_transfers_with_different_purposes());
        assert!(delegate.admission_reasons_to_filter().is_empty());
        assert!(delegate.incarceration_types_to_filter().is_empty());
    }

    #[test]
    fn test_purposes_block_collapse_default_policy_never_blocks() {
        assert!(!purposes_block_collapse(
            &DefaultPreProcessingDelegate,
            Some(SpecializedPurpose::ParoleBoardHold),
            Some(SpecializedPurpose::General),
        ));
    }

    #[test]
    fn test_purposes_block_collapse_us_yy_blocks_differing_purposes() {
        assert!(purposes_block_collapse(
            &UsYyPreProcessingDelegate,
            Some(SpecializedPurpose::ParoleBoardHold),
            Some(SpecializedPurpose::General),
        ));
        assert!(!purposes_block_collapse(
            &UsYyPreProcessingDelegate,
            Some(SpecializedPurpose::General),
            Some(SpecializedPurpose::General),
        ));
    }
}
