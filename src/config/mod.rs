//! Configuration for a pre-processing run.

use serde::{Deserialize, Serialize};

/// Options governing one pre-processing run over a person's periods.
///
/// The configuration doubles as the memoization key for processed indexes:
/// two runs with equal configurations on the same manager return the same
/// cached result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PreProcessingConfig {
    /// Whether to collapse chronologically adjacent periods that are
    /// connected by a transfer release and transfer admission
    pub collapse_transfers: bool,
    /// Whether to overwrite facility information when collapsing
    /// transfer edges
    pub overwrite_facility_information_in_transfers: bool,
}
