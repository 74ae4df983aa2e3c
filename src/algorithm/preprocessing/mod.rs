//! Incarceration-period pre-processing
//!
//! Raw, often inconsistent period records enter here and leave as a clean,
//! chronologically ordered, gap-free sequence suitable for population and
//! recidivism calculations. The pipeline is deterministic and pure: it owns
//! deep copies of its input and touches nothing else.

pub mod delegate;
pub mod manager;
pub mod sort;

pub use delegate::{
    DefaultPreProcessingDelegate, StatePreProcessingDelegate, UsYyPreProcessingDelegate,
};
pub use manager::PreProcessingManager;
