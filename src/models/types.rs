//! Enumerated values shared by the incarceration-period entity model
//!
//! Every categorical field on a period carries one of these enums, with the
//! raw source string preserved alongside it in a `*_raw_text` field on the
//! entity. `InternalUnknown` marks values our own normalization could not
//! resolve; `ExternalUnknown` marks values the source system reported as
//! unknown.

use serde::{Deserialize, Serialize};

/// Custody status of a person over a period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodStatus {
    /// Currently in custody on this period
    InCustody,
    /// No longer in custody on this period
    NotInCustody,
    /// Record exists but carries no status information
    PresentWithoutInfo,
    /// Source system reported the status as unknown
    ExternalUnknown,
}

impl PeriodStatus {
    /// Rank used when ordering periods that share all date information.
    ///
    /// A period that looks currently open must sort after the closed and
    /// unknown-status periods around it, so that inference closes the
    /// others against it.
    #[must_use]
    pub fn sort_rank(self) -> u8 {
        match self {
            Self::NotInCustody => 0,
            Self::ExternalUnknown => 1,
            Self::PresentWithoutInfo => 2,
            Self::InCustody => 3,
        }
    }
}

/// Reason a person was admitted to a facility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdmissionReason {
    /// Admitted by mistake
    AdmittedInError,
    /// Incarcerated after a period of supervision, reason unspecified
    AdmittedFromSupervision,
    ExternalUnknown,
    InternalUnknown,
    /// New court commitment
    NewAdmission,
    ParoleRevocation,
    ProbationRevocation,
    /// Revocation of simultaneous parole and probation
    DualRevocation,
    /// Short sanction stay ordered in response to a supervision violation
    SanctionAdmission,
    ReturnFromErroneousRelease,
    ReturnFromEscape,
    /// Same commitment, changed custody conditions
    StatusChange,
    /// Held temporarily, e.g. pending a revocation decision
    TemporaryCustody,
    /// Moved in from another facility
    Transfer,
    TransferredFromOutOfState,
}

impl AdmissionReason {
    /// Whether this reason marks the official start of a stint of
    /// incarceration, as opposed to movement within one.
    ///
    /// Official admissions are never merged into a preceding period, and they
    /// start a new original-admission-reason chain in the period index.
    #[must_use]
    pub fn is_official_admission(self) -> bool {
        match self {
            Self::AdmittedInError
            | Self::AdmittedFromSupervision
            | Self::ExternalUnknown
            | Self::NewAdmission
            | Self::ParoleRevocation
            | Self::ProbationRevocation
            | Self::DualRevocation
            | Self::SanctionAdmission
            | Self::TemporaryCustody => true,
            Self::InternalUnknown
            | Self::ReturnFromErroneousRelease
            | Self::ReturnFromEscape
            | Self::StatusChange
            | Self::Transfer
            | Self::TransferredFromOutOfState => false,
        }
    }
}

/// Reason a person was released from a facility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReleaseReason {
    /// Sentence commuted by an executive authority
    Commuted,
    CompassionateRelease,
    /// Released onto parole or another form of conditional supervision
    ConditionalRelease,
    CourtOrder,
    Death,
    Escape,
    Execution,
    ExternalUnknown,
    InternalUnknown,
    Pardoned,
    /// Released because the admission itself was erroneous
    ReleasedFromErroneousAdmission,
    ReleasedFromTemporaryCustody,
    /// Released by mistake; the person is still serving their sentence
    ReleasedInError,
    ReleasedToSupervision,
    SentenceServed,
    /// Same commitment, changed custody conditions
    StatusChange,
    /// Moved out to another facility
    Transfer,
    TransferredOutOfState,
    /// Conviction vacated
    Vacated,
}

impl ReleaseReason {
    /// Whether this reason marks the official end of a stint of
    /// incarceration, as opposed to movement within one.
    ///
    /// An escape or an in-error release does not end the stint; the person is
    /// still serving their sentence.
    #[must_use]
    pub fn is_official_release(self) -> bool {
        match self {
            Self::Commuted
            | Self::CompassionateRelease
            | Self::ConditionalRelease
            | Self::CourtOrder
            | Self::Death
            | Self::Execution
            | Self::ExternalUnknown
            | Self::Pardoned
            | Self::ReleasedFromErroneousAdmission
            | Self::ReleasedFromTemporaryCustody
            | Self::ReleasedToSupervision
            | Self::SentenceServed
            | Self::Vacated => true,
            Self::Escape
            | Self::InternalUnknown
            | Self::ReleasedInError
            | Self::StatusChange
            | Self::Transfer
            | Self::TransferredOutOfState => false,
        }
    }
}

/// Kind of institution a period was served in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncarcerationType {
    CountyJail,
    ExternalUnknown,
    FederalPrison,
    InternalUnknown,
    OutOfState,
    StatePrison,
}

/// Categorical reason a person is being held, distinct from the
/// admission reason
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecializedPurpose {
    General,
    /// Held while awaiting a parole board decision
    ParoleBoardHold,
    ShockIncarceration,
    TreatmentInPrison,
    InternalUnknown,
    ExternalUnknown,
}

/// Agency legally responsible for the person during a period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustodialAuthority {
    Court,
    Federal,
    OtherCountry,
    OtherState,
    StatePrison,
    /// The supervision department; a person in a facility under this
    /// authority still counts in the supervision population
    SupervisionAuthority,
    InternalUnknown,
    ExternalUnknown,
}

/// Security level of the facility housing the person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacilitySecurityLevel {
    Maximum,
    Medium,
    Minimum,
}
