//! Contract modification kinds and the dual-consent state machine.
//!
//! A proposal starts with the proposer's flag set and the counterpart's
//! cleared. Only the transition into "both accepted" applies the change,
//! and it can happen at most once because applying also finishes the
//! proposal. Any decline finishes the proposal without applying anything.
//! Finished proposals are inert.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::party::Party;
use crate::terms::WorkTerms;

// ---------------------------------------------------------------------------
// Modification kinds
// ---------------------------------------------------------------------------

/// What a contract modification changes once both parties consent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModificationType {
    /// Replace `total_hours` only.
    Extension,
    /// Replace hours per week, total hours, and price.
    Modification,
    /// End the contract; terms are ignored.
    Termination,
}

pub const VALID_MODIFICATION_TYPES: &[&str] = &["EXTENSION", "MODIFICATION", "TERMINATION"];

impl ModificationType {
    pub fn as_str(self) -> &'static str {
        match self {
            ModificationType::Extension => "EXTENSION",
            ModificationType::Modification => "MODIFICATION",
            ModificationType::Termination => "TERMINATION",
        }
    }

    /// Extensions and modifications must keep the contract within the
    /// legal duration; terminations carry no meaningful terms.
    pub fn requires_duration_check(self) -> bool {
        !matches!(self, ModificationType::Termination)
    }
}

impl fmt::Display for ModificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModificationType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EXTENSION" => Ok(ModificationType::Extension),
            "MODIFICATION" => Ok(ModificationType::Modification),
            "TERMINATION" => Ok(ModificationType::Termination),
            other => Err(CoreError::Validation(format!(
                "Invalid modification type '{other}'. Must be one of: {}",
                VALID_MODIFICATION_TYPES.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Consent state machine
// ---------------------------------------------------------------------------

/// The consent flags of a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Consent {
    pub accepted_by_company: bool,
    pub accepted_by_student: bool,
    pub finished: bool,
}

impl Consent {
    /// Fresh proposal: the proposer has accepted, the counterpart has not.
    pub fn proposed_by(proposer: Party) -> Self {
        Self {
            accepted_by_company: proposer == Party::Company,
            accepted_by_student: proposer == Party::Student,
            finished: false,
        }
    }

    pub fn accepted_by(&self, party: Party) -> bool {
        match party {
            Party::Company => self.accepted_by_company,
            Party::Student => self.accepted_by_student,
        }
    }

    pub fn fully_accepted(&self) -> bool {
        self.accepted_by_company && self.accepted_by_student
    }

    fn with_flag(mut self, party: Party, value: bool) -> Self {
        match party {
            Party::Company => self.accepted_by_company = value,
            Party::Student => self.accepted_by_student = value,
        }
        self
    }
}

/// A party's answer to a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Response {
    Accept,
    Decline,
}

/// What the storage layer must do after a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The proposal is already finished; nothing may change.
    AlreadyFinished,
    /// Flags did not change (e.g. the proposer accepted again).
    Unchanged,
    /// Flag recorded; still waiting for the other party.
    AwaitingCounterpart(Consent),
    /// Second acceptance: apply the change. The consent is already finished.
    Apply(Consent),
    /// Declined: finished without applying anything.
    Declined(Consent),
}

/// Evaluate `response` from `by` against the current `consent`.
pub fn respond(consent: Consent, by: Party, response: Response) -> Outcome {
    if consent.finished {
        return Outcome::AlreadyFinished;
    }

    match response {
        Response::Decline => {
            let mut next = consent.with_flag(by, false);
            next.finished = true;
            Outcome::Declined(next)
        }
        Response::Accept => {
            if consent.accepted_by(by) {
                return Outcome::Unchanged;
            }
            let next = consent.with_flag(by, true);
            if next.fully_accepted() {
                Outcome::Apply(Consent {
                    finished: true,
                    ..next
                })
            } else {
                Outcome::AwaitingCounterpart(next)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Applying a change to a contract
// ---------------------------------------------------------------------------

/// The mutable part of a contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContractState {
    pub terms: WorkTerms,
    pub terminated: bool,
}

/// Apply an accepted modification of `kind` with `proposed` terms.
pub fn apply_modification(
    kind: ModificationType,
    current: ContractState,
    proposed: WorkTerms,
) -> ContractState {
    match kind {
        ModificationType::Termination => ContractState {
            terms: current.terms,
            terminated: true,
        },
        ModificationType::Extension => ContractState {
            terms: WorkTerms {
                total_hours: proposed.total_hours,
                ..current.terms
            },
            terminated: current.terminated,
        },
        ModificationType::Modification => ContractState {
            terms: proposed,
            terminated: current.terminated,
        },
    }
}
