//! The contract modification protocol.
//!
//! Either party proposes an EXTENSION, MODIFICATION, or TERMINATION of a
//! contract; the proposer's consent is recorded at creation. The change is
//! applied exactly once, when the counterpart accepts. A decline from
//! either side finishes the proposal without effect. Finished proposals are
//! inert.
//!
//! Every consent write is version guarded, and the final acceptance
//! finishes the proposal and rewrites the contract in one store
//! transaction, so two racing responders cannot both apply the change.

use std::sync::Arc;

use gigbridge_core::error::CoreError;
use gigbridge_core::modification::{self, Consent, ModificationType, Outcome, Response};
use gigbridge_core::party::Party;
use gigbridge_core::terms::{TermsChange, WorkTerms};
use gigbridge_core::types::DbId;
use gigbridge_db::models::contract::Contract;
use gigbridge_db::models::modification::{
    ContractModification, CreateContractModification, ProposeModification,
};
use gigbridge_db::AgreementStore;
use serde::Serialize;

use super::MAX_CAS_ATTEMPTS;
use crate::error::AppResult;

/// What a response to a proposal achieved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum Resolution {
    /// Both parties agreed; the contract as it is now.
    Applied { contract: Contract },
    /// Consent recorded, the counterpart still has to answer.
    Awaiting { modification: ContractModification },
    /// The proposal was declined and is finished.
    Declined { modification: ContractModification },
}

#[derive(Clone)]
pub struct ModificationProtocol {
    store: Arc<dyn AgreementStore>,
}

/// Proposed terms for `kind`, filling gaps from the contract.
///
/// `None` when the change set lacks a field the kind needs.
fn proposed_terms(kind: ModificationType, current: WorkTerms, change: &TermsChange) -> Option<WorkTerms> {
    match kind {
        ModificationType::Termination => Some(current),
        ModificationType::Extension => Some(WorkTerms {
            total_hours: change.total_hours?,
            hours_per_week: change.hours_per_week.unwrap_or(current.hours_per_week),
            price_per_hour: change.price_per_hour.unwrap_or(current.price_per_hour),
        }),
        ModificationType::Modification => Some(WorkTerms::new(
            change.hours_per_week?,
            change.total_hours?,
            change.price_per_hour?,
        )),
    }
}

impl ModificationProtocol {
    pub fn new(store: Arc<dyn AgreementStore>) -> Self {
        Self { store }
    }

    /// Propose a change to a contract on behalf of `input.proposed_by`.
    ///
    /// An unknown type string is a validation error. A missing or terminated
    /// contract, incomplete terms, or an illegal duration yield `None` and
    /// persist nothing.
    pub async fn propose(
        &self,
        input: &ProposeModification,
    ) -> AppResult<Option<ContractModification>> {
        let kind: ModificationType = input.modification_type.parse()?;

        let Some(contract) = self.store.find_contract(input.contract_id).await? else {
            tracing::info!(contract_id = input.contract_id, "Proposal refused: no such contract");
            return Ok(None);
        };
        if contract.terminated {
            tracing::info!(contract_id = input.contract_id, "Proposal refused: contract terminated");
            return Ok(None);
        }

        let Some(terms) = proposed_terms(kind, contract.terms(), &input.terms) else {
            tracing::info!(
                contract_id = input.contract_id,
                modification_type = kind.as_str(),
                "Proposal refused: incomplete terms"
            );
            return Ok(None);
        };
        if kind.requires_duration_check() && !terms.is_contractable() {
            tracing::info!(
                contract_id = input.contract_id,
                modification_type = kind.as_str(),
                hours_per_week = terms.hours_per_week,
                total_hours = terms.total_hours,
                "Proposal refused: illegal terms"
            );
            return Ok(None);
        }

        let created = self
            .store
            .create_modification(&CreateContractModification {
                contract_id: contract.contract_id,
                modification_type: kind,
                student_id: contract.student_id,
                company_id: contract.company_id,
                terms,
                consent: Consent::proposed_by(input.proposed_by),
            })
            .await?;
        tracing::info!(
            modification_id = created.modification_id,
            contract_id = created.contract_id,
            modification_type = kind.as_str(),
            proposed_by = %input.proposed_by,
            "Contract modification proposed"
        );
        Ok(Some(created))
    }

    /// Record `party_id`'s answer, acting as `by`.
    ///
    /// `None` when the proposal does not exist, `party_id` is not the `by`
    /// side of it, it is already finished, or the final acceptance had no
    /// effect (dangling or terminated contract, unreadable type, terms no
    /// longer legal). In the last case the proposal is still finished.
    pub async fn respond(
        &self,
        modification_id: DbId,
        by: Party,
        party_id: &str,
        response: Response,
    ) -> AppResult<Option<Resolution>> {
        for _ in 0..MAX_CAS_ATTEMPTS {
            let Some(current) = self.store.find_modification(modification_id).await? else {
                return Ok(None);
            };
            if current.party_id(by) != party_id {
                tracing::warn!(
                    modification_id,
                    party = %by,
                    party_id,
                    "Response from a party not on the contract ignored"
                );
                return Ok(None);
            }

            let next = match modification::respond(current.consent(), by, response) {
                Outcome::AlreadyFinished => {
                    tracing::warn!(
                        modification_id,
                        party = %by,
                        "Response to a finished modification ignored"
                    );
                    return Ok(None);
                }
                Outcome::Unchanged => {
                    return Ok(Some(Resolution::Awaiting {
                        modification: current,
                    }))
                }
                Outcome::AwaitingCounterpart(next) | Outcome::Declined(next) => next,
                Outcome::Apply(next) => match self.apply(&current, next).await? {
                    Some(resolution) => return Ok(resolution),
                    None => continue,
                },
            };

            let mut updated = current;
            updated.set_consent(next);
            let Some(saved) = self.store.update_modification(&updated).await? else {
                tracing::debug!(modification_id, "Modification changed concurrently, retrying");
                continue;
            };

            let resolution = if saved.finished {
                tracing::info!(modification_id, party = %by, "Contract modification declined");
                Resolution::Declined { modification: saved }
            } else {
                tracing::info!(modification_id, party = %by, "Contract modification accepted");
                Resolution::Awaiting { modification: saved }
            };
            return Ok(Some(resolution));
        }

        Err(CoreError::Conflict(format!(
            "Modification {modification_id} kept changing concurrently; gave up after {MAX_CAS_ATTEMPTS} attempts"
        ))
        .into())
    }

    /// Finish `current` with consent `next` and apply it to its contract.
    ///
    /// The outer `None` means a concurrent writer won and the caller must
    /// re-read. Otherwise the inner value is the caller's result.
    async fn apply(
        &self,
        current: &ContractModification,
        next: Consent,
    ) -> AppResult<Option<Option<Resolution>>> {
        let modification_id = current.modification_id;
        let mut finished = current.clone();
        finished.set_consent(next);

        let kind = match current.kind() {
            Ok(kind) => kind,
            Err(e) => {
                tracing::warn!(
                    modification_id,
                    modification_type = %current.modification_type,
                    error = %e,
                    "Unreadable modification type; finishing without effect"
                );
                return self.finish_without_effect(&finished).await;
            }
        };

        let contract = match self.store.find_contract(current.contract_id).await? {
            Some(contract) if !contract.terminated => contract,
            Some(_) => {
                tracing::warn!(
                    modification_id,
                    contract_id = current.contract_id,
                    "Contract already terminated; finishing without effect"
                );
                return self.finish_without_effect(&finished).await;
            }
            None => {
                tracing::warn!(
                    modification_id,
                    contract_id = current.contract_id,
                    "Dangling contract reference; finishing without effect"
                );
                return self.finish_without_effect(&finished).await;
            }
        };

        let state = modification::apply_modification(kind, contract.state(), current.terms());
        if kind.requires_duration_check() && !state.terms.is_contractable() {
            tracing::warn!(
                modification_id,
                contract_id = contract.contract_id,
                "Change is no longer legal for the contract; finishing without effect"
            );
            return self.finish_without_effect(&finished).await;
        }

        let mut target = contract;
        target.set_state(state);
        let Some((_, applied)) = self.store.finish_and_apply(&finished, &target).await? else {
            tracing::debug!(
                modification_id,
                contract_id = target.contract_id,
                "Modification or contract changed concurrently, retrying"
            );
            return Ok(None);
        };

        match applied {
            Some(contract) => {
                tracing::info!(
                    modification_id,
                    contract_id = contract.contract_id,
                    modification_type = kind.as_str(),
                    terminated = contract.terminated,
                    "Contract modification applied"
                );
                Ok(Some(Some(Resolution::Applied { contract })))
            }
            None => {
                tracing::warn!(
                    modification_id,
                    contract_id = target.contract_id,
                    "Contract vanished or was terminated while applying; modification finished"
                );
                Ok(Some(None))
            }
        }
    }

    async fn finish_without_effect(
        &self,
        finished: &ContractModification,
    ) -> AppResult<Option<Option<Resolution>>> {
        Ok(self
            .store
            .update_modification(finished)
            .await?
            .map(|_| None))
    }

    /// Open proposals where the counterpart of `party` accepted and
    /// `party_id` has to answer.
    pub async fn awaiting(&self, party: Party, party_id: &str) -> AppResult<Vec<ContractModification>> {
        Ok(self.store.list_modifications_awaiting(party, party_id).await?)
    }

    /// Every proposal on contracts where `party_id` is the `party` side.
    pub async fn involving(&self, party: Party, party_id: &str) -> AppResult<Vec<ContractModification>> {
        Ok(self.store.list_modifications_involving(party, party_id).await?)
    }

    pub async fn get(&self, modification_id: DbId) -> AppResult<Option<ContractModification>> {
        Ok(self.store.find_modification(modification_id).await?)
    }
}
