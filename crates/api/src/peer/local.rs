use std::sync::Arc;

use async_trait::async_trait;
use gigbridge_db::models::contract::{Contract, CreateContract};
use gigbridge_db::AgreementStore;

use crate::engine::ContractRegistry;

use super::{ContractPeer, PeerError};

/// Contract peer for a process that also owns the contract records.
///
/// A draft tied to a request is stored and the request deleted in one
/// store transaction.
pub struct StoreContractPeer {
    registry: ContractRegistry,
}

impl StoreContractPeer {
    pub fn new(store: Arc<dyn AgreementStore>) -> Self {
        Self {
            registry: ContractRegistry::new(store),
        }
    }
}

#[async_trait]
impl ContractPeer for StoreContractPeer {
    async fn send_contract(&self, draft: &CreateContract) -> Result<Option<Contract>, PeerError> {
        let stored = match draft.source_service_id {
            Some(service_id) => self.registry.create_for_request(service_id, draft).await?,
            None => self.registry.create(draft).await?,
        };
        Ok(stored)
    }
}
