use std::sync::Arc;

use gigbridge_db::AgreementStore;

use crate::config::ServerConfig;
use crate::engine::{Amendments, ContractRegistry, ModificationProtocol, RequestMatching};
use crate::peer::ContractPeer;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (every service holds its collaborators behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub store: Arc<dyn AgreementStore>,
    pub matching: RequestMatching,
    pub amendments: Amendments,
    pub modifications: ModificationProtocol,
    pub contracts: ContractRegistry,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        store: Arc<dyn AgreementStore>,
        peer: Arc<dyn ContractPeer>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            matching: RequestMatching::new(Arc::clone(&store), peer),
            amendments: Amendments::new(Arc::clone(&store)),
            modifications: ModificationProtocol::new(Arc::clone(&store)),
            contracts: ContractRegistry::new(Arc::clone(&store)),
            store,
        }
    }
}
