//! Peer notification: handing a freshly agreed contract to whoever owns
//! the contract records.
//!
//! Two implementations exist. [`StoreContractPeer`] writes into this
//! process's own [`AgreementStore`](gigbridge_db::AgreementStore);
//! [`HttpContractPeer`] posts to a remote contract service.

use async_trait::async_trait;
use gigbridge_db::models::contract::{Contract, CreateContract};
use gigbridge_db::StoreError;

mod http;
mod local;

pub use http::HttpContractPeer;
pub use local::StoreContractPeer;

/// Error type for contract hand-off failures.
#[derive(Debug, thiserror::Error)]
pub enum PeerError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote service returned a non-2xx status code.
    #[error("Contract service returned HTTP {0}")]
    HttpStatus(u16),

    /// The co-located contract store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PeerError {
    /// Whether the draft certainly did not reach the contract store.
    ///
    /// A timeout or an error status may arrive after the contract was
    /// committed, so those count as possibly delivered. A co-located store
    /// failure rolled its transaction back.
    pub fn never_delivered(&self) -> bool {
        match self {
            PeerError::Request(e) => e.is_connect(),
            PeerError::HttpStatus(_) => false,
            PeerError::Store(_) => true,
        }
    }
}

/// The owner of contract records.
#[async_trait]
pub trait ContractPeer: Send + Sync {
    /// Hand over a contract draft.
    ///
    /// `Ok(Some(_))` is a positive acknowledgement carrying the stored
    /// contract. `Ok(None)` means the peer refused the draft (for example an
    /// illegal duration) and stored nothing. Implementations must return the
    /// already stored contract when a draft with the same
    /// `source_service_id` is sent again.
    async fn send_contract(&self, draft: &CreateContract) -> Result<Option<Contract>, PeerError>;
}
