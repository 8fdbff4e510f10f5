//! Contract hand-off to a remote contract service over HTTP.
//!
//! The draft is posted as JSON to `{base}/api/v1/contracts`; the service
//! answers with `{ "data": Contract | null }`. Only failures where the
//! request never reached the service are retried; drafts without a
//! `sourceServiceId` are not idempotent on the service side.

use std::time::Duration;

use async_trait::async_trait;
use gigbridge_db::models::contract::{Contract, CreateContract};
use reqwest::StatusCode;

use crate::response::DataResponse;

use super::{ContractPeer, PeerError};

/// Backoff between attempts; the last entry repeats if more retries are configured.
const RETRY_DELAYS: [Duration; 3] = [
    Duration::from_millis(250),
    Duration::from_millis(500),
    Duration::from_secs(1),
];

pub struct HttpContractPeer {
    client: reqwest::Client,
    endpoint: String,
    retries: u32,
}

impl HttpContractPeer {
    /// Build a peer for the service at `base_url`.
    pub fn new(base_url: &str, timeout: Duration, retries: u32) -> Result<Self, PeerError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/api/v1/contracts", base_url.trim_end_matches('/')),
            retries,
        })
    }

    /// Make a single delivery attempt.
    async fn try_send(&self, draft: &CreateContract) -> Result<Option<Contract>, PeerError> {
        let response = self.client.post(&self.endpoint).json(draft).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PeerError::HttpStatus(status.as_u16()));
        }

        let body: DataResponse<Option<Contract>> = response.json().await?;
        Ok(body.data)
    }
}

/// Whether the request can be repeated without risking a duplicate contract.
fn is_retryable(err: &PeerError) -> bool {
    match err {
        PeerError::Request(e) => e.is_connect(),
        PeerError::HttpStatus(code) => *code == StatusCode::SERVICE_UNAVAILABLE.as_u16(),
        PeerError::Store(_) => false,
    }
}

#[async_trait]
impl ContractPeer for HttpContractPeer {
    async fn send_contract(&self, draft: &CreateContract) -> Result<Option<Contract>, PeerError> {
        let mut attempt: u32 = 0;
        loop {
            match self.try_send(draft).await {
                Ok(ack) => return Ok(ack),
                Err(e) if attempt < self.retries && is_retryable(&e) => {
                    let delay = RETRY_DELAYS[(attempt as usize).min(RETRY_DELAYS.len() - 1)];
                    tracing::warn!(
                        attempt = attempt + 1,
                        endpoint = %self.endpoint,
                        error = %e,
                        "Contract hand-off attempt failed, retrying"
                    );
                    attempt += 1;
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    tracing::error!(
                        attempts = attempt + 1,
                        endpoint = %self.endpoint,
                        error = %e,
                        "Contract hand-off failed"
                    );
                    return Err(e);
                }
            }
        }
    }
}
