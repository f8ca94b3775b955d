//! HTTP transport to the ledger network.
//!
//! Submissions and queries go to the client organization's endorsing peer;
//! the liveness probe checks every peer in the profile. The commit timeout
//! is owned by the caller ([`crate::client::LedgerClient::submit`]), so the
//! submit request itself carries no per-request deadline.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared_types::{ConnectError, EvalError, ResolveError, SubmitError};

use crate::domain::profile::ConnectionProfile;
use crate::ports::rpc::{LedgerRpc, TxProof};

/// How long the liveness probe waits per peer.
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// `LedgerRpc` over HTTP peer endpoints.
pub struct HttpLedgerRpc {
    http: reqwest::Client,
    endorser: String,
    peers: Vec<String>,
    channel: String,
    chaincode: String,
    query_timeout: Duration,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitRequest<'a> {
    transaction_id: &'a str,
    function: &'a str,
    args: &'a [String],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EvaluateRequest<'a> {
    function: &'a str,
    args: &'a [String],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PayloadResponse {
    payload: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionResponse {
    block_number: u64,
    validation_code: i32,
    #[serde(default)]
    block_hash: Option<String>,
    #[serde(default)]
    payload: String,
    timestamp: DateTime<Utc>,
}

impl HttpLedgerRpc {
    /// Build the transport for the given profile.
    pub fn new(profile: &ConnectionProfile, query_timeout: Duration) -> Result<Self, ConnectError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ConnectError::Profile(format!("http client: {}", e)))?;

        Ok(Self {
            http,
            endorser: profile.own_organization().peer.url.clone(),
            peers: profile.peers().map(|p| p.url.clone()).collect(),
            channel: profile.channel.clone(),
            chaincode: profile.chaincode.clone(),
            query_timeout,
        })
    }

    fn chaincode_url(&self, suffix: &str) -> String {
        format!(
            "{}/api/channels/{}/chaincodes/{}/{}",
            self.endorser, self.channel, self.chaincode, suffix
        )
    }
}

#[async_trait]
impl LedgerRpc for HttpLedgerRpc {
    async fn submit(
        &self,
        transaction_id: &str,
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>, SubmitError> {
        let request = SubmitRequest {
            transaction_id,
            function,
            args,
        };

        let response = self
            .http
            .post(self.chaincode_url("transactions"))
            .json(&request)
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_client_error() {
            let reason = response.text().await.unwrap_or_else(|_| status.to_string());
            return Err(SubmitError::EndorsementRejected(reason));
        }
        if !status.is_success() {
            return Err(SubmitError::Transport(format!(
                "peer returned {}",
                status
            )));
        }

        let body: PayloadResponse = response
            .json()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;
        Ok(body.payload.into_bytes())
    }

    async fn evaluate(&self, function: &str, args: &[String]) -> Result<Vec<u8>, EvalError> {
        let request = EvaluateRequest { function, args };

        let response = self
            .http
            .post(self.chaincode_url("query"))
            .timeout(self.query_timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| EvalError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_client_error() {
            let reason = response.text().await.unwrap_or_else(|_| status.to_string());
            return Err(EvalError::QueryRejected(reason));
        }
        if !status.is_success() {
            return Err(EvalError::Transport(format!("peer returned {}", status)));
        }

        let body: PayloadResponse = response
            .json()
            .await
            .map_err(|e| EvalError::Transport(e.to_string()))?;
        Ok(body.payload.into_bytes())
    }

    async fn query_transaction(&self, transaction_id: &str) -> Result<TxProof, ResolveError> {
        let url = format!(
            "{}/api/channels/{}/transactions/{}",
            self.endorser, self.channel, transaction_id
        );

        let response = self
            .http
            .get(url)
            .timeout(self.query_timeout)
            .send()
            .await
            .map_err(|e| ResolveError::Transport(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ResolveError::NotVisible(transaction_id.to_string()));
        }
        if !response.status().is_success() {
            return Err(ResolveError::Transport(format!(
                "peer returned {}",
                response.status()
            )));
        }

        let body: TransactionResponse = response
            .json()
            .await
            .map_err(|e| ResolveError::Transport(e.to_string()))?;

        Ok(TxProof {
            block_number: body.block_number,
            validation_code: body.validation_code,
            block_hash: body.block_hash,
            payload: body.payload.into_bytes(),
            timestamp: body.timestamp,
        })
    }

    async fn ping(&self) -> bool {
        for peer in &self.peers {
            let url = format!("{}/healthz", peer);
            let reachable = self
                .http
                .get(&url)
                .timeout(PROBE_TIMEOUT)
                .send()
                .await
                .map(|r| r.status().is_success())
                .unwrap_or(false);
            if reachable {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chaincode_url_shape() {
        let profile = ConnectionProfile::default();
        let rpc = HttpLedgerRpc::new(&profile, Duration::from_secs(5)).unwrap();
        assert_eq!(
            rpc.chaincode_url("transactions"),
            "http://localhost:7051/api/channels/ayurveda-channel/chaincodes/herbtraceability/transactions"
        );
    }

    #[tokio::test]
    async fn test_ping_degrades_to_false_without_network() {
        let mut profile = ConnectionProfile::default();
        // Point every peer at a port nothing listens on.
        for org in &mut profile.organizations {
            org.peer.url = "http://127.0.0.1:1".to_string();
        }
        let rpc = HttpLedgerRpc::new(&profile, Duration::from_secs(1)).unwrap();
        assert!(!rpc.ping().await);
    }
}
