//! Algod REST client with timeout and error handling.
//!
//! # Responsibilities
//! - Query account state and suggested transaction parameters
//! - Submit signed transactions
//! - Poll pending transactions and node status
//! - Bound every request with a timeout

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::time::timeout;
use url::Url;

use crate::blockchain::transaction::SignedTransaction;
use crate::blockchain::types::{
    AccountInfo, Address, AlgodConfig, BlockchainError, BlockchainResult, NodeStatus,
    PendingTransactionInfo, SuggestedParams,
};

/// Header carrying the node API token.
pub const API_TOKEN_HEADER: &str = "X-Algo-API-Token";

/// Operations the issuer needs from a node.
#[allow(async_fn_in_trait)]
pub trait NodeApi {
    /// `GET /v2/accounts/{address}`.
    async fn account_info(&self, address: &Address) -> BlockchainResult<AccountInfo>;

    /// `GET /v2/transactions/params`.
    async fn suggested_params(&self) -> BlockchainResult<SuggestedParams>;

    /// `POST /v2/transactions`. Returns the transaction ID.
    async fn send_transaction(&self, signed: &SignedTransaction) -> BlockchainResult<String>;

    /// `GET /v2/transactions/pending/{txid}`. `None` when the node does not know it.
    async fn pending_transaction_info(
        &self,
        txid: &str,
    ) -> BlockchainResult<Option<PendingTransactionInfo>>;

    /// `GET /v2/status`.
    async fn status(&self) -> BlockchainResult<NodeStatus>;

    /// `GET /v2/status/wait-for-block-after/{round}`.
    async fn status_after_block(&self, round: u64) -> BlockchainResult<NodeStatus>;
}

#[derive(Deserialize)]
struct SubmitResponse {
    #[serde(rename = "txId")]
    tx_id: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: String,
}

/// HTTP client for an algod node.
#[derive(Clone)]
pub struct AlgodClient {
    http: Client,
    base_url: Url,
    api_token: String,
    timeout_duration: Duration,
}

impl AlgodClient {
    /// Create a new client. No request is made until first use.
    pub fn new(config: &AlgodConfig) -> BlockchainResult<Self> {
        let mut base_url: Url = config.url.parse().map_err(|e| {
            BlockchainError::Node(format!("Invalid node URL '{}': {}", config.url, e))
        })?;
        // Relative joins would otherwise drop the last path segment
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        tracing::info!(
            node_url = %base_url,
            timeout_secs = config.request_timeout_secs,
            "Algod client initialized"
        );

        Ok(Self {
            http: Client::new(),
            base_url,
            api_token: config.api_token.clone(),
            timeout_duration: Duration::from_secs(config.request_timeout_secs),
        })
    }

    fn endpoint(&self, path: &str) -> BlockchainResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| BlockchainError::Node(format!("Invalid endpoint '{}': {}", path, e)))
    }

    fn request(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> BlockchainResult<reqwest::RequestBuilder> {
        let mut builder = self.http.request(method, self.endpoint(path)?);
        if !self.api_token.is_empty() {
            builder = builder.header(API_TOKEN_HEADER, &self.api_token);
        }
        Ok(builder)
    }

    async fn with_timeout<T>(
        &self,
        fut: impl Future<Output = BlockchainResult<T>>,
    ) -> BlockchainResult<T> {
        match timeout(self.timeout_duration, fut).await {
            Ok(result) => result,
            Err(_) => Err(BlockchainError::Timeout(self.timeout_duration.as_secs())),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> BlockchainResult<T> {
        let builder = self.request(reqwest::Method::GET, path)?;
        self.with_timeout(async {
            let response = builder.send().await.map_err(transport_error)?;
            decode(response).await
        })
        .await
    }
}

impl NodeApi for AlgodClient {
    async fn account_info(&self, address: &Address) -> BlockchainResult<AccountInfo> {
        self.get_json(&format!("v2/accounts/{}", address)).await
    }

    async fn suggested_params(&self) -> BlockchainResult<SuggestedParams> {
        self.get_json("v2/transactions/params").await
    }

    async fn send_transaction(&self, signed: &SignedTransaction) -> BlockchainResult<String> {
        let body = signed.encode()?;
        let builder = self
            .request(reqwest::Method::POST, "v2/transactions")?
            .header(reqwest::header::CONTENT_TYPE, "application/x-binary")
            .body(body);

        let submitted: SubmitResponse = self
            .with_timeout(async {
                let response = builder.send().await.map_err(transport_error)?;
                decode(response).await
            })
            .await?;

        Ok(submitted.tx_id)
    }

    async fn pending_transaction_info(
        &self,
        txid: &str,
    ) -> BlockchainResult<Option<PendingTransactionInfo>> {
        match self.get_json(&format!("v2/transactions/pending/{}", txid)).await {
            Ok(info) => Ok(Some(info)),
            Err(BlockchainError::Rejected { status, .. })
                if status == StatusCode::NOT_FOUND.as_u16() =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn status(&self) -> BlockchainResult<NodeStatus> {
        self.get_json("v2/status").await
    }

    async fn status_after_block(&self, round: u64) -> BlockchainResult<NodeStatus> {
        self.get_json(&format!("v2/status/wait-for-block-after/{}", round))
            .await
    }
}

fn transport_error(e: reqwest::Error) -> BlockchainError {
    BlockchainError::Node(e.to_string())
}

/// Turn a response into `T`, or a `Rejected` error carrying the node's message.
async fn decode<T: DeserializeOwned>(response: Response) -> BlockchainResult<T> {
    let status = response.status();
    let text = response.text().await.map_err(transport_error)?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorResponse>(&text)
            .map(|e| e.message)
            .unwrap_or(text);
        return Err(BlockchainError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&text)
        .map_err(|e| BlockchainError::Node(format!("Unexpected response body: {}", e)))
}

impl std::fmt::Debug for AlgodClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgodClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}
