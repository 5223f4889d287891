//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use arc20_issuer::blockchain::mnemonic::mnemonic_from_seed;
use arc20_issuer::blockchain::transaction::SignedTransaction;
use arc20_issuer::blockchain::types::{
    AccountInfo, Address, BlockchainError, BlockchainResult, NodeStatus, PendingTransactionInfo,
    SuggestedParams,
};
use arc20_issuer::blockchain::{NodeApi, Wallet};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const GENESIS_HASH: &str = "SGO1GKSzyE7IEPItTxCByw9x8FmnrCDexi9/cOUJOiI=";

/// A deterministic test identity and its phrase.
pub fn test_wallet() -> (Wallet, String) {
    let seed = [11u8; 32];
    (Wallet::from_seed(&seed), mnemonic_from_seed(&seed))
}

pub fn suggested_params() -> SuggestedParams {
    SuggestedParams {
        fee: 0,
        min_fee: 1000,
        last_round: 40_000_000,
        genesis_id: "testnet-v1.0".to_string(),
        genesis_hash: GENESIS_HASH.to_string(),
    }
}

/// How the mock node answers pending-transaction queries.
#[derive(Debug, Clone)]
pub enum Confirmation {
    /// Confirmed on the given poll (1-based) with this asset index.
    After { polls: u32, asset_index: Option<u64> },
    /// Never leaves the pool.
    Never,
    /// Evicted from the pool with this reason.
    PoolError(String),
}

/// Scripted in-memory node.
pub struct MockNode {
    pub balance: u64,
    pub confirmation: Confirmation,
    pub submit_error: Option<String>,
    pub submissions: Mutex<Vec<SignedTransaction>>,
    pub account_queries: Mutex<Vec<Address>>,
    pub params_calls: AtomicU32,
    pub pending_polls: AtomicU32,
    pub round: AtomicU64,
}

impl MockNode {
    pub fn new(balance: u64, confirmation: Confirmation) -> Self {
        Self {
            balance,
            confirmation,
            submit_error: None,
            submissions: Mutex::new(Vec::new()),
            account_queries: Mutex::new(Vec::new()),
            params_calls: AtomicU32::new(0),
            pending_polls: AtomicU32::new(0),
            round: AtomicU64::new(suggested_params().last_round),
        }
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }
}

impl NodeApi for MockNode {
    async fn account_info(&self, address: &Address) -> BlockchainResult<AccountInfo> {
        self.account_queries.lock().unwrap().push(*address);
        Ok(AccountInfo {
            amount: self.balance,
        })
    }

    async fn suggested_params(&self) -> BlockchainResult<SuggestedParams> {
        self.params_calls.fetch_add(1, Ordering::SeqCst);
        Ok(suggested_params())
    }

    async fn send_transaction(&self, signed: &SignedTransaction) -> BlockchainResult<String> {
        if let Some(message) = &self.submit_error {
            return Err(BlockchainError::Rejected {
                status: 400,
                message: message.clone(),
            });
        }
        self.submissions.lock().unwrap().push(signed.clone());
        signed.id()
    }

    async fn pending_transaction_info(
        &self,
        _txid: &str,
    ) -> BlockchainResult<Option<PendingTransactionInfo>> {
        let poll = self.pending_polls.fetch_add(1, Ordering::SeqCst) + 1;
        let info = match &self.confirmation {
            Confirmation::After { polls, asset_index } if poll >= *polls => PendingTransactionInfo {
                confirmed_round: Some(self.round.load(Ordering::SeqCst)),
                asset_index: *asset_index,
                pool_error: String::new(),
            },
            Confirmation::PoolError(reason) => PendingTransactionInfo {
                pool_error: reason.clone(),
                ..PendingTransactionInfo::default()
            },
            _ => PendingTransactionInfo::default(),
        };
        Ok(Some(info))
    }

    async fn status(&self) -> BlockchainResult<NodeStatus> {
        Ok(NodeStatus {
            last_round: self.round.load(Ordering::SeqCst),
        })
    }

    async fn status_after_block(&self, round: u64) -> BlockchainResult<NodeStatus> {
        self.round.store(round + 1, Ordering::SeqCst);
        Ok(NodeStatus {
            last_round: round + 1,
        })
    }
}

/// A request as seen by the programmable backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Start an HTTP backend on an ephemeral port that answers each request with
/// `f(request)` as `(status, json body)`. Returns its address and a log of
/// the requests it served.
pub async fn start_programmable_backend<F, Fut>(
    f: F,
) -> (SocketAddr, Arc<Mutex<Vec<RecordedRequest>>>)
where
    F: Fn(RecordedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let served = log.clone();
    tokio::spawn(async move {
        loop {
            let (mut socket, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => break,
            };
            let f = f.clone();
            let served = served.clone();
            tokio::spawn(async move {
                let Some(request) = read_request(&mut socket).await else {
                    return;
                };
                served.lock().unwrap().push(request.clone());

                let (status, body) = f(request).await;
                let status_text = match status {
                    200 => "200 OK",
                    400 => "400 Bad Request",
                    404 => "404 Not Found",
                    500 => "500 Internal Server Error",
                    _ => "200 OK",
                };
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, log)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split(' ');
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buf[header_end..].to_vec();
    while body.len() < content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(RecordedRequest {
        method,
        path,
        headers,
        body,
    })
}
