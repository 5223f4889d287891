//! Chain-specific types and error definitions.

use std::fmt;
use std::str::FromStr;

use data_encoding::BASE32_NOPAD;
use serde::Deserialize;
use sha2::{Digest, Sha512_256};
use thiserror::Error;

// Re-export AlgodConfig from config module to avoid duplication
pub use crate::config::schema::AlgodConfig;

/// Length of an ed25519 public key.
pub const PUBLIC_KEY_LEN: usize = 32;

/// Trailing bytes of SHA-512/256(pk) appended to an address.
const CHECKSUM_LEN: usize = 4;

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// Transport failure or unparseable node response.
    #[error("Node error: {0}")]
    Node(String),

    /// The node answered with a non-success status.
    #[error("Node rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Node request timed out.
    #[error("Node request timed out after {0} seconds")]
    Timeout(u64),

    /// Transaction was not confirmed within the round budget.
    #[error("Transaction not confirmed after {0} rounds")]
    ConfirmationTimeout(u64),

    /// Transaction was dropped from the pool after submission.
    #[error("Transaction pool error: {0}")]
    PoolError(String),

    /// Invalid recovery phrase or key material.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Malformed address string.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Transaction fields violate protocol limits.
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    /// Canonical msgpack encoding failed.
    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// An account address: the raw ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address(pub [u8; PUBLIC_KEY_LEN]);

impl Address {
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    fn checksum(&self) -> [u8; CHECKSUM_LEN] {
        let digest = Sha512_256::digest(self.0);
        let mut out = [0u8; CHECKSUM_LEN];
        out.copy_from_slice(&digest[digest.len() - CHECKSUM_LEN..]);
        out
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut raw = Vec::with_capacity(PUBLIC_KEY_LEN + CHECKSUM_LEN);
        raw.extend_from_slice(&self.0);
        raw.extend_from_slice(&self.checksum());
        f.write_str(&BASE32_NOPAD.encode(&raw))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = BlockchainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = BASE32_NOPAD
            .decode(s.trim().as_bytes())
            .map_err(|e| BlockchainError::InvalidAddress(format!("{}: {}", s, e)))?;

        if raw.len() != PUBLIC_KEY_LEN + CHECKSUM_LEN {
            return Err(BlockchainError::InvalidAddress(format!(
                "{}: decoded to {} bytes",
                s,
                raw.len()
            )));
        }

        let mut key = [0u8; PUBLIC_KEY_LEN];
        key.copy_from_slice(&raw[..PUBLIC_KEY_LEN]);
        let address = Address(key);

        if address.checksum()[..] != raw[PUBLIC_KEY_LEN..] {
            return Err(BlockchainError::InvalidAddress(format!("{}: bad checksum", s)));
        }
        Ok(address)
    }
}

/// Subset of `GET /v2/accounts/{address}`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AccountInfo {
    /// Balance in microAlgos.
    pub amount: u64,
}

/// `GET /v2/transactions/params`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct SuggestedParams {
    /// Fee per byte in microAlgos.
    pub fee: u64,
    pub min_fee: u64,
    pub last_round: u64,
    pub genesis_id: String,
    /// Base64-encoded genesis hash.
    pub genesis_hash: String,
}

/// `GET /v2/status` and `GET /v2/status/wait-for-block-after/{round}`.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct NodeStatus {
    pub last_round: u64,
}

/// Subset of `GET /v2/transactions/pending/{txid}`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct PendingTransactionInfo {
    #[serde(default)]
    pub confirmed_round: Option<u64>,
    #[serde(default)]
    pub asset_index: Option<u64>,
    #[serde(default)]
    pub pool_error: String,
}

impl PendingTransactionInfo {
    /// Interpret the node's view of the transaction.
    pub fn status(&self) -> ConfirmationStatus {
        match self.confirmed_round {
            Some(round) if round > 0 => ConfirmationStatus::Confirmed { round },
            _ if !self.pool_error.is_empty() => ConfirmationStatus::Failed(self.pool_error.clone()),
            _ => ConfirmationStatus::Pending,
        }
    }
}

/// Format a base-unit amount with the given number of decimals.
pub fn format_units(amount: u64, decimals: u32) -> String {
    let Some(divisor) = 10u64.checked_pow(decimals) else {
        return amount.to_string();
    };
    if decimals == 0 {
        return amount.to_string();
    }

    let whole = amount / divisor;
    let remainder = amount % divisor;
    if remainder == 0 {
        return whole.to_string();
    }

    let fraction = format!("{:0>width$}", remainder, width = decimals as usize);
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}

/// Transaction confirmation status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// Transaction is waiting in the pool.
    Pending,
    /// Transaction is included in a finalized block.
    Confirmed { round: u64 },
    /// Transaction was evicted from the pool.
    Failed(String),
}
