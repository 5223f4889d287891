//! Asset-configuration transactions: build, encode, identify, confirm.
//!
//! # Responsibilities
//! - Validate asset parameters against protocol limits
//! - Assemble the transaction from freshly fetched network parameters
//! - Compute the fee from the estimated signed size
//! - Wait for confirmation with a round-based budget

use base64::{engine::general_purpose::STANDARD, Engine as _};
use data_encoding::BASE32_NOPAD;
use sha2::{Digest, Sha512_256};

use crate::blockchain::client::NodeApi;
use crate::blockchain::encoding::{CanonicalMap, Value};
use crate::blockchain::types::{
    Address, BlockchainError, BlockchainResult, ConfirmationStatus, PendingTransactionInfo,
    SuggestedParams,
};

/// Rounds a transaction stays valid after its first valid round.
pub const VALIDITY_WINDOW: u64 = 1000;

/// Domain separation prefix for transaction hashing and signing.
const TX_TAG: &[u8] = b"TX";

pub const MAX_UNIT_NAME_LEN: usize = 8;
pub const MAX_ASSET_NAME_LEN: usize = 32;
pub const MAX_URL_LEN: usize = 96;
pub const MAX_DECIMALS: u32 = 19;

/// Parameters of the asset being created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetParams {
    /// Total supply in base units.
    pub total: u64,
    pub decimals: u32,
    pub default_frozen: bool,
    pub unit_name: String,
    pub asset_name: String,
    pub url: String,
    pub manager: Address,
    pub reserve: Address,
    pub freeze: Address,
    pub clawback: Address,
}

impl AssetParams {
    /// Check protocol limits. Returns the first violation.
    pub fn validate(&self) -> BlockchainResult<()> {
        if self.total == 0 {
            return Err(BlockchainError::InvalidTransaction(
                "total supply must be greater than zero".to_string(),
            ));
        }
        if self.decimals > MAX_DECIMALS {
            return Err(BlockchainError::InvalidTransaction(format!(
                "decimals {} exceeds maximum {}",
                self.decimals, MAX_DECIMALS
            )));
        }
        check_len("unit name", &self.unit_name, MAX_UNIT_NAME_LEN)?;
        check_len("asset name", &self.asset_name, MAX_ASSET_NAME_LEN)?;
        check_len("url", &self.url, MAX_URL_LEN)?;
        Ok(())
    }

    fn to_map(&self) -> CanonicalMap {
        let mut map = CanonicalMap::new();
        map.insert("an", Value::Str(self.asset_name.clone()))
            .insert("au", Value::Str(self.url.clone()))
            .insert("c", Value::Bin(self.clawback.as_bytes().to_vec()))
            .insert("dc", Value::Uint(u64::from(self.decimals)))
            .insert("df", Value::Bool(self.default_frozen))
            .insert("f", Value::Bin(self.freeze.as_bytes().to_vec()))
            .insert("m", Value::Bin(self.manager.as_bytes().to_vec()))
            .insert("r", Value::Bin(self.reserve.as_bytes().to_vec()))
            .insert("t", Value::Uint(self.total))
            .insert("un", Value::Str(self.unit_name.clone()));
        map
    }
}

fn check_len(field: &str, value: &str, max: usize) -> BlockchainResult<()> {
    if value.len() > max {
        return Err(BlockchainError::InvalidTransaction(format!(
            "{} is {} bytes, maximum is {}",
            field,
            value.len(),
            max
        )));
    }
    Ok(())
}

/// An unsigned asset-creation transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetConfigTransaction {
    pub sender: Address,
    /// Fee in microAlgos.
    pub fee: u64,
    pub first_valid: u64,
    pub last_valid: u64,
    pub genesis_id: String,
    pub genesis_hash: [u8; 32],
    pub params: AssetParams,
}

impl AssetConfigTransaction {
    /// Build an asset-creation transaction. Performs no network I/O.
    pub fn create(
        sender: Address,
        suggested: &SuggestedParams,
        params: &AssetParams,
    ) -> BlockchainResult<Self> {
        params.validate()?;

        let hash = STANDARD
            .decode(&suggested.genesis_hash)
            .map_err(|e| BlockchainError::InvalidTransaction(format!("genesis hash: {}", e)))?;
        let genesis_hash: [u8; 32] = hash.try_into().map_err(|_| {
            BlockchainError::InvalidTransaction("genesis hash must be 32 bytes".to_string())
        })?;

        let last_valid = suggested
            .last_round
            .checked_add(VALIDITY_WINDOW)
            .ok_or_else(|| {
                BlockchainError::InvalidTransaction(format!(
                    "last round {} leaves no validity window",
                    suggested.last_round
                ))
            })?;

        let mut tx = Self {
            sender,
            fee: 0,
            first_valid: suggested.last_round,
            last_valid,
            genesis_id: suggested.genesis_id.clone(),
            genesis_hash,
            params: params.clone(),
        };

        let size = tx.estimate_signed_size()?;
        tx.fee = suggested
            .fee
            .saturating_mul(size as u64)
            .max(suggested.min_fee);

        Ok(tx)
    }

    fn to_map(&self) -> CanonicalMap {
        let mut map = CanonicalMap::new();
        map.insert("apar", Value::Map(self.params.to_map()))
            .insert("fee", Value::Uint(self.fee))
            .insert("fv", Value::Uint(self.first_valid))
            .insert("gen", Value::Str(self.genesis_id.clone()))
            .insert("gh", Value::Bin(self.genesis_hash.to_vec()))
            .insert("lv", Value::Uint(self.last_valid))
            .insert("snd", Value::Bin(self.sender.as_bytes().to_vec()))
            .insert("type", Value::Str("acfg".to_string()));
        map
    }

    /// Canonical msgpack encoding of the unsigned transaction.
    pub fn encode(&self) -> BlockchainResult<Vec<u8>> {
        self.to_map().to_bytes()
    }

    /// `"TX"` followed by the encoded transaction.
    pub fn bytes_to_sign(&self) -> BlockchainResult<Vec<u8>> {
        let mut out = TX_TAG.to_vec();
        out.extend(self.encode()?);
        Ok(out)
    }

    /// Transaction ID as reported by the node.
    pub fn id(&self) -> BlockchainResult<String> {
        let digest = Sha512_256::digest(self.bytes_to_sign()?);
        Ok(BASE32_NOPAD.encode(&digest))
    }

    /// Upper bound on the signed size: widest fee encoding, dummy signature.
    fn estimate_signed_size(&self) -> BlockchainResult<usize> {
        let mut sized = self.clone();
        sized.fee = u64::MAX;
        let placeholder = SignedTransaction::new(sized, [0xff; 64]);
        Ok(placeholder.encode()?.len())
    }
}

/// A transaction with its ed25519 signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    transaction: AssetConfigTransaction,
    signature: [u8; 64],
}

impl SignedTransaction {
    pub fn new(transaction: AssetConfigTransaction, signature: [u8; 64]) -> Self {
        Self {
            transaction,
            signature,
        }
    }

    pub fn transaction(&self) -> &AssetConfigTransaction {
        &self.transaction
    }

    pub fn signature(&self) -> &[u8; 64] {
        &self.signature
    }

    pub fn id(&self) -> BlockchainResult<String> {
        self.transaction.id()
    }

    /// Wire format accepted by `POST /v2/transactions`.
    pub fn encode(&self) -> BlockchainResult<Vec<u8>> {
        let mut map = CanonicalMap::new();
        map.insert("sig", Value::Bin(self.signature.to_vec()))
            .insert("txn", Value::Map(self.transaction.to_map()));
        map.to_bytes()
    }
}

/// Wait until the node reports the transaction in a block.
///
/// Polls once per round, starting from the round after the node's current
/// one, for at most `wait_rounds` rounds.
pub async fn wait_for_confirmation<N: NodeApi>(
    node: &N,
    txid: &str,
    wait_rounds: u64,
) -> BlockchainResult<PendingTransactionInfo> {
    let start_round = node.status().await?.last_round.saturating_add(1);
    let deadline = start_round.saturating_add(wait_rounds);
    let mut current_round = start_round;

    while current_round < deadline {
        if let Some(info) = node.pending_transaction_info(txid).await? {
            match info.status() {
                ConfirmationStatus::Confirmed { round } => {
                    tracing::info!(txid = %txid, round = round, "Transaction confirmed");
                    return Ok(info);
                }
                ConfirmationStatus::Failed(reason) => {
                    return Err(BlockchainError::PoolError(reason));
                }
                ConfirmationStatus::Pending => {
                    tracing::debug!(txid = %txid, round = current_round, "Transaction pending");
                }
            }
        } else {
            tracing::debug!(txid = %txid, "Transaction not yet in pool");
        }

        node.status_after_block(current_round).await?;
        current_round = current_round.saturating_add(1);
    }

    Err(BlockchainError::ConfirmationTimeout(wait_rounds))
}
