//! Signing identity and transaction signing.
//!
//! # Security
//! - The recovery phrase is read ONLY from an environment variable
//! - Keys are never logged or serialized; only the address is

use ed25519_dalek::{Signer, SigningKey};

use crate::blockchain::mnemonic::{seed_from_mnemonic, SEED_LEN};
use crate::blockchain::transaction::{AssetConfigTransaction, SignedTransaction};
use crate::blockchain::types::{Address, BlockchainError, BlockchainResult};

/// An ed25519 key pair and its derived address.
pub struct Wallet {
    signing_key: SigningKey,
    address: Address,
}

impl Wallet {
    /// Create a wallet from a raw 32-byte seed.
    pub fn from_seed(seed: &[u8; SEED_LEN]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        let address = Address(signing_key.verifying_key().to_bytes());
        Self { signing_key, address }
    }

    /// Derive the wallet from a 25-word recovery phrase.
    ///
    /// The same phrase always yields the same address.
    pub fn from_mnemonic(phrase: &str) -> BlockchainResult<Self> {
        let seed = seed_from_mnemonic(phrase)?;
        let wallet = Self::from_seed(&seed);

        tracing::debug!(address = %wallet.address, "Wallet derived from recovery phrase");
        Ok(wallet)
    }

    /// The account address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign a transaction. Fails if the transaction's sender is another account.
    pub fn sign(&self, tx: &AssetConfigTransaction) -> BlockchainResult<SignedTransaction> {
        if tx.sender != self.address {
            return Err(BlockchainError::Wallet(format!(
                "transaction sender {} does not match signing key {}",
                tx.sender, self.address
            )));
        }

        let message = tx.bytes_to_sign()?;
        let signature = self.signing_key.sign(&message);
        Ok(SignedTransaction::new(tx.clone(), signature.to_bytes()))
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
