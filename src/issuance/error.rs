//! Issuance error taxonomy.

use std::path::PathBuf;

use thiserror::Error;

use crate::blockchain::BlockchainError;

/// Every way an issuance run can end without a record.
#[derive(Debug, Error)]
pub enum IssuanceError {
    /// Recovery phrase missing or malformed.
    #[error("Invalid recovery phrase: {0}")]
    InvalidSecret(String),

    /// Creator balance is below the pre-flight threshold.
    #[error("Insufficient balance: {balance} microAlgos available, {required} required")]
    InsufficientBalance { balance: u64, required: u64 },

    /// Token fields violate protocol limits.
    #[error("Invalid token configuration: {0}")]
    Configuration(String),

    /// Transaction could not be signed.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Node rejected the transaction, before or after it entered the pool.
    #[error("Submission failed: {0}")]
    Submission(String),

    /// Transaction not confirmed within the round budget.
    #[error("Transaction not confirmed after {rounds} rounds")]
    ConfirmationTimeout { rounds: u64 },

    /// Confirmed transaction carries no created asset.
    #[error("Confirmed transaction {txid} has no asset index")]
    MissingAssetId { txid: String },

    /// Node unreachable or returned an unexpected response.
    #[error("Node error: {0}")]
    Node(#[source] BlockchainError),

    /// Issuance record could not be written.
    #[error("Failed to write {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for issuance operations.
pub type IssuanceResult<T> = Result<T, IssuanceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IssuanceError::InsufficientBalance {
            balance: 100_000,
            required: 500_000,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient balance: 100000 microAlgos available, 500000 required"
        );

        let err = IssuanceError::ConfirmationTimeout { rounds: 4 };
        assert!(err.to_string().contains("4 rounds"));

        let err = IssuanceError::Persist {
            path: PathBuf::from("out.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().starts_with("Failed to write out.json"));
    }
}
