//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment variable (recovery phrase)
//!     → mnemonic.rs (phrase → ed25519 seed)
//!     → wallet.rs (key, address, signing)
//!     → transaction.rs (build, encode, confirm)
//!     → client.rs (algod REST calls with timeouts)
//! ```
//!
//! # Security Constraints
//! - Recovery phrase ONLY from the environment
//! - Never log keys or the phrase
//! - All node calls have configurable timeouts

pub mod client;
pub mod encoding;
pub mod mnemonic;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{AlgodClient, NodeApi};
pub use transaction::{AssetConfigTransaction, AssetParams, SignedTransaction};
pub use types::{Address, AlgodConfig, BlockchainError, BlockchainResult};
pub use wallet::Wallet;
