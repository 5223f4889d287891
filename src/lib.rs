//! ARC-20 token issuer library.

pub mod blockchain;
pub mod config;
pub mod issuance;
pub mod observability;

pub use config::schema::IssuerConfig;
pub use issuance::{IssuanceError, IssuanceRecord, IssuanceWorkflow};
