//! Token issuance subsystem.
//!
//! # Data Flow
//! ```text
//! ISSUER_MNEMONIC + IssuerConfig
//!     → workflow.rs (derive, gate, build, sign, submit, confirm)
//!     → record.rs (arc20_token_info.json)
//!     → error.rs (one tagged failure per run)
//! ```

pub mod error;
pub mod record;
pub mod workflow;

pub use error::{IssuanceError, IssuanceResult};
pub use record::IssuanceRecord;
pub use workflow::{asset_params, IssuanceState, IssuanceWorkflow};

/// Environment variable holding the 25-word recovery phrase.
pub const MNEMONIC_ENV_VAR: &str = "ISSUER_MNEMONIC";

/// Read the recovery phrase from `ISSUER_MNEMONIC`.
pub fn secret_from_env() -> IssuanceResult<String> {
    std::env::var(MNEMONIC_ENV_VAR).map_err(|_| {
        IssuanceError::InvalidSecret(format!(
            "Environment variable {} not set",
            MNEMONIC_ENV_VAR
        ))
    })
}
