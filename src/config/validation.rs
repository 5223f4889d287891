//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate token fields against protocol limits
//! - Validate value ranges (timeouts > 0, wait rounds within the validity window)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: IssuerConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::blockchain::transaction::{
    MAX_ASSET_NAME_LEN, MAX_DECIMALS, MAX_UNIT_NAME_LEN, MAX_URL_LEN, VALIDITY_WINDOW,
};
use crate::config::schema::IssuerConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Check every field and collect all problems.
pub fn validate_config(config: &IssuerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if url::Url::parse(&config.algod.url).is_err() {
        errors.push(ValidationError::new("algod.url", "not a valid URL"));
    }
    if config.algod.request_timeout_secs == 0 {
        errors.push(ValidationError::new("algod.request_timeout_secs", "must be > 0"));
    }

    let token = &config.token;
    if token.human_supply == 0 {
        errors.push(ValidationError::new("token.human_supply", "must be > 0"));
    }
    if token.decimals > MAX_DECIMALS {
        errors.push(ValidationError::new(
            "token.decimals",
            format!("must be <= {}", MAX_DECIMALS),
        ));
    } else if token.total_base_units().is_none() {
        errors.push(ValidationError::new(
            "token.human_supply",
            "supply in base units overflows u64",
        ));
    }
    if token.unit_name.len() > MAX_UNIT_NAME_LEN {
        errors.push(ValidationError::new(
            "token.unit_name",
            format!("at most {} bytes", MAX_UNIT_NAME_LEN),
        ));
    }
    if token.asset_name.len() > MAX_ASSET_NAME_LEN {
        errors.push(ValidationError::new(
            "token.asset_name",
            format!("at most {} bytes", MAX_ASSET_NAME_LEN),
        ));
    }
    if token.url.len() > MAX_URL_LEN {
        errors.push(ValidationError::new(
            "token.url",
            format!("at most {} bytes", MAX_URL_LEN),
        ));
    }

    if config.issuance.wait_rounds == 0 {
        errors.push(ValidationError::new("issuance.wait_rounds", "must be > 0"));
    } else if config.issuance.wait_rounds > VALIDITY_WINDOW {
        // The transaction expires after this many rounds anyway.
        errors.push(ValidationError::new(
            "issuance.wait_rounds",
            format!("at most {}", VALIDITY_WINDOW),
        ));
    }
    if config.issuance.output_path.trim().is_empty() {
        errors.push(ValidationError::new("issuance.output_path", "must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
