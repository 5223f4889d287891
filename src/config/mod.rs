//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → IssuerConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Every field has a default; no file means the built-in TestNet token
//! - Validation separates syntactic (serde) from semantic checks
//! - The recovery phrase is never part of the config

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    AlgodConfig, IssuanceConfig, IssuerConfig, LogFormat, ObservabilityConfig, TokenConfig,
};
