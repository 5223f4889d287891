//! Configuration schema definitions.
//!
//! Every default below is the value the issuer runs with when no config file
//! is given. All types derive Serde traits for deserialization from TOML.

use serde::{Deserialize, Serialize};

/// Root configuration for the issuer.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct IssuerConfig {
    /// Node connection settings.
    pub algod: AlgodConfig,

    /// The token being issued.
    pub token: TokenConfig,

    /// Workflow thresholds and output.
    pub issuance: IssuanceConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Algod node connection.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct AlgodConfig {
    /// REST endpoint (public Algonode TestNet by default).
    pub url: String,

    /// API token; empty for public endpoints.
    pub api_token: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for AlgodConfig {
    fn default() -> Self {
        Self {
            url: "https://testnet-api.algonode.cloud".to_string(),
            api_token: String::new(),
            request_timeout_secs: 10,
        }
    }
}

/// Token parameters, in human units.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct TokenConfig {
    /// Supply in whole tokens; scaled by `10^decimals` on chain.
    pub human_supply: u64,
    pub decimals: u32,
    pub default_frozen: bool,
    pub unit_name: String,
    pub asset_name: String,
    pub url: String,
}

impl TokenConfig {
    /// Total supply in base units, `None` on overflow.
    pub fn total_base_units(&self) -> Option<u64> {
        10u64
            .checked_pow(self.decimals)
            .and_then(|scale| self.human_supply.checked_mul(scale))
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            human_supply: 1_000_000,
            decimals: 2,
            default_frozen: false,
            unit_name: "STRM".to_string(),
            asset_name: "StreamFi Payment Token".to_string(),
            url: "https://streamfi.algorand.network/token".to_string(),
        }
    }
}

/// Workflow settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct IssuanceConfig {
    /// Minimum creator balance in microAlgos (0.5 ALGO).
    pub min_balance_micro: u64,

    /// Rounds to wait for confirmation.
    pub wait_rounds: u64,

    /// Where the issuance record is written.
    pub output_path: String,

    /// Explorer URL prefix; the asset ID is appended.
    pub explorer_asset_url: String,

    /// TestNet dispenser, shown when funds are short.
    pub dispenser_url: String,
}

impl Default for IssuanceConfig {
    fn default() -> Self {
        Self {
            min_balance_micro: 500_000,
            wait_rounds: 4,
            output_path: "arc20_token_info.json".to_string(),
            explorer_asset_url: "https://testnet.explorer.perawallet.app/asset/".to_string(),
            dispenser_url: "https://bank.testnet.algorand.network/".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Filter directive, overridden by `RUST_LOG`.
    pub log_level: String,

    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "arc20_issuer=info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_issued_token() {
        let config = IssuerConfig::default();
        assert_eq!(config.token.total_base_units(), Some(100_000_000));
        assert_eq!(config.token.unit_name, "STRM");
        assert_eq!(config.issuance.min_balance_micro, 500_000);
        assert_eq!(config.issuance.wait_rounds, 4);
        assert_eq!(config.issuance.output_path, "arc20_token_info.json");
        assert!(config.algod.api_token.is_empty());
    }

    #[test]
    fn test_total_overflow() {
        let token = TokenConfig {
            human_supply: u64::MAX,
            decimals: 1,
            ..TokenConfig::default()
        };
        assert_eq!(token.total_base_units(), None);

        let token = TokenConfig {
            decimals: 25,
            ..TokenConfig::default()
        };
        assert_eq!(token.total_base_units(), None);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: IssuerConfig = toml::from_str(
            r#"
            [token]
            unit_name = "DEMO"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.token.unit_name, "DEMO");
        assert_eq!(config.token.decimals, 2);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.algod, AlgodConfig::default());
    }
}
