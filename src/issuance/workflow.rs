//! The token issuance workflow.
//!
//! # Steps
//! ```text
//! Idle → Connected → IdentityDerived → BalanceChecked ─(short)→ Aborted
//!     → ParametersFetched → TransactionBuilt → Signed → Submitted
//!     → Confirmed ─(no block)→ TimedOut
//!     → ResultExtracted → Persisted
//! any step ─(error)→ Failed
//! ```
//!
//! Exactly one submission per run; nothing is retried.

use std::fmt;
use std::path::PathBuf;

use crate::blockchain::transaction::{wait_for_confirmation, AssetConfigTransaction, AssetParams};
use crate::blockchain::types::format_units;
use crate::blockchain::{Address, AlgodClient, BlockchainError, NodeApi, Wallet};
use crate::config::{IssuanceConfig, IssuerConfig, TokenConfig};
use crate::issuance::error::{IssuanceError, IssuanceResult};
use crate::issuance::record::IssuanceRecord;

/// Decimals of the native currency (microAlgos per ALGO).
const NATIVE_DECIMALS: u32 = 6;

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssuanceState {
    Idle,
    Connected,
    IdentityDerived,
    BalanceChecked,
    ParametersFetched,
    TransactionBuilt,
    Signed,
    Submitted,
    Confirmed,
    ResultExtracted,
    Persisted,
    Aborted,
    TimedOut,
    Failed,
}

impl IssuanceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssuanceState::Idle => "idle",
            IssuanceState::Connected => "connected",
            IssuanceState::IdentityDerived => "identity_derived",
            IssuanceState::BalanceChecked => "balance_checked",
            IssuanceState::ParametersFetched => "parameters_fetched",
            IssuanceState::TransactionBuilt => "transaction_built",
            IssuanceState::Signed => "signed",
            IssuanceState::Submitted => "submitted",
            IssuanceState::Confirmed => "confirmed",
            IssuanceState::ResultExtracted => "result_extracted",
            IssuanceState::Persisted => "persisted",
            IssuanceState::Aborted => "aborted",
            IssuanceState::TimedOut => "timed_out",
            IssuanceState::Failed => "failed",
        }
    }

    /// No further transitions happen from a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            IssuanceState::Persisted
                | IssuanceState::Aborted
                | IssuanceState::TimedOut
                | IssuanceState::Failed
        )
    }
}

impl fmt::Display for IssuanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the on-chain asset parameters with every admin role held by `creator`.
pub fn asset_params(token: &TokenConfig, creator: Address) -> IssuanceResult<AssetParams> {
    let total = token.total_base_units().ok_or_else(|| {
        IssuanceError::Configuration(format!(
            "supply {} with {} decimals overflows u64",
            token.human_supply, token.decimals
        ))
    })?;

    Ok(AssetParams {
        total,
        decimals: token.decimals,
        default_frozen: token.default_frozen,
        unit_name: token.unit_name.clone(),
        asset_name: token.asset_name.clone(),
        url: token.url.clone(),
        manager: creator,
        reserve: creator,
        freeze: creator,
        clawback: creator,
    })
}

/// One issuance run against a node.
pub struct IssuanceWorkflow<N: NodeApi> {
    node: N,
    token: TokenConfig,
    issuance: IssuanceConfig,
    state: IssuanceState,
}

impl IssuanceWorkflow<AlgodClient> {
    /// Bind a workflow to the configured algod endpoint.
    pub fn connect(config: &IssuerConfig) -> IssuanceResult<Self> {
        let client = AlgodClient::new(&config.algod).map_err(IssuanceError::Node)?;
        let mut workflow = Self::new(client, config.token.clone(), config.issuance.clone());
        workflow.advance(IssuanceState::Connected);
        Ok(workflow)
    }
}

impl<N: NodeApi> IssuanceWorkflow<N> {
    pub fn new(node: N, token: TokenConfig, issuance: IssuanceConfig) -> Self {
        Self {
            node,
            token,
            issuance,
            state: IssuanceState::Idle,
        }
    }

    pub fn state(&self) -> IssuanceState {
        self.state
    }

    pub fn node(&self) -> &N {
        &self.node
    }

    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.issuance.output_path)
    }

    fn advance(&mut self, next: IssuanceState) {
        tracing::debug!(step = %next, previous = %self.state, "State transition");
        self.state = next;
    }

    /// Run every step once. On success the record has been written.
    pub async fn run(&mut self, phrase: &str) -> IssuanceResult<IssuanceRecord> {
        let result = self.execute(phrase).await;

        match &result {
            Ok(record) => {
                tracing::info!(
                    asset_id = record.asset_id,
                    txid = %record.txid,
                    output = %self.issuance.output_path,
                    "Token issued"
                );
            }
            Err(e) => {
                let failed_at = self.state;
                if !self.state.is_terminal() {
                    self.advance(IssuanceState::Failed);
                }
                tracing::error!(step = %failed_at, error = %e, "Token issuance failed");
            }
        }
        result
    }

    async fn execute(&mut self, phrase: &str) -> IssuanceResult<IssuanceRecord> {
        if self.state == IssuanceState::Idle {
            self.advance(IssuanceState::Connected);
        }

        let wallet = Wallet::from_mnemonic(phrase)
            .map_err(|e| IssuanceError::InvalidSecret(e.to_string()))?;
        let creator = wallet.address();
        self.advance(IssuanceState::IdentityDerived);
        tracing::info!(address = %creator, "Creator identity derived");

        let balance = self
            .node
            .account_info(&creator)
            .await
            .map_err(IssuanceError::Node)?
            .amount;
        tracing::info!(
            balance_algo = %format_units(balance, NATIVE_DECIMALS),
            "Creator balance fetched"
        );

        let required = self.issuance.min_balance_micro;
        if balance < required {
            self.advance(IssuanceState::Aborted);
            return Err(IssuanceError::InsufficientBalance { balance, required });
        }
        self.advance(IssuanceState::BalanceChecked);

        let suggested = self
            .node
            .suggested_params()
            .await
            .map_err(IssuanceError::Node)?;
        self.advance(IssuanceState::ParametersFetched);

        let params = asset_params(&self.token, creator)?;
        tracing::info!(
            asset_name = %params.asset_name,
            unit_name = %params.unit_name,
            total_supply = %format_units(params.total, params.decimals),
            decimals = params.decimals,
            "Creating token"
        );

        let tx = AssetConfigTransaction::create(creator, &suggested, &params)
            .map_err(|e| IssuanceError::Configuration(e.to_string()))?;
        self.advance(IssuanceState::TransactionBuilt);
        tracing::debug!(
            fee = tx.fee,
            first_valid = tx.first_valid,
            last_valid = tx.last_valid,
            "Transaction built"
        );

        let signed = wallet
            .sign(&tx)
            .map_err(|e| IssuanceError::Signing(e.to_string()))?;
        self.advance(IssuanceState::Signed);

        tracing::info!("Submitting transaction");
        let txid = self
            .node
            .send_transaction(&signed)
            .await
            .map_err(|e| IssuanceError::Submission(e.to_string()))?;
        self.advance(IssuanceState::Submitted);
        tracing::info!(txid = %txid, "Transaction submitted");

        tracing::info!(wait_rounds = self.issuance.wait_rounds, "Waiting for confirmation");
        let confirmation = wait_for_confirmation(&self.node, &txid, self.issuance.wait_rounds);
        let info = match confirmation.await {
            Ok(info) => info,
            Err(BlockchainError::ConfirmationTimeout(rounds)) => {
                self.advance(IssuanceState::TimedOut);
                return Err(IssuanceError::ConfirmationTimeout { rounds });
            }
            Err(BlockchainError::PoolError(reason)) => {
                return Err(IssuanceError::Submission(format!("rejected from pool: {}", reason)));
            }
            Err(e) => return Err(IssuanceError::Node(e)),
        };
        self.advance(IssuanceState::Confirmed);

        let asset_id = info
            .asset_index
            .ok_or_else(|| IssuanceError::MissingAssetId { txid: txid.clone() })?;
        self.advance(IssuanceState::ResultExtracted);

        let record = IssuanceRecord {
            asset_id,
            asset_name: params.asset_name,
            unit_name: params.unit_name,
            total_supply: params.total,
            decimals: params.decimals,
            creator: creator.to_string(),
            txid,
        };

        let path = self.output_path();
        if let Ok(previous) = IssuanceRecord::read_from(&path) {
            tracing::warn!(
                previous_asset_id = previous.asset_id,
                path = %path.display(),
                "Overwriting record of an earlier issuance"
            );
        }
        record
            .write_to(&path)
            .map_err(|source| IssuanceError::Persist { path, source })?;
        self.advance(IssuanceState::Persisted);

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_params_roles_and_total() {
        let creator = Address([3u8; 32]);
        let token = TokenConfig {
            human_supply: 1_000_000,
            decimals: 2,
            ..TokenConfig::default()
        };
        let params = asset_params(&token, creator).unwrap();
        assert_eq!(params.total, 100_000_000);
        assert_eq!(params.manager, creator);
        assert_eq!(params.reserve, creator);
        assert_eq!(params.freeze, creator);
        assert_eq!(params.clawback, creator);
    }

    #[test]
    fn test_asset_params_overflow() {
        let token = TokenConfig {
            human_supply: u64::MAX,
            decimals: 2,
            ..TokenConfig::default()
        };
        let err = asset_params(&token, Address([0u8; 32])).unwrap_err();
        assert!(matches!(err, IssuanceError::Configuration(_)));
    }

    #[test]
    fn test_terminal_states() {
        assert!(IssuanceState::Persisted.is_terminal());
        assert!(IssuanceState::Aborted.is_terminal());
        assert!(IssuanceState::TimedOut.is_terminal());
        assert!(IssuanceState::Failed.is_terminal());
        assert!(!IssuanceState::Submitted.is_terminal());
        assert_eq!(IssuanceState::BalanceChecked.to_string(), "balance_checked");
    }

    #[test]
    fn test_connect_uses_config() {
        let workflow = IssuanceWorkflow::connect(&IssuerConfig::default()).unwrap();
        assert_eq!(workflow.state(), IssuanceState::Connected);
        assert_eq!(workflow.output_path(), PathBuf::from("arc20_token_info.json"));
    }
}
