//! Configuration for transfer validation and application

use serde::{Deserialize, Serialize};
use std::env;

/// Transfer limits and feature switches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Maximum entries in the hbar transfer list
    pub max_hbar_adjusts: usize,
    /// Maximum token transfer lists, and maximum fungible entries across them
    pub max_token_adjusts: usize,
    /// Maximum NFT ownership changes in one transfer
    pub max_ownership_changes: usize,
    /// Maximum balance changes after aggregation
    pub max_balance_changes: usize,
    /// Whether NFT moves are accepted at all
    pub nfts_enabled: bool,
    /// Whether unseen aliases are turned into new accounts
    pub auto_creation_enabled: bool,
    /// Whether approved (allowance) debits are accepted
    pub allowances_enabled: bool,
    /// Whether expired zero-balance accounts are refused
    pub expiry_enforced: bool,
    /// Lifetime given to auto-created accounts (seconds)
    pub auto_renew_period_secs: i64,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            max_hbar_adjusts: 10,
            max_token_adjusts: 10,
            max_ownership_changes: 10,
            max_balance_changes: 20,
            nfts_enabled: true,
            auto_creation_enabled: true,
            allowances_enabled: true,
            expiry_enforced: true,
            auto_renew_period_secs: 7_776_000,
        }
    }
}

impl TransferConfig {
    /// Defaults overridden by `LEDGER_*` environment variables.
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_hbar_adjusts: env_parse("LEDGER_MAX_HBAR_ADJUSTS", defaults.max_hbar_adjusts),
            max_token_adjusts: env_parse("LEDGER_MAX_TOKEN_ADJUSTS", defaults.max_token_adjusts),
            max_ownership_changes: env_parse(
                "LEDGER_MAX_OWNERSHIP_CHANGES",
                defaults.max_ownership_changes,
            ),
            max_balance_changes: env_parse(
                "LEDGER_MAX_BALANCE_CHANGES",
                defaults.max_balance_changes,
            ),
            nfts_enabled: env_flag("LEDGER_NFTS_ENABLED", defaults.nfts_enabled),
            auto_creation_enabled: env_flag(
                "LEDGER_AUTO_CREATION_ENABLED",
                defaults.auto_creation_enabled,
            ),
            allowances_enabled: env_flag("LEDGER_ALLOWANCES_ENABLED", defaults.allowances_enabled),
            expiry_enforced: env_flag("LEDGER_EXPIRY_ENFORCED", defaults.expiry_enforced),
            auto_renew_period_secs: env_parse(
                "LEDGER_AUTO_RENEW_PERIOD_SECS",
                defaults.auto_renew_period_secs,
            ),
        }
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_flag(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| v.to_lowercase() == "true" || v == "1")
        .unwrap_or(default)
}
