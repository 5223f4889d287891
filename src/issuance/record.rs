//! The persisted result of a successful issuance.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// What gets written to `arc20_token_info.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceRecord {
    pub asset_id: u64,
    pub asset_name: String,
    pub unit_name: String,
    /// In base units.
    pub total_supply: u64,
    pub decimals: u32,
    pub creator: String,
    pub txid: String,
}

impl IssuanceRecord {
    /// Write as pretty-printed JSON, replacing any existing file.
    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }

    /// Read a previously written record.
    pub fn read_from(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
