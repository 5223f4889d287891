//! Canonical msgpack encoding for transactions.
//!
//! The node hashes and verifies the exact bytes it receives, so encoding must
//! be canonical: map keys sorted, zero-valued fields omitted, byte strings as
//! `bin` and integers in their shortest form.

use rmp::encode;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// A msgpack value as it appears in a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Uint(u64),
    Bool(bool),
    Str(String),
    Bin(Vec<u8>),
    Map(CanonicalMap),
}

impl Value {
    fn is_empty(&self) -> bool {
        match self {
            Value::Uint(v) => *v == 0,
            Value::Bool(v) => !*v,
            Value::Str(v) => v.is_empty(),
            Value::Bin(v) => v.is_empty() || v.iter().all(|b| *b == 0),
            Value::Map(m) => m.entries.is_empty(),
        }
    }
}

/// Map that drops empty values and encodes keys in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalMap {
    entries: Vec<(&'static str, Value)>,
}

impl CanonicalMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field. Empty values are omitted entirely.
    pub fn insert(&mut self, key: &'static str, value: Value) -> &mut Self {
        if !value.is_empty() {
            self.entries.retain(|(k, _)| *k != key);
            self.entries.push((key, value));
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Serialize to msgpack bytes.
    pub fn to_bytes(&self) -> BlockchainResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.write(&mut buf)?;
        Ok(buf)
    }

    fn write(&self, buf: &mut Vec<u8>) -> BlockchainResult<()> {
        let mut sorted: Vec<&(&'static str, Value)> = self.entries.iter().collect();
        sorted.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

        encode::write_map_len(buf, sorted.len() as u32).map_err(encoding_error)?;
        for (key, value) in sorted {
            encode::write_str(buf, key).map_err(encoding_error)?;
            match value {
                Value::Uint(v) => {
                    encode::write_uint(buf, *v).map_err(encoding_error)?;
                }
                Value::Bool(v) => {
                    encode::write_bool(buf, *v).map_err(encoding_error)?;
                }
                Value::Str(v) => {
                    encode::write_str(buf, v).map_err(encoding_error)?;
                }
                Value::Bin(v) => {
                    encode::write_bin(buf, v).map_err(encoding_error)?;
                }
                Value::Map(m) => m.write(buf)?,
            }
        }
        Ok(())
    }
}

fn encoding_error<E: std::fmt::Display>(e: E) -> BlockchainError {
    BlockchainError::Encoding(e.to_string())
}
