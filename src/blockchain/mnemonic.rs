//! 25-word recovery phrases.
//!
//! The phrase packs a 32-byte ed25519 seed into 24 words of 11 bits each
//! (little-endian bit order, BIP-39 English word list) followed by one
//! checksum word taken from SHA-512/256 of the seed.

use bip39::Language;
use sha2::{Digest, Sha512_256};

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Seed length in bytes.
pub const SEED_LEN: usize = 32;

/// Number of words in a phrase, checksum word included.
pub const MNEMONIC_LEN: usize = 25;

const KEY_WORDS: usize = MNEMONIC_LEN - 1;

/// Derive the 32-byte seed from a recovery phrase.
pub fn seed_from_mnemonic(phrase: &str) -> BlockchainResult<[u8; SEED_LEN]> {
    let words: Vec<String> = phrase.split_whitespace().map(str::to_lowercase).collect();
    if words.len() != MNEMONIC_LEN {
        return Err(BlockchainError::Wallet(format!(
            "expected {} words, got {}",
            MNEMONIC_LEN,
            words.len()
        )));
    }

    let list = Language::English.word_list();
    let mut indices = Vec::with_capacity(KEY_WORDS);
    for (position, word) in words[..KEY_WORDS].iter().enumerate() {
        let index = list.iter().position(|w| *w == word.as_str()).ok_or_else(|| {
            BlockchainError::Wallet(format!("unknown word at position {}", position + 1))
        })?;
        indices.push(index as u16);
    }

    let mut bytes = words_to_bytes(&indices);
    // 24 * 11 = 264 bits: the final byte is padding and must be zero.
    if bytes.len() != SEED_LEN + 1 || bytes[SEED_LEN] != 0 {
        return Err(BlockchainError::Wallet("invalid phrase padding".to_string()));
    }
    bytes.truncate(SEED_LEN);

    if checksum_word(&bytes) != words[KEY_WORDS] {
        return Err(BlockchainError::Wallet("checksum mismatch".to_string()));
    }

    let mut seed = [0u8; SEED_LEN];
    seed.copy_from_slice(&bytes);
    Ok(seed)
}

/// Encode a 32-byte seed as a recovery phrase.
pub fn mnemonic_from_seed(seed: &[u8; SEED_LEN]) -> String {
    let list = Language::English.word_list();
    let mut words: Vec<&str> = bytes_to_words(seed)
        .into_iter()
        .map(|i| list[i as usize])
        .collect();
    words.push(checksum_word(seed));
    words.join(" ")
}

fn checksum_word(seed: &[u8]) -> &'static str {
    let digest = Sha512_256::digest(seed);
    let first = bytes_to_words(&digest[..2])[0];
    Language::English.word_list()[first as usize]
}

/// Repack 11-bit word indices into bytes.
fn words_to_bytes(indices: &[u16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(indices.len() * 11 / 8 + 1);
    let mut buffer: u32 = 0;
    let mut bits = 0;

    for &index in indices {
        buffer |= u32::from(index) << bits;
        bits += 11;
        while bits >= 8 {
            out.push((buffer & 0xff) as u8);
            buffer >>= 8;
            bits -= 8;
        }
    }
    if bits != 0 {
        out.push((buffer & 0xff) as u8);
    }
    out
}

/// Repack bytes into 11-bit word indices.
fn bytes_to_words(bytes: &[u8]) -> Vec<u16> {
    let mut out = Vec::with_capacity(bytes.len() * 8 / 11 + 1);
    let mut buffer: u32 = 0;
    let mut bits = 0;

    for &byte in bytes {
        buffer |= u32::from(byte) << bits;
        bits += 8;
        if bits >= 11 {
            out.push((buffer & 0x7ff) as u16);
            buffer >>= 11;
            bits -= 11;
        }
    }
    if bits != 0 {
        out.push((buffer & 0x7ff) as u16);
    }
    out
}
