use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use super::codec;
use super::error::LedgerError;
use super::pow::{MiningLimits, meets_target};
use super::{GENESIS_DATA, GENESIS_PREV_HASH};

/// Current time as fractional seconds since the Unix epoch.
pub fn now_timestamp() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// A single ledger entry. `hash` is cached and recomputed every time one of
/// the other five fields changes.
#[derive(Debug, Clone)]
pub struct Block {
    pub index: u64,
    pub timestamp: f64, // Unix seconds, fractional
    pub data: Vec<Value>,
    pub prev_hash: String,
    pub nonce: u64,
    pub hash: String,
    /// Difficulty the block was sealed at; `None` until mined.
    pub mined_difficulty: Option<u32>,
}

/// Wire view of a block. Field names and order are part of the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockRecord {
    pub index: u64,
    pub timestamp: f64,
    pub data: Vec<Value>,
    pub prev_hash: String,
    pub hash: String,
    pub nonce: u64,
}

impl Block {
    /// Create the genesis block. It is never mined.
    pub fn genesis() -> Self {
        Self::new(
            0,
            now_timestamp(),
            vec![Value::String(GENESIS_DATA.to_string())],
            GENESIS_PREV_HASH.to_string(),
        )
    }

    /// Create a new block (not mined yet). Call `mine()` to perform PoW.
    pub fn new(index: u64, timestamp: f64, data: Vec<Value>, prev_hash: String) -> Self {
        let mut block = Self {
            index,
            timestamp,
            data,
            prev_hash,
            nonce: 0,
            hash: String::new(),
            mined_difficulty: None,
        };
        block.hash = block.compute_hash();
        block
    }

    pub fn compute_hash(&self) -> String {
        codec::digest(
            self.index,
            self.timestamp,
            &self.data,
            &self.prev_hash,
            self.nonce,
        )
    }

    /// Perform Proof-of-Work: bump the nonce until the hash starts with
    /// `difficulty` hex zeros. Unbounded; returns the number of attempts.
    pub fn mine(&mut self, difficulty: u32) -> u64 {
        let mut attempts = 0u64;
        while !meets_target(&self.hash, difficulty) {
            self.nonce = self.nonce.wrapping_add(1);
            self.hash = self.compute_hash();
            attempts += 1;
        }
        self.mined_difficulty = Some(difficulty);
        attempts
    }

    /// Same search as [`Block::mine`], but gives up once `limits` say so.
    /// On abort the nonce/hash are left wherever the search stopped (still
    /// self-consistent) and the block stays unmined.
    pub fn mine_with(&mut self, difficulty: u32, limits: &MiningLimits) -> Result<u64, LedgerError> {
        if limits.is_unbounded() {
            return Ok(self.mine(difficulty));
        }
        let mut attempts = 0u64;
        while !meets_target(&self.hash, difficulty) {
            if limits.should_stop(attempts) {
                return Err(LedgerError::MiningAborted { attempts });
            }
            self.nonce = self.nonce.wrapping_add(1);
            self.hash = self.compute_hash();
            attempts += 1;
        }
        self.mined_difficulty = Some(difficulty);
        Ok(attempts)
    }

    /// Whether the cached hash matches the fields.
    pub fn is_consistent(&self) -> bool {
        self.hash == self.compute_hash()
    }

    pub fn meets_difficulty(&self, difficulty: u32) -> bool {
        meets_target(&self.hash, difficulty)
    }

    pub fn export(&self) -> BlockRecord {
        BlockRecord {
            index: self.index,
            timestamp: self.timestamp,
            data: self.data.clone(),
            prev_hash: self.prev_hash.clone(),
            hash: self.hash.clone(),
            nonce: self.nonce,
        }
    }
}
