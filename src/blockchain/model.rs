use std::time::Instant;

use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::Value;

use super::block::BlockRecord;
use super::error::LedgerError;
use super::pow::{MiningLimits, MiningReport};
use super::Block;

/// How thoroughly [`Blockchain::validate`] checks the chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Self-consistency of every hash plus predecessor linkage.
    #[default]
    Linkage,
    /// Linkage, plus every non-genesis hash must still meet the difficulty it
    /// was mined at.
    #[serde(rename = "strict")]
    ProofOfWork,
}

/// Simple in-memory blockchain with Proof-of-Work.
///
/// The chain always holds at least the genesis block.
#[derive(Debug)]
pub struct Blockchain {
    chain: Vec<Block>,
    difficulty: u32,
    limits: MiningLimits,
}

impl Blockchain {
    /// Initialize a new blockchain with an unmined genesis block.
    pub fn new(difficulty: u32) -> Self {
        Self {
            chain: vec![Block::genesis()],
            difficulty,
            limits: MiningLimits::unbounded(),
        }
    }

    /// Bound every future `add_block` search.
    pub fn with_limits(mut self, limits: MiningLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("Blockchain should always have at least the genesis block")
    }

    /// Index the next appended block is expected to carry.
    pub fn next_index(&self) -> u64 {
        self.chain.len() as u64
    }

    /// Link `block` to the current tail, mine it at the current difficulty and
    /// append it. The caller is responsible for `block.index`.
    ///
    /// If mining is aborted by the configured limits nothing is appended.
    pub fn add_block(&mut self, mut block: Block) -> Result<MiningReport, LedgerError> {
        block.prev_hash = self.last_block().hash.clone();
        block.hash = block.compute_hash();

        let started = Instant::now();
        let attempts = block.mine_with(self.difficulty, &self.limits)?;
        let report = MiningReport {
            index: block.index,
            nonce: block.nonce,
            hash: block.hash.clone(),
            difficulty: self.difficulty,
            attempts,
            elapsed: started.elapsed(),
        };
        info!(
            "Block {} mined with nonce {}: {}",
            report.index, report.nonce, report.hash
        );

        self.chain.push(block);
        Ok(report)
    }

    /// Validate linkage and hash self-consistency (genesis excluded).
    pub fn is_valid(&self) -> bool {
        self.validate(ValidationMode::Linkage)
    }

    pub fn validate(&self, mode: ValidationMode) -> bool {
        for pair in self.chain.windows(2) {
            let (prev, current) = (&pair[0], &pair[1]);

            if !current.is_consistent() {
                debug!("block {} hash does not match its contents", current.index);
                return false;
            }
            if current.prev_hash != prev.hash {
                debug!("block {} is not linked to block {}", current.index, prev.index);
                return false;
            }
            if mode == ValidationMode::ProofOfWork
                && !current
                    .mined_difficulty
                    .is_some_and(|d| current.meets_difficulty(d))
            {
                debug!("block {} no longer meets its proof-of-work target", current.index);
                return false;
            }
        }
        true
    }

    /// Overwrite the data of block `index` with `[new_data]` and recompute its
    /// hash. Nothing else in the chain is touched.
    pub fn tamper(&mut self, index: usize, new_data: Value) -> Result<&Block, LedgerError> {
        let len = self.chain.len();
        let block = self
            .chain
            .get_mut(index)
            .ok_or(LedgerError::IndexOutOfRange { index, len })?;

        block.data = vec![new_data];
        block.hash = block.compute_hash();
        warn!("Block {index} tampered! New hash: {}", block.hash);
        Ok(block)
    }

    pub fn export(&self) -> Vec<BlockRecord> {
        self.chain.iter().map(Block::export).collect()
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: u32) {
        // Changing difficulty affects future blocks only.
        self.difficulty = difficulty;
        info!("Mining difficulty set to {difficulty}");
    }
}
