pub mod block;
pub mod codec;
pub mod error;
pub mod model;
pub mod pow;

pub use block::{Block, BlockRecord, now_timestamp};
pub use error::LedgerError;
pub use model::{Blockchain, ValidationMode};
pub use pow::MiningLimits;

/// Default Proof-of-Work difficulty (number of leading hex zeros).
pub const DEFAULT_DIFFICULTY: u32 = 3;

/// Single data entry of the genesis block.
pub const GENESIS_DATA: &str = "Genesis Block";

/// `prev_hash` of the genesis block.
pub const GENESIS_PREV_HASH: &str = "0";
