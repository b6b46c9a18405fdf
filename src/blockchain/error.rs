use thiserror::Error;

/// Failures raised by the ledger itself. Every variant leaves the chain untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("block index {index} out of range (chain length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("mining aborted after {attempts} attempts")]
    MiningAborted { attempts: u64 },
}
