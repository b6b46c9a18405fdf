use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Whether `hash` starts with `difficulty` hex zeros. A target longer than the
/// hash itself can never be met.
pub fn meets_target(hash: &str, difficulty: u32) -> bool {
    let d = difficulty as usize;
    hash.len() >= d && hash.bytes().take(d).all(|b| b == b'0')
}

/// Optional brakes for the nonce search. The default imposes none, so mining
/// runs until a matching digest is found.
#[derive(Debug, Clone, Default)]
pub struct MiningLimits {
    pub max_attempts: Option<u64>,
    cancel: Option<Arc<AtomicBool>>,
}

impl MiningLimits {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Mining stops at the next attempt after `flag` is set to `true`.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_attempts.is_none() && self.cancel.is_none()
    }

    pub(crate) fn should_stop(&self, attempts: u64) -> bool {
        if self.max_attempts.is_some_and(|max| attempts >= max) {
            return true;
        }
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Outcome of sealing one block.
#[derive(Debug, Clone)]
pub struct MiningReport {
    pub index: u64,
    pub nonce: u64,
    pub hash: String,
    pub difficulty: u32,
    /// Digests computed after the initial one.
    pub attempts: u64,
    pub elapsed: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_counts_leading_zeros() {
        let hash = format!("000a{}", "f".repeat(60));
        assert!(meets_target(&hash, 0));
        assert!(meets_target(&hash, 3));
        assert!(!meets_target(&hash, 4));
    }

    #[test]
    fn target_longer_than_hash_is_unreachable() {
        let zeros = "0".repeat(64);
        assert!(meets_target(&zeros, 64));
        assert!(!meets_target(&zeros, 65));
        assert!(!meets_target(&zeros, u32::MAX));
    }

    #[test]
    fn attempt_cap_and_cancel_flag() {
        let limits = MiningLimits::unbounded();
        assert!(limits.is_unbounded());
        assert!(!limits.should_stop(u64::MAX));

        let capped = MiningLimits::unbounded().with_max_attempts(10);
        assert!(!capped.should_stop(9));
        assert!(capped.should_stop(10));

        let flag = Arc::new(AtomicBool::new(false));
        let cancellable = MiningLimits::unbounded().with_cancel_flag(flag.clone());
        assert!(!cancellable.should_stop(0));
        flag.store(true, Ordering::Relaxed);
        assert!(cancellable.should_stop(0));
    }
}
