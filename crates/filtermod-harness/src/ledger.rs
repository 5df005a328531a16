//! Allocation accounting for the create/destroy-exactly-once contract.
//!
//! Tests mint one [`LedgerToken`] per handle-like resource; the token's drop
//! is the release. After a scenario finishes, [`LeakLedger::outstanding`]
//! must be zero — a positive count is a leak, a negative count a double
//! destroy.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

/// Shared live-resource counter, cheap to clone into fixtures.
#[derive(Clone, Default)]
pub struct LeakLedger {
    live: Arc<Mutex<HashMap<&'static str, isize>>>,
}

impl LeakLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a token for one resource of the given kind.
    pub fn token(&self, kind: &'static str) -> LedgerToken {
        *self.live.lock().entry(kind).or_insert(0) += 1;
        LedgerToken {
            ledger: self.clone(),
            kind,
        }
    }

    /// Total live resources across all kinds.
    pub fn outstanding(&self) -> isize {
        self.live.lock().values().sum()
    }

    /// Live resources of one kind.
    pub fn outstanding_kind(&self, kind: &'static str) -> isize {
        self.live.lock().get(kind).copied().unwrap_or(0)
    }
}

/// RAII witness for one live resource.
pub struct LedgerToken {
    ledger: LeakLedger,
    kind: &'static str,
}

impl Drop for LedgerToken {
    fn drop(&mut self) {
        *self.ledger.live.lock().entry(self.kind).or_insert(0) -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_balance_to_zero() {
        let ledger = LeakLedger::new();
        let a = ledger.token("config");
        let b = ledger.token("filter");
        let c = ledger.token("filter");
        assert_eq!(ledger.outstanding(), 3);
        assert_eq!(ledger.outstanding_kind("filter"), 2);
        drop(b);
        drop(c);
        assert_eq!(ledger.outstanding_kind("filter"), 0);
        drop(a);
        assert_eq!(ledger.outstanding(), 0);
    }

    #[test]
    fn leak_is_visible() {
        let ledger = LeakLedger::new();
        let token = ledger.token("config");
        assert_eq!(ledger.outstanding(), 1);
        std::mem::forget(token);
        assert_eq!(ledger.outstanding(), 1, "forgotten token must stay live");
    }
}
