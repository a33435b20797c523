// ── Request sequencing ──
//
// Each view owns a sequencer. Starting a load hands out a token; a
// response is applied only if its token is still the latest, so a slow
// earlier fetch can never overwrite a newer one.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic generation counter for one view.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

/// Handle identifying one in-flight load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadToken(u64);

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new load, superseding every earlier token.
    pub fn begin(&self) -> LoadToken {
        LoadToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `token` belongs to the most recent load.
    pub fn is_current(&self, token: LoadToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }

    /// Invalidate every outstanding token without starting a load.
    pub fn cancel(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_token_is_current() {
        let seq = RequestSequencer::new();
        let first = seq.begin();
        assert!(seq.is_current(first));

        let second = seq.begin();
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
        assert!(second > first);
    }

    #[test]
    fn cancel_invalidates_outstanding_tokens() {
        let seq = RequestSequencer::new();
        let token = seq.begin();
        seq.cancel();
        assert!(!seq.is_current(token));
    }
}
