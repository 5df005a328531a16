//! Formatting-side-effect probe.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A `Display` value that counts how many times it is rendered.
///
/// Interpolate one into a log call to prove whether formatting ran: the
/// logging gate must leave the count untouched for disabled levels.
#[derive(Clone, Default)]
pub struct CountingProbe {
    hits: Arc<AtomicUsize>,
}

impl CountingProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times this probe has been rendered.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }
}

impl fmt::Display for CountingProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.hits.fetch_add(1, Ordering::Relaxed);
        f.write_str("probe")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_renders() {
        let probe = CountingProbe::new();
        assert_eq!(probe.hits(), 0);
        let _ = format!("{probe} and {probe}");
        assert_eq!(probe.hits(), 2);
    }
}
