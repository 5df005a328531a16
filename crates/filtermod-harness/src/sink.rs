//! Log sinks for tests and benches.

use parking_lot::Mutex;

use filtermod_core::log::{Level, LogSink};

/// A sink that records every line it accepts, with a severity floor
/// controlling what counts as enabled.
pub struct RecordingSink {
    floor: Level,
    lines: Mutex<Vec<(Level, Vec<u8>)>>,
}

impl RecordingSink {
    /// Record everything at `floor` and above.
    pub fn at(floor: Level) -> Self {
        Self {
            floor,
            lines: Mutex::new(Vec::new()),
        }
    }

    /// All recorded lines, in emission order.
    pub fn lines(&self) -> Vec<(Level, Vec<u8>)> {
        self.lines.lock().clone()
    }

    /// Recorded lines rendered as UTF-8 for convenient assertions.
    pub fn rendered(&self) -> Vec<(Level, String)> {
        self.lines
            .lock()
            .iter()
            .map(|(level, bytes)| (*level, String::from_utf8_lossy(bytes).into_owned()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }
}

impl LogSink for RecordingSink {
    fn enabled(&self, level: Level) -> bool {
        level >= self.floor
    }

    fn write(&self, level: Level, message: &[u8]) {
        self.lines.lock().push((level, message.to_vec()));
    }
}

/// A sink with every level disabled that drops whatever still arrives.
/// Benchmarks use it to measure the disabled-level fast path.
pub struct NullSink;

impl LogSink for NullSink {
    fn enabled(&self, _level: Level) -> bool {
        false
    }

    fn write(&self, _level: Level, _message: &[u8]) {}
}

/// A sink with every level enabled that discards the rendered message.
/// Benchmarks use it to measure formatting cost without accumulation.
pub struct DiscardSink;

impl LogSink for DiscardSink {
    fn enabled(&self, _level: Level) -> bool {
        true
    }

    fn write(&self, _level: Level, _message: &[u8]) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use filtermod_core::log::Logger;

    #[test]
    fn floor_controls_enabled() {
        let sink = RecordingSink::at(Level::Warn);
        assert!(!sink.enabled(Level::Info));
        assert!(sink.enabled(Level::Warn));
        assert!(sink.enabled(Level::Critical));
    }

    #[test]
    fn records_through_the_bridge() {
        let sink = RecordingSink::at(Level::Trace);
        let log = Logger::new(&sink);
        log.info(format_args!("stream {} attached", 9));
        let rendered = sink.rendered();
        assert_eq!(rendered, vec![(Level::Info, "stream 9 attached".into())]);
    }
}
