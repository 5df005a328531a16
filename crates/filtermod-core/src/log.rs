//! Leveled logging bridge to the host's log sink.
//!
//! The host records messages through a [`LogSink`] capability. The bridge
//! never formats a message unless the sink reports the level enabled, so a
//! disabled level costs one predicate call and nothing else. Formatting runs
//! into a fixed scratch buffer; a message that does not fit is replaced by a
//! fixed fallback diagnostic at [`Level::Error`] and the caller's control
//! flow is never disturbed.

use std::fmt::{self, Write as _};

/// Severity levels understood by the host sink.
///
/// The discriminants are part of the module ABI and must not be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Critical = 5,
}

impl Level {
    /// The complete level set, in ascending severity.
    pub const ALL: &'static [Self] = &[
        Self::Trace,
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
        Self::Critical,
    ];

    /// Short lowercase name, as it appears in harness reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

/// Capability over the host's log recording service.
///
/// The production implementation forwards to the host's exported log
/// functions; the harness records into memory.
pub trait LogSink {
    /// Whether the host will actually record `level`.
    fn enabled(&self, level: Level) -> bool;

    /// Record one message. Called unconditionally by [`Logger::raw`]; the
    /// formatted helpers only call it for enabled levels.
    fn write(&self, level: Level, message: &[u8]);
}

/// Size of the formatting scratch buffer in bytes.
pub const SCRATCH_LEN: usize = 1024;

/// Emitted in place of a message that overflowed the scratch buffer or whose
/// formatter failed.
pub const FORMAT_FALLBACK: &[u8] =
    b"log message dropped: formatting failed or exceeded scratch buffer";

/// Stack-allocated formatting target. Refuses writes past [`SCRATCH_LEN`].
struct Scratch {
    buf: [u8; SCRATCH_LEN],
    len: usize,
}

impl Scratch {
    fn new() -> Self {
        Self {
            buf: [0; SCRATCH_LEN],
            len: 0,
        }
    }

    fn bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl fmt::Write for Scratch {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        let Some(end) = self.len.checked_add(bytes.len()) else {
            return Err(fmt::Error);
        };
        if end > SCRATCH_LEN {
            return Err(fmt::Error);
        }
        self.buf[self.len..end].copy_from_slice(bytes);
        self.len = end;
        Ok(())
    }
}

/// The leveled logging bridge.
///
/// Borrows a sink for as long as the caller needs to log; module code
/// typically builds one per callback from the boundary layer's host sink.
pub struct Logger<'a> {
    sink: &'a dyn LogSink,
}

impl<'a> Logger<'a> {
    pub fn new(sink: &'a dyn LogSink) -> Self {
        Self { sink }
    }

    /// Whether the host records `level`. Exposed so callers can skip
    /// expensive message *preparation*, not just formatting.
    pub fn enabled(&self, level: Level) -> bool {
        self.sink.enabled(level)
    }

    /// Forward a pre-rendered message unconditionally.
    pub fn raw(&self, level: Level, message: &[u8]) {
        self.sink.write(level, message);
    }

    /// Format and emit at `level`, skipping all formatting work when the
    /// level is disabled.
    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        if !self.sink.enabled(level) {
            return;
        }
        let mut scratch = Scratch::new();
        match scratch.write_fmt(args) {
            Ok(()) => self.sink.write(level, scratch.bytes()),
            // Formatting failure is never fatal to the caller.
            Err(fmt::Error) => self.sink.write(Level::Error, FORMAT_FALLBACK),
        }
    }

    pub fn trace(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Trace, args);
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args);
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args);
    }

    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args);
    }

    pub fn critical(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Critical, args);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    struct TestSink {
        floor: Level,
        lines: RefCell<Vec<(Level, Vec<u8>)>>,
    }

    impl TestSink {
        fn at(floor: Level) -> Self {
            Self {
                floor,
                lines: RefCell::new(Vec::new()),
            }
        }
    }

    impl LogSink for TestSink {
        fn enabled(&self, level: Level) -> bool {
            level >= self.floor
        }

        fn write(&self, level: Level, message: &[u8]) {
            self.lines.borrow_mut().push((level, message.to_vec()));
        }
    }

    /// A display value that records whether it was ever rendered.
    struct Probe<'a> {
        hits: &'a Cell<usize>,
    }

    impl fmt::Display for Probe<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            self.hits.set(self.hits.get() + 1);
            f.write_str("probe")
        }
    }

    #[test]
    fn formats_enabled_levels() {
        let sink = TestSink::at(Level::Debug);
        let log = Logger::new(&sink);
        log.info(format_args!("answer={}", 42));
        let lines = sink.lines.borrow();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, Level::Info);
        assert_eq!(lines[0].1, b"answer=42");
    }

    #[test]
    fn disabled_level_skips_formatting_entirely() {
        let hits = Cell::new(0);
        let sink = TestSink::at(Level::Warn);
        let log = Logger::new(&sink);
        log.debug(format_args!("{}", Probe { hits: &hits }));
        assert_eq!(hits.get(), 0, "formatting ran for a disabled level");
        assert!(sink.lines.borrow().is_empty());
    }

    #[test]
    fn enabled_level_formats_once() {
        let hits = Cell::new(0);
        let sink = TestSink::at(Level::Trace);
        let log = Logger::new(&sink);
        log.warn(format_args!("{}", Probe { hits: &hits }));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn overflow_emits_fallback_at_error_level() {
        let sink = TestSink::at(Level::Trace);
        let log = Logger::new(&sink);
        let big = "x".repeat(SCRATCH_LEN + 1);
        log.info(format_args!("{big}"));
        let lines = sink.lines.borrow();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, Level::Error);
        assert_eq!(lines[0].1, FORMAT_FALLBACK);
    }

    #[test]
    fn message_exactly_at_capacity_is_kept() {
        let sink = TestSink::at(Level::Trace);
        let log = Logger::new(&sink);
        let exact = "y".repeat(SCRATCH_LEN);
        log.info(format_args!("{exact}"));
        let lines = sink.lines.borrow();
        assert_eq!(lines[0].0, Level::Info);
        assert_eq!(lines[0].1.len(), SCRATCH_LEN);
    }

    #[test]
    fn raw_bypasses_the_enabled_gate() {
        let sink = TestSink::at(Level::Critical);
        let log = Logger::new(&sink);
        log.raw(Level::Trace, b"forced");
        assert_eq!(sink.lines.borrow().len(), 1);
    }

    #[test]
    fn level_names_and_order() {
        assert_eq!(Level::Trace.as_str(), "trace");
        assert_eq!(Level::Critical.as_str(), "critical");
        assert!(Level::Trace < Level::Critical);
        assert_eq!(Level::ALL.len(), 6);
    }
}
