//! Built-in conformance scenarios.
//!
//! The suite walks one stream through a counting filter end to end against
//! the mock host, then checks the logging bridge contracts. Each scenario
//! produces one [`ScenarioRecord`]; the boundary-level twin of this suite
//! lives in `filtermod-abi`'s integration tests, where the same fixture runs
//! through the real entry points.

use std::sync::atomic::Ordering;

use filtermod_core::filter::{FilterConfig, StreamFilter};
use filtermod_core::log::{FORMAT_FALLBACK, Level, Logger, SCRATCH_LEN};
use filtermod_core::status::{
    RequestBodyStatus, RequestHeadersStatus, RequestTrailersStatus, ResponseBodyStatus,
    ResponseHeadersStatus, ResponseTrailersStatus,
};

use crate::fixtures::{CounterSettings, CountingConfig};
use crate::ledger::LeakLedger;
use crate::mock_stream::MockStream;
use crate::probe::CountingProbe;
use crate::report::ScenarioRecord;
use crate::sink::RecordingSink;

/// Run the full scenario suite.
pub fn run_all() -> Vec<ScenarioRecord> {
    vec![
        stream_walkthrough(),
        creation_failure_leaves_no_leak(),
        logging_gate(),
        formatting_fallback(),
    ]
}

fn check(scenario: &str, result: Result<String, String>) -> ScenarioRecord {
    match result {
        Ok(detail) => ScenarioRecord::pass(scenario, detail),
        Err(detail) => ScenarioRecord::fail(scenario, detail),
    }
}

/// Scenarios 1–6 of the stream lifecycle: config up, filter up, all six
/// stages, teardown, zero outstanding allocations.
fn stream_walkthrough() -> ScenarioRecord {
    check("stream-walkthrough", (|| {
        let ledger = LeakLedger::new();
        let config = CountingConfig::<MockStream>::from_payload(b"{}", Some(ledger.clone()))
            .map_err(|e| format!("config creation failed: {e}"))?;
        let counters = config.counters();
        let mut host = MockStream::new();

        let mut filter = config
            .new_stream_filter(&mut host)
            .ok_or("filter creation declined")?;
        if counters.request_headers.load(Ordering::Relaxed) != 0 {
            return Err("request counter not initialized to 0".into());
        }

        if filter.on_request_headers(&mut host, false) != RequestHeadersStatus::Continue {
            return Err("first request-headers did not continue".into());
        }
        if filter.on_request_headers(&mut host, true) != RequestHeadersStatus::Continue {
            return Err("second request-headers did not continue".into());
        }
        if counters.request_headers.load(Ordering::Relaxed) != 2 {
            return Err("request-headers counter != 2".into());
        }

        if filter.on_request_body(&mut host, true) != RequestBodyStatus::Continue
            || filter.on_request_trailers(&mut host) != RequestTrailersStatus::Continue
            || filter.on_response_headers(&mut host, false) != ResponseHeadersStatus::Continue
            || filter.on_response_body(&mut host, true) != ResponseBodyStatus::Continue
            || filter.on_response_trailers(&mut host) != ResponseTrailersStatus::Continue
        {
            return Err("a stage did not continue".into());
        }
        if counters.total() != 7 {
            return Err(format!("unexpected state change: total={}", counters.total()));
        }

        filter.on_stream_complete(&mut host);
        drop(filter);
        drop(config);
        match ledger.outstanding() {
            0 => Ok("all stages continued; 0 outstanding allocations".into()),
            n => Err(format!("{n} outstanding allocations after teardown")),
        }
    })())
}

/// Forced mid-construction failure must release everything allocated before
/// the failure point.
fn creation_failure_leaves_no_leak() -> ScenarioRecord {
    check("creation-failure-no-leak", (|| {
        let ledger = LeakLedger::new();
        let settings = CounterSettings {
            fail_after_partial_setup: true,
            ..CounterSettings::default()
        };
        let config = CountingConfig::<MockStream>::new(settings, Some(ledger.clone()));
        let mut host = MockStream::new();
        if config.new_stream_filter(&mut host).is_some() {
            return Err("forced failure produced a filter".into());
        }
        if ledger.outstanding_kind("filter") != 0 {
            return Err("partial filter state leaked".into());
        }
        drop(config);
        match ledger.outstanding() {
            0 => Ok("partial state released on failure path".into()),
            n => Err(format!("{n} outstanding allocations")),
        }
    })())
}

/// A disabled level must perform no observable formatting work.
fn logging_gate() -> ScenarioRecord {
    check("logging-gate", (|| {
        let sink = RecordingSink::at(Level::Warn);
        let log = Logger::new(&sink);
        let probe = CountingProbe::new();
        log.debug(format_args!("expensive: {probe}"));
        if probe.hits() != 0 {
            return Err("formatting ran for a disabled level".into());
        }
        log.error(format_args!("expensive: {probe}"));
        if probe.hits() != 1 {
            return Err("formatting did not run exactly once when enabled".into());
        }
        Ok("no formatting below the enabled floor".into())
    })())
}

/// Scratch overflow must degrade to the fallback diagnostic, never to a
/// caller-visible failure.
fn formatting_fallback() -> ScenarioRecord {
    check("formatting-fallback", (|| {
        let sink = RecordingSink::at(Level::Trace);
        let log = Logger::new(&sink);
        let oversized = "#".repeat(SCRATCH_LEN * 2);
        log.info(format_args!("{oversized}"));
        let lines = sink.lines();
        match lines.as_slice() {
            [(Level::Error, message)] if message.as_slice() == FORMAT_FALLBACK => {
                Ok("overflow produced the fallback diagnostic".into())
            }
            other => Err(format!("unexpected sink contents: {} lines", other.len())),
        }
    })())
}
