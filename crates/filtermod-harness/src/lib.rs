//! # filtermod-harness
//!
//! In-process mock host for testing filter modules built on
//! `filtermod-core`, plus the conformance scenario suite run by the
//! `conformance` binary.
//!
//! Provides:
//! - [`mock_stream::MockStream`]: a [`filtermod_core::host::HostStream`]
//!   that records capability calls.
//! - [`sink::RecordingSink`] / [`sink::NullSink`]: log sinks for asserting
//!   on emitted messages and for benchmarking the disabled path.
//! - [`probe::CountingProbe`]: a `Display` value that counts how often it is
//!   rendered, proving the logging gate skips formatting.
//! - [`ledger::LeakLedger`]: RAII accounting that proves the
//!   create/destroy-exactly-once contract leaves nothing outstanding.
//! - [`fixtures`]: a counting filter used by the scenario suite and the
//!   boundary contract tests.
//! - [`report`] and [`scenarios`]: JSONL conformance records and the
//!   built-in scenario runs.

#![forbid(unsafe_code)]

pub mod fixtures;
pub mod ledger;
pub mod mock_stream;
pub mod probe;
pub mod report;
pub mod scenarios;
pub mod sink;
