//! JSONL conformance records.
//!
//! One record per scenario, one JSON object per line, so reports diff and
//! grep cleanly in CI artifacts.

use std::io::Write;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scenario outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
}

/// One conformance scenario result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub scenario: String,
    pub outcome: Outcome,
    pub detail: String,
}

impl ScenarioRecord {
    pub fn pass(scenario: &str, detail: impl Into<String>) -> Self {
        Self {
            scenario: scenario.to_owned(),
            outcome: Outcome::Pass,
            detail: detail.into(),
        }
    }

    pub fn fail(scenario: &str, detail: impl Into<String>) -> Self {
        Self {
            scenario: scenario.to_owned(),
            outcome: Outcome::Fail,
            detail: detail.into(),
        }
    }
}

/// Report serialization failures.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("serializing record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("writing report: {0}")]
    Io(#[from] std::io::Error),
}

/// Write records as JSONL.
pub fn write_jsonl(out: &mut dyn Write, records: &[ScenarioRecord]) -> Result<(), ReportError> {
    for record in records {
        serde_json::to_writer(&mut *out, record)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// Parse one report line back into a record.
pub fn parse_line(line: &str) -> Result<ScenarioRecord, ReportError> {
    Ok(serde_json::from_str(line)?)
}
