//! Conformance runner.
//!
//! Runs the built-in scenario suite against the mock host and emits one
//! JSONL record per scenario. Exits non-zero when any scenario fails.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use filtermod_harness::report::{self, Outcome};
use filtermod_harness::scenarios;

#[derive(Parser)]
#[command(name = "conformance", about = "Run the filtermod conformance scenarios")]
struct Args {
    /// Write the JSONL report here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let records = scenarios::run_all();

    let result = match &args.out {
        Some(path) => File::create(path)
            .map_err(report::ReportError::from)
            .and_then(|mut file| report::write_jsonl(&mut file, &records)),
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            report::write_jsonl(&mut lock, &records).and_then(|()| {
                lock.flush()?;
                Ok(())
            })
        }
    };
    if let Err(err) = result {
        eprintln!("conformance: {err}");
        return ExitCode::FAILURE;
    }

    let failed = records
        .iter()
        .filter(|r| r.outcome == Outcome::Fail)
        .count();
    if failed > 0 {
        eprintln!("conformance: {failed} scenario(s) failed");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
