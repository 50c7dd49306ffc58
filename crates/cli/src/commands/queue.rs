// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use ll_core::{iso8601, MutationRecord};

use crate::app::App;
use crate::cli::OutputFormat;
use crate::error::Result;

pub fn list(app: &App, output: OutputFormat) -> Result<()> {
    app.resume()?;
    let records = app.pending()?;
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        OutputFormat::Text => {
            if records.is_empty() {
                println!("No queued writes");
            }
            for record in &records {
                println!("{}", format_record(record));
            }
        }
    }
    Ok(())
}

pub fn discard(app: &App, id: &str) -> Result<()> {
    app.resume()?;
    let record = app.discard(id)?;
    println!("Discarded {}", format_record(&record));
    println!("The local copy keeps this change until the next sync.");
    Ok(())
}

pub(crate) fn format_record(record: &MutationRecord) -> String {
    format!(
        "{}  {}  {} {}",
        record.id,
        iso8601(record.enqueued_at),
        record.kind.name(),
        record.target
    )
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
