use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use glob::Pattern;

use super::matches_any;
use crate::bundle_reader::BundleReader;

/// List entry names matching a glob pattern
pub fn list_entries(reader: &BundleReader, patterns: &[Pattern]) -> Result<()> {
    // Use a buffered writer since we're dumping a lot of data
    let mut stdout = BufWriter::new(io::stdout().lock());

    reader
        .entries()
        .iter()
        .filter(|entry| matches_any(patterns, &entry.name))
        .try_for_each(|entry| {
            writeln!(stdout, "{}", entry.name).context("Failed to write to stdout")
        })?;

    stdout.flush().context("Failed to flush stdout")
}
