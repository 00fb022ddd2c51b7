use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};

use crate::bundle_reader::BundleReader;

/// Dump the entry index to stdout as JSON, in offset order
pub fn dump_index(reader: &BundleReader) -> Result<()> {
    let mut stdout = BufWriter::new(io::stdout().lock());

    serde_json::to_writer_pretty(&mut stdout, reader.entries())
        .context("Failed to serialise index")?;
    writeln!(stdout).context("Failed to write to stdout")?;

    stdout.flush().context("Failed to flush stdout")
}
