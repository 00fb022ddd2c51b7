use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};

use crate::bundle_reader::BundleReader;

/// Write the contents of a single entry to stdout
pub fn cat_entry(reader: &mut BundleReader, name: &str) -> Result<()> {
    let contents = reader.read_entry(name).context("Failed to read entry")?;

    let mut stdout = BufWriter::new(io::stdout().lock());
    stdout
        .write_all(&contents)
        .context("Failed to write to stdout")?;

    stdout.flush().context("Failed to flush stdout")
}
