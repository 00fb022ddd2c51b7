use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};

use crate::bundle_reader::BundleReader;

/// Print a summary of the bundle's header and index
pub fn show_info(reader: &BundleReader) -> Result<()> {
    let header = reader.header();
    let entries = reader.entries();
    // Declared sizes are untrusted, so the total saturates instead of
    // overflowing
    let total_bytes = entries
        .iter()
        .fold(0u64, |total, e| total.saturating_add(e.size));

    let mut stdout = BufWriter::new(io::stdout().lock());
    writeln!(stdout, "header size: {} bytes", header.header_size())
        .context("Failed to write to stdout")?;
    writeln!(stdout, "compressed: {}", header.is_compressed())
        .context("Failed to write to stdout")?;
    writeln!(stdout, "entries: {}", entries.len()).context("Failed to write to stdout")?;
    writeln!(stdout, "entry bytes: {}", total_bytes).context("Failed to write to stdout")?;

    stdout.flush().context("Failed to flush stdout")
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::show_info;
    use crate::{bundle::MAGIC, bundle_reader::BundleReader};

    fn sized_bundle(sizes: &[u64]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&MAGIC).unwrap();
        file.write_all(&16u32.to_le_bytes()).unwrap();
        file.write_all(&0u32.to_le_bytes()).unwrap();
        file.write_all(&(sizes.len() as u32).to_le_bytes()).unwrap();
        for (i, size) in sizes.iter().enumerate() {
            let name = format!("e{i}");
            file.write_all(&(name.len() as u32).to_le_bytes()).unwrap();
            file.write_all(name.as_bytes()).unwrap();
            file.write_all(&(i as u64).to_le_bytes()).unwrap();
            file.write_all(&size.to_le_bytes()).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn huge_declared_sizes_do_not_overflow_the_summary() {
        let bundle = sized_bundle(&[u64::MAX, 8]);

        let reader = BundleReader::open(bundle.path()).unwrap();
        show_info(&reader).unwrap();
    }
}
