use std::{
    fs::{self, File},
    io,
    path::{Component, Path},
};

use anyhow::{ensure, Context, Result};
use glob::Pattern;

use super::matches_any;
use crate::{
    bundle_reader::{BundleReader, Entry},
    VERBOSE,
};

/// Extract entries matching a glob pattern to a folder.
///
/// Runs a single pass over the bundle, so entries come out in offset order
/// and skipped entries are never decompressed into memory.
pub fn extract_entries(
    reader: &mut BundleReader,
    patterns: &[Pattern],
    output_folder: &Path,
) -> Result<()> {
    let mut stream = reader.stream();
    while let Some(mut entry) = stream.next_entry()? {
        if !matches_any(patterns, entry.name()) {
            continue;
        }

        match write_entry(&mut entry, output_folder) {
            Ok(()) => eprintln!("Extracted entry: {}", entry.name()),
            Err(e) => {
                let error_message = if *VERBOSE.get().unwrap() {
                    format!("{e:?}")
                } else {
                    format!("{e}")
                };
                eprintln!("Failed to extract entry: {error_message}");
            }
        }
    }

    Ok(())
}

fn write_entry(entry: &mut Entry<'_>, output_folder: &Path) -> Result<()> {
    let name = Path::new(entry.name());
    ensure!(
        name.components().all(|c| matches!(c, Component::Normal(_))),
        "Entry name escapes the output folder: {:?}",
        entry.name()
    );

    let out_filename = output_folder.join(name);
    if let Some(parent) = out_filename.parent() {
        fs::create_dir_all(parent).context("Failed to create folder")?;
    }

    let mut out = File::create(&out_filename).context("Failed to create file")?;
    io::copy(entry, &mut out).context("Failed to write entry")?;

    Ok(())
}
