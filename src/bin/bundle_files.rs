use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use bundle_tools::{
    bundle_reader::BundleReader,
    commands::{
        cat::cat_entry, dump_index::dump_index, extract::extract_entries, info::show_info,
        list::list_entries,
    },
    VERBOSE,
};
use clap::{Parser, Subcommand};
use glob::Pattern;

#[derive(Debug, Subcommand)]
enum Command {
    /// List entry names
    List {
        /// Glob patterns to filter the list of entries
        #[clap(default_value = "**")]
        #[arg(num_args = 1..)]
        globs: Vec<Pattern>,
    },
    /// Print a summary of the bundle header and index
    Info,
    /// Dump the entry index as JSON
    DumpIndex,
    /// Extract a single entry to stdout
    Cat {
        /// Name of the entry to extract
        name: String,
    },
    /// Extract matched entries to a folder
    Extract {
        /// Path to the folder to output the extracted entries
        output_folder: PathBuf,
        /// Glob patterns to filter the list of entries
        #[clap(default_value = "**")]
        #[arg(num_args = 1..)]
        globs: Vec<Pattern>,
    },
}

/// A CLI tool for inspecting and unpacking asset bundle files.
#[derive(Parser, Debug)]
#[command(name = "bundle_files")]
#[clap(version)]
struct Cli {
    /// Path to the bundle file
    bundle: PathBuf,

    /// Verbose printing of non-fatal error messages
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug)]
struct Args {
    bundle: PathBuf,
    command: Command,
    verbose: bool,
}

/// Validates user input and constructs a valid input state
fn parse_args() -> Result<Args> {
    let cli = Cli::parse();

    ensure!(cli.bundle.exists(), "Bundle file doesn't exist");

    Ok(Args {
        bundle: cli.bundle,
        command: cli.command,
        verbose: cli.verbose,
    })
}

fn main() -> Result<()> {
    let args = parse_args()?;
    VERBOSE.set(args.verbose).unwrap();

    let mut reader = BundleReader::open(&args.bundle).context("Failed to open bundle")?;

    match args.command {
        Command::List { globs } => list_entries(&reader, &globs).context("List command failed")?,
        Command::Info => show_info(&reader).context("Info command failed")?,
        Command::DumpIndex => dump_index(&reader).context("Dump Index command failed")?,
        Command::Cat { name } => cat_entry(&mut reader, &name).context("Cat command failed")?,
        Command::Extract {
            output_folder,
            globs,
        } => extract_entries(&mut reader, &globs, &output_folder)
            .context("Extract command failed")?,
    }

    Ok(())
}
