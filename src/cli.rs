use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "docbox")]
#[command(about = "Typed document storage CLI", long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Save a document of the given type, printing its new id
    Save(SaveArgs),
    /// Run the save-side checks against a document without storing it
    Validate(ValidateArgs),
    /// Load a stored document
    Load(LoadArgs),
    /// Check whether a document exists
    Check(CheckArgs),
    /// Show what the ledger knows about an id
    Describe(DescribeArgs),
    /// Delete a stored document
    Discard(DiscardArgs),
    /// List registered document types
    Types,
    /// Delete documents older than the cutoff
    Sweep(SweepArgs),
    /// Show ledger statistics
    Stats,
    /// Print the effective configuration
    Config,
}

#[derive(clap::Args, Debug)]
pub struct SaveArgs {
    /// Document type key (e.g. "SLD")
    pub doc_type: String,
    /// File to read the document from, or '-' for stdin
    pub file: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Document type key
    pub doc_type: String,
    /// File to read the document from, or '-' for stdin
    pub file: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct LoadArgs {
    /// Document type key
    pub doc_type: String,
    /// Storage id returned by save
    pub id: String,
    /// Write to this file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    pub doc_type: String,
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct DescribeArgs {
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct DiscardArgs {
    pub doc_type: String,
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct SweepArgs {
    /// Delete documents saved more than this many hours ago
    #[arg(long, default_value_t = 24)]
    pub older_than_hours: u32,
}
