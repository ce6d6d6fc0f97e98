use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Debug, Parser)]
#[command(
    name = "persona-rank",
    about = "Rank PDF sections by relevance to a persona and the job they need done"
)]
pub struct Cli {
    /// Override the ColBERT model ID or local model path
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Skip loading the model and score by keyword overlap only
    #[arg(long, global = true)]
    pub no_model: bool,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rank the sections of the input documents and write result.json
    Analyze(AnalyzeArgs),
    /// Print the text blocks extracted from a PDF, with their titles
    Blocks(BlocksArgs),
    /// Show the curated expectation table
    Expectations(ExpectationsArgs),
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- Analyze --

#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Directory holding input.json and the PDFs
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Directory result.json is written to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Input file (defaults to input.json in the input directory)
    #[arg(long)]
    pub input_file: Option<PathBuf>,

    /// Extra expectation table (JSON) consulted before the built-in one
    #[arg(long)]
    pub expectations: Option<PathBuf>,

    /// Scoring weights and thresholds (JSON), overriding the defaults
    #[arg(long)]
    pub scoring: Option<PathBuf>,

    /// Print the report to stdout instead of writing result.json
    #[arg(long)]
    pub stdout: bool,
}

// -- Blocks --

#[derive(Debug, Parser)]
pub struct BlocksArgs {
    /// Path to the PDF file
    pub path: PathBuf,

    /// Only show blocks that have a usable title
    #[arg(long)]
    pub titled: bool,
}

// -- Expectations --

#[derive(Debug, Parser)]
pub struct ExpectationsArgs {
    /// Extra expectation table (JSON) to include
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "persona-rank",
            &mut std::io::stdout(),
        );
    }
}
