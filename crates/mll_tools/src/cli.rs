//! CLI interface for the `mll` binary

use clap::{Args, Parser, Subcommand};
use mll::GeneratorConfig;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "mll")]
#[command(about = "Generate table-free C++ scanners from regex pattern files")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate `<name>.h` and `<name>.cpp` from an `.mll` file
    Generate {
        /// Input `.mll` file
        input: PathBuf,

        /// Directory the generated files are written to
        #[arg(short = 'd', long, default_value = ".")]
        out_dir: PathBuf,

        /// Base name of the generated files (default: input file stem)
        #[arg(short, long)]
        name: Option<String>,

        #[command(flatten)]
        limits: Limits,
    },

    /// Print the DFA in Graphviz DOT format
    Dot {
        /// Input `.mll` file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        limits: Limits,
    },

    /// Dump the generated tables as JSON
    Tables {
        /// Input `.mll` file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        limits: Limits,
    },
}

/// Generator settings shared by every subcommand.
#[derive(Debug, Clone, Copy, Args)]
pub struct Limits {
    /// Maximum number of DFA states before generation is aborted
    #[arg(long, default_value_t = GeneratorConfig::DEFAULT_MAX_DFA_STATES)]
    pub max_dfa_states: usize,

    /// Reject patterns that match the empty string
    #[arg(long)]
    pub deny_nullable: bool,
}

impl Limits {
    #[must_use]
    pub fn config(self) -> GeneratorConfig {
        GeneratorConfig::default()
            .with_max_dfa_states(self.max_dfa_states)
            .with_deny_nullable_patterns(self.deny_nullable)
    }
}
