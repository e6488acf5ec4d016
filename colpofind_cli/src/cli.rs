use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "colpofind")]
#[command(about = "Find, rank and deduplicate cervical-cancer colposcopy literature")]
#[command(version)]
#[command(after_help = "\x1b[1;36mQuick Start:\x1b[0m
  colpofind                               Search with the default profile and save results
  colpofind search --dataset MyColpoSet   Substitute a dataset name into the queries
  colpofind search -s pubmed,arxiv        Only ask the open APIs
  colpofind rank results/*.json           Re-rank saved batches without network access
  colpofind score \"HPV screening\"         Show how a title would be scored

\x1b[1;36mProfiles:\x1b[0m
  colpofind profiles list                 Built-in and user profiles
  colpofind profiles init mine            Copy the default profile for editing
  colpofind profiles path                 Where user profiles live")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,

    /// Verbose output (-v for debug logs)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search every source of a profile, then filter, score and deduplicate
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  colpofind search
  colpofind search --profile colposcopy-open --limit 50
  colpofind search --dataset IARCImageBankColpo --save papers.json
  colpofind search -s google-scholar --pages 3 --no-save")]
    Search(SearchArgs),

    /// Run the pipeline over saved JSON files (one batch per file)
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  colpofind rank scholar.json pubmed.json
  colpofind rank old_results.json --save merged.json")]
    Rank {
        /// JSON files holding arrays of records
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Profile whose vocabulary and threshold to use
        #[arg(short, long)]
        profile: Option<String>,

        /// Save the ranked list to this path
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Show relevance verdict and score for a title and optional abstract
    Score {
        title: String,

        #[arg(value_name = "ABSTRACT")]
        abstract_text: Option<String>,

        /// Profile whose vocabulary to use
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Inspect and manage search profiles
    Profiles {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(clap::Args, Default)]
pub struct SearchArgs {
    /// Search profile (default: colposcopy)
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Dataset name substituted into query templates
    #[arg(short, long)]
    pub dataset: Option<String>,

    /// Comma-separated list of sources, overriding the profile
    #[arg(short = 's', long = "sources")]
    pub sources: Option<String>,

    /// Maximum results per source per query
    #[arg(short, long)]
    pub limit: Option<u32>,

    /// Google Scholar result pages per query
    #[arg(long)]
    pub pages: Option<u32>,

    /// Save results to this path (default: timestamped file in the current directory)
    #[arg(long, conflicts_with = "no_save")]
    pub save: Option<PathBuf>,

    /// Do not save results
    #[arg(long)]
    pub no_save: bool,
}

#[derive(Subcommand, Clone)]
pub enum ProfileAction {
    /// List built-in and user profiles
    #[command(alias = "ls")]
    List,

    /// Show a profile in full
    Show { name: String },

    /// Copy a profile into the user profile file for editing
    Init {
        name: String,

        /// Profile to copy (default: colposcopy)
        #[arg(long)]
        from: Option<String>,
    },

    /// Delete a user profile
    #[command(alias = "rm")]
    Delete { name: String },

    /// Print the user profile file path
    Path,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored, human-readable output
    Pretty,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Plain text without colors
    Text,
}
