//! CLI argument definitions using clap.
//!
//! The top-level options are deliberately not `global = true`: clap only
//! accepts them before the subcommand, and [`crate::cli::normalize`] moves
//! them there. Handlers read values through [`crate::cli::CommandContext`],
//! so argument ids (the snake_case field names) are part of the contract.
//! Positional arguments always use the id `args`.

use clap::{Args, Parser, Subcommand};

/// Command-line client for the Rainforest test-automation API.
#[derive(Parser, Debug)]
#[command(name = "rainforest")]
#[command(author, version, about, long_about = None)]
#[command(subcommand_required = true, arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    // === Global flags ===
    /// API token (overrides RAINFOREST_API_TOKEN and the config file)
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Skip the automatic update check
    #[arg(long)]
    pub skip_update: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a run
    Run(RunArgs),

    /// Create a new RFML test file
    New(NewArgs),

    /// Validate RFML test files
    Validate(PathArgs),

    /// Upload RFML test files
    Upload(PathArgs),

    /// Remove a test file and its remote test
    Rm(FileArgs),

    /// Download tests as RFML files
    Download(DownloadArgs),

    /// Upload a CSV file as a tabular variable
    CsvUpload(CsvUploadArgs),

    /// Upload a mobile app build
    MobileUpload(MobileUploadArgs),

    /// Show the results of a run
    Report(ReportArgs),

    /// List sites
    Sites,

    /// List environments
    Environments,

    /// List folders
    Folders,

    /// List filters
    Filters,

    /// List browsers
    Browsers,

    /// List features
    Features,

    /// List run groups
    RunGroups,

    /// Check for a newer release
    Update,
}

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Test ids to run (or "all")
    #[arg(value_name = "TEST_ID")]
    pub args: Vec<String>,

    /// Comma-separated tags to filter tests
    #[arg(long, value_name = "TAGS")]
    pub tags: Option<String>,

    /// Site id to filter tests
    #[arg(long, value_name = "SITE_ID")]
    pub site: Option<i64>,

    /// Run group id to start
    #[arg(long, value_name = "ID")]
    pub run_group_id: Option<i64>,

    /// RFML files whose tests should run
    #[arg(short = 'f', long, value_name = "FILE", num_args = 1..)]
    pub files: Vec<String>,

    /// Folder id to run
    #[arg(long, value_name = "ID")]
    pub folder: Option<i64>,

    /// Browser to run against (repeatable)
    #[arg(long, value_name = "BROWSER")]
    pub browser: Vec<String>,

    /// Environment id to run against
    #[arg(long, value_name = "ID")]
    pub environment_id: Option<i64>,

    /// Crowd to run with (default, on_premise_crowd, automation, ...)
    #[arg(long, value_name = "CROWD")]
    pub crowd: Option<String>,

    /// What to do with runs already in progress (abort, abort-all)
    #[arg(long, value_name = "MODE")]
    pub conflict: Option<String>,

    /// Run description
    #[arg(long, value_name = "TEXT")]
    pub description: Option<String>,

    /// Release identifier to attach to the run
    #[arg(long, value_name = "TEXT")]
    pub release: Option<String>,

    /// Start the run and return without waiting for results
    #[arg(long)]
    pub bg: bool,
}

/// Arguments for the `new` command.
#[derive(Args, Debug)]
pub struct NewArgs {
    /// File name for the new test
    #[arg(value_name = "NAME")]
    pub args: Vec<String>,

    /// Test title
    #[arg(long, value_name = "TITLE")]
    pub title: Option<String>,

    /// Directory to write the test into
    #[arg(long, value_name = "DIR")]
    pub test_folder: Option<String>,
}

/// Arguments for commands taking an optional file or directory.
#[derive(Args, Debug)]
pub struct PathArgs {
    /// File or directory (defaults to the current directory)
    #[arg(value_name = "PATH")]
    pub args: Vec<String>,
}

/// Arguments for commands taking a single file.
#[derive(Args, Debug)]
pub struct FileArgs {
    /// RFML file
    #[arg(value_name = "FILE", required = true)]
    pub args: Vec<String>,
}

/// Arguments for the `download` command.
#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Comma-separated tags to filter tests
    #[arg(long, value_name = "TAGS")]
    pub tags: Option<String>,

    /// Site id to filter tests
    #[arg(long, value_name = "SITE_ID")]
    pub site: Option<i64>,

    /// Folder id to filter tests
    #[arg(long, value_name = "ID")]
    pub folder: Option<i64>,

    /// Directory to write tests into
    #[arg(long, value_name = "DIR")]
    pub test_folder: Option<String>,
}

/// Arguments for the `csv-upload` command.
#[derive(Args, Debug)]
pub struct CsvUploadArgs {
    /// CSV file to upload
    #[arg(long, value_name = "FILE", required = true)]
    pub csv_file: Option<String>,

    /// Name of the tabular variable
    #[arg(long, value_name = "NAME", required = true)]
    pub import_variable_name: Option<String>,

    /// Replace the variable if it already exists
    #[arg(long)]
    pub overwrite_variable: bool,
}

/// Arguments for the `mobile-upload` command.
#[derive(Args, Debug)]
pub struct MobileUploadArgs {
    /// App build to upload
    #[arg(value_name = "APP_FILE", required = true)]
    pub args: Vec<String>,

    /// Site id the app belongs to
    #[arg(long, value_name = "ID", required = true)]
    pub site_id: Option<i64>,

    /// Environment id the app belongs to
    #[arg(long, value_name = "ID", required = true)]
    pub environment_id: Option<i64>,

    /// App slot (1-5)
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub app_slot: i64,
}

/// Arguments for the `report` command.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Run id
    #[arg(value_name = "RUN_ID", required = true)]
    pub args: Vec<String>,

    /// Write a JUnit XML report to this path
    #[arg(long, value_name = "PATH")]
    pub junit_file: Option<String>,
}
