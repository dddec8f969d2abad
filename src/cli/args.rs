//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    car::CarCommands, config::ConfigCommands, content::ContentCommands,
    document::DocumentCommands,
};

#[derive(Parser)]
#[command(name = "fua")]
#[command(author, version, about = "File uploader admin client")]
#[command(long_about = "Create, edit and inspect the Document, Content and Car records of a file uploader backend.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug, Default)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Print each backend request before running it
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Backend root URL (overrides config and FUA_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Bearer token (overrides config and FUA_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Document management
    #[command(subcommand)]
    Document(DocumentCommands),

    /// Content (uploaded file data) management
    #[command(subcommand)]
    Content(ContentCommands),

    /// Car management
    #[command(subcommand)]
    Car(CarCommands),

    /// Show configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (yaml for show, table for list)
    #[default]
    Auto,
    /// YAML format
    Yaml,
    /// JSON format (for programming)
    Json,
}
