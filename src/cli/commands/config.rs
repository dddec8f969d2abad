//! `fua config` command - Configuration inspection

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::effective_config;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::LOCAL_CONFIG_FILE;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Show paths to configuration files
    Path,

    /// List all available configuration keys
    Keys,
}

/// Valid configuration keys
const VALID_KEYS: &[(&str, &str)] = &[
    ("base_url", "Backend root URL (default http://localhost:8080)"),
    ("token", "Bearer token sent with every request"),
    ("timeout_secs", "Per-request timeout in seconds (default 30)"),
];

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show => run_show(global),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(global: &GlobalOpts) -> Result<()> {
    let config = effective_config(global);

    // Never print the token itself
    let shown = Config {
        base_url: Some(config.base_url().to_string()),
        token: config.masked_token(),
        timeout_secs: Some(config.timeout().as_secs()),
    };

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&shown).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&shown).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Auto => {
            println!("{}", style("Effective Configuration").bold().underlined());
            println!();

            print_config_value("base_url", shown.base_url.as_deref());
            print_config_value("token", shown.token.as_deref());
            print_config_value("timeout_secs", Some(&config.timeout().as_secs().to_string()));

            if !global.quiet {
                println!();
                println!("{}", style("Config Sources (in priority order):").dim());
                println!("  1. Command-line flags (--base-url, --token)");
                println!("  2. Environment variables (FUA_BASE_URL, FUA_TOKEN)");
                println!("  3. Local config ({})", LOCAL_CONFIG_FILE);
                println!("  4. Global config (~/.config/fua/config.yaml)");
            }
        }
    }

    Ok(())
}

fn print_config_value(key: &str, value: Option<&str>) {
    match value {
        Some(v) => println!("  {} = {}", style(key).cyan(), style(v).yellow()),
        None => println!("  {} = {}", style(key).cyan(), style("(not set)").dim()),
    }
}

fn run_path() -> Result<()> {
    let global_path = Config::global_config_path()
        .ok_or_else(|| miette::miette!("Could not determine config directory"))?;
    let local_path = std::env::current_dir().into_diagnostic()?.join(LOCAL_CONFIG_FILE);

    println!("{}", style("Configuration file paths:").bold());
    println!();
    for (label, path) in [("Global:", &global_path), ("Local:", &local_path)] {
        println!("  {} {}", style(label).cyan(), path.display());
        if path.exists() {
            println!("         {}", style("(exists)").green());
        } else {
            println!("         {}", style("(not created)").dim());
        }
    }

    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();
    for (key, description) in VALID_KEYS {
        println!("  {:<14} {}", style(key).cyan(), description);
    }
    Ok(())
}
