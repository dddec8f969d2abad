//! Shared helper functions for CLI commands
//!
//! Terminal implementations of the core's navigation and alert collaborators
//! live here, together with small formatting utilities used by the list and
//! show output of every record command.

use console::style;

use crate::cli::GlobalOpts;
use crate::core::navigation::{ErrorEvent, Navigator, Notifier};
use crate::core::transport::HttpTransport;
use crate::core::Config;

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Effective configuration: files and environment, then global flags
pub fn effective_config(global: &GlobalOpts) -> Config {
    let mut config = Config::load();
    config.merge(Config {
        base_url: global.base_url.clone(),
        token: global.token.clone(),
        ..Default::default()
    });
    config
}

/// HTTP transport for the effective configuration
pub fn connect(global: &GlobalOpts) -> HttpTransport {
    effective_config(global).transport(global.verbose)
}

/// Where the terminal "view" ended up
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Destination {
    /// Still on the form
    #[default]
    Stayed,
    /// Left the form (after a successful save)
    Back,
    /// Sent somewhere else, e.g. the not-found page
    Route(String),
}

/// Navigator for a one-shot command: remembers where it was sent
#[derive(Debug, Default)]
pub struct TerminalNavigator {
    pub destination: Destination,
}

impl TerminalNavigator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Navigator for TerminalNavigator {
    fn go_to(&mut self, path: &str) {
        self.destination = Destination::Route(path.to_string());
    }

    fn go_back(&mut self) {
        self.destination = Destination::Back;
    }
}

/// Prints alerts to stderr as they arrive
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl TerminalNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for TerminalNotifier {
    fn publish(&mut self, event: ErrorEvent) {
        eprintln!(
            "{} {} {}",
            style("✗").red(),
            event.message,
            style(format!("[{}]", event.key)).dim()
        );
    }
}

/// Split a `key=value` assignment
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}
