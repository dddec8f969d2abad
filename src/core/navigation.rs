//! Navigation and notification collaborators
//!
//! The core never decides *how* leaving a view or showing an alert looks; it
//! only asks a [`Navigator`] to go somewhere and a [`Notifier`] to publish an
//! error. The CLI provides terminal implementations, tests use [`Recorder`].

use std::fmt;

/// Destination used when a requested record does not exist
pub const NOT_FOUND_PATH: &str = "404";

/// Moves between views
pub trait Navigator {
    fn go_to(&mut self, path: &str);
    fn go_back(&mut self);
}

/// An error event for the alert area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEvent {
    /// Translation-style key, e.g. `error.file.not.image`
    pub key: String,
    pub message: String,
}

impl ErrorEvent {
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ErrorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.key)
    }
}

/// Receives error events
pub trait Notifier {
    fn publish(&mut self, event: ErrorEvent);
}

/// A navigation step taken through a [`Recorder`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    GoTo(String),
    Back,
}

/// Navigator and notifier that simply remembers what it was asked to do
#[derive(Debug, Default)]
pub struct Recorder {
    pub steps: Vec<Step>,
    pub events: Vec<ErrorEvent>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `go_back` was called
    pub fn backs(&self) -> usize {
        self.steps.iter().filter(|s| **s == Step::Back).count()
    }
}

impl Navigator for Recorder {
    fn go_to(&mut self, path: &str) {
        self.steps.push(Step::GoTo(path.to_string()));
    }

    fn go_back(&mut self) {
        self.steps.push(Step::Back);
    }
}

impl Notifier for Recorder {
    fn publish(&mut self, event: ErrorEvent) {
        self.events.push(event);
    }
}
