//! CLI command implementations

pub mod common;

pub mod car;
pub mod config;
pub mod content;
pub mod document;
