//! fua: file uploader admin
//!
//! A command-line admin client for the Document, Content and Car records of
//! a file uploader backend. Records are edited through typed forms whose
//! reference fields are backed by option lists that always contain the
//! current selection.

pub mod cli;
pub mod core;
pub mod entities;
