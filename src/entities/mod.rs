//! Record type definitions
//!
//! - [`Document`] - an uploaded document, pointing at its [`Content`] and a [`Car`]
//! - [`Content`] - the binary payload of a document
//! - [`Car`] - a car a document can be filed under

pub mod car;
pub mod content;
pub mod document;

pub use car::{Car, CarForm};
pub use content::{Content, ContentForm};
pub use document::{Document, DocumentForm};
