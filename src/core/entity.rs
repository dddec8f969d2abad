//! Entity trait - common interface for all record types

use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

use crate::core::form::EntityForm;
use crate::core::identity::{EntityKind, EntityRef, Identified};

/// Content filter: only contents not yet attached to any document
pub const DOCUMENT_IS_NULL: &str = "document-is-null";

/// A reference field declared by an entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceSpec {
    /// Form field holding the reference
    pub field: &'static str,
    /// Kind of record the field points at
    pub target: EntityKind,
    /// Backend filter applied when loading candidates (e.g. `document-is-null`)
    pub filter: Option<&'static str>,
}

/// Common trait for the Document, Content and Car records
///
/// `Default` must produce the draft: `id` absent, every other field empty.
pub trait Entity: Identified + Serialize + DeserializeOwned + Clone + Debug + Default {
    /// The record kind this type maps to
    const KIND: EntityKind;

    /// Reference fields, in the order their option lists are loaded
    const REFERENCES: &'static [ReferenceSpec] = &[];

    /// The typed form used to edit this record
    type Form: EntityForm<Entity = Self>;

    /// Current value of a reference field (`None` if unset or not a reference)
    fn reference(&self, _field: &str) -> Option<&EntityRef> {
        None
    }

    /// Whether this value has never been persisted
    fn is_draft(&self) -> bool {
        self.key().is_none()
    }
}
