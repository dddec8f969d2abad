//! Document entity type
//!
//! A document points at (at most) one content record and one car. Contents
//! are exclusive to one document, so the content selector only offers
//! contents that are not yet attached (`document-is-null`), plus whichever
//! content the document being edited already holds.

use serde::{Deserialize, Serialize};

use crate::core::entity::{Entity, ReferenceSpec, DOCUMENT_IS_NULL};
use crate::core::form::{
    parse_integer, parse_text, unknown_field, EntityForm, FieldViolation, FormError, Slot,
};
use crate::core::identity::{EntityKind, EntityRef, Identified};

/// Metadata of an uploaded file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Option<i64>,

    #[serde(default)]
    pub title: Option<String>,

    /// Size in bytes
    #[serde(default)]
    pub size: Option<i64>,

    #[serde(default)]
    pub mime_type: Option<String>,

    #[serde(default)]
    pub content: Option<EntityRef>,

    #[serde(default)]
    pub car: Option<EntityRef>,
}

impl Identified for Document {
    fn key(&self) -> Option<i64> {
        self.id
    }
}

impl Entity for Document {
    const KIND: EntityKind = EntityKind::Document;

    const REFERENCES: &'static [ReferenceSpec] = &[
        ReferenceSpec {
            field: "content",
            target: EntityKind::Content,
            filter: Some(DOCUMENT_IS_NULL),
        },
        ReferenceSpec {
            field: "car",
            target: EntityKind::Car,
            filter: None,
        },
    ];

    type Form = DocumentForm;

    fn reference(&self, field: &str) -> Option<&EntityRef> {
        match field {
            "content" => self.content.as_ref(),
            "car" => self.car.as_ref(),
            _ => None,
        }
    }
}

/// Edit form for [`Document`]
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentForm {
    pub id: Slot<Option<i64>>,
    pub title: Slot<Option<String>>,
    pub size: Slot<Option<i64>>,
    pub mime_type: Slot<Option<String>>,
    pub content: Slot<Option<EntityRef>>,
    pub car: Slot<Option<EntityRef>>,
}

impl EntityForm for DocumentForm {
    type Entity = Document;

    const FIELDS: &'static [&'static str] = &["id", "title", "size", "mimeType", "content", "car"];

    fn build(seed: Option<&Document>) -> Self {
        let raw = seed.cloned().unwrap_or_default();
        Self {
            id: Slot::locked(raw.id).required(),
            title: Slot::editable(raw.title).required(),
            size: Slot::editable(raw.size).required(),
            mime_type: Slot::editable(raw.mime_type),
            content: Slot::editable(raw.content),
            car: Slot::editable(raw.car),
        }
    }

    fn extract(&self) -> Document {
        Document {
            id: self.id.value(),
            title: self.title.value(),
            size: self.size.value(),
            mime_type: self.mime_type.value(),
            content: self.content.value(),
            car: self.car.value(),
        }
    }

    fn reset(&mut self, seed: &Document) {
        *self = Self::build(Some(seed));
    }

    fn set(&mut self, field: &str, raw: &str) -> Result<(), FormError> {
        match field {
            "id" => Err(FormError::ReadOnly("id")),
            "title" => self.title.set("title", parse_text(raw)),
            "size" => self.size.set("size", parse_integer(field, raw)?),
            "mimeType" | "mime_type" | "mime-type" => {
                self.mime_type.set("mimeType", parse_text(raw.trim()))
            }
            "content" => Err(FormError::ReferenceField("content")),
            "car" => Err(FormError::ReferenceField("car")),
            _ => Err(unknown_field(field, Self::FIELDS)),
        }
    }

    fn set_reference(&mut self, field: &str, value: Option<EntityRef>) -> Result<(), FormError> {
        match field {
            "content" => self.content.set("content", value),
            "car" => self.car.set("car", value),
            _ => Err(unknown_field(field, Self::FIELDS)),
        }
    }

    fn violations(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();
        if self.title.is_missing() {
            violations.push(FieldViolation::required("title"));
        }
        if self.size.is_missing() {
            violations.push(FieldViolation::required("size"));
        }
        violations
    }
}
