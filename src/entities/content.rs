//! Content entity type - the binary payload behind a document

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::form::{parse_text, unknown_field, EntityForm, FieldViolation, FormError, Slot};
use crate::core::identity::{EntityKind, Identified};

/// Uploaded bytes (base64 on the wire) and their media type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub id: Option<i64>,

    #[serde(default)]
    pub data: Option<String>,

    #[serde(default)]
    pub data_content_type: Option<String>,
}

impl Content {
    /// Decoded payload size in bytes, if the payload is valid base64
    pub fn decoded_len(&self) -> Option<usize> {
        let data = self.data.as_deref()?;
        STANDARD.decode(data).ok().map(|bytes| bytes.len())
    }
}

impl Identified for Content {
    fn key(&self) -> Option<i64> {
        self.id
    }
}

impl Entity for Content {
    const KIND: EntityKind = EntityKind::Content;
    type Form = ContentForm;
}

/// Edit form for [`Content`]
#[derive(Debug, Clone, PartialEq)]
pub struct ContentForm {
    pub id: Slot<Option<i64>>,
    pub data: Slot<Option<String>>,
    pub data_content_type: Slot<Option<String>>,
}

impl EntityForm for ContentForm {
    type Entity = Content;

    const FIELDS: &'static [&'static str] = &["id", "data", "dataContentType"];

    fn build(seed: Option<&Content>) -> Self {
        let raw = seed.cloned().unwrap_or_default();
        Self {
            id: Slot::locked(raw.id).required(),
            data: Slot::editable(raw.data).required(),
            data_content_type: Slot::editable(raw.data_content_type),
        }
    }

    fn extract(&self) -> Content {
        Content {
            id: self.id.value(),
            data: self.data.value(),
            data_content_type: self.data_content_type.value(),
        }
    }

    fn reset(&mut self, seed: &Content) {
        *self = Self::build(Some(seed));
    }

    fn set(&mut self, field: &str, raw: &str) -> Result<(), FormError> {
        match field {
            "id" => Err(FormError::ReadOnly("id")),
            "data" => {
                let raw = raw.trim();
                if !raw.is_empty() {
                    STANDARD.decode(raw).map_err(|e| FormError::InvalidValue {
                        field: "data".to_string(),
                        value: truncate(raw),
                        reason: e.to_string(),
                    })?;
                }
                self.data.set("data", parse_text(raw))
            }
            "dataContentType" | "data_content_type" | "content-type" => self
                .data_content_type
                .set("dataContentType", parse_text(raw.trim())),
            _ => Err(unknown_field(field, Self::FIELDS)),
        }
    }

    fn violations(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();
        if self.data.is_missing() {
            violations.push(FieldViolation::required("data"));
        }
        violations
    }
}

/// Shorten a rejected value for the error message, counting characters
fn truncate(raw: &str) -> String {
    if raw.chars().count() > 24 {
        let kept: String = raw.chars().take(21).collect();
        format!("{}...", kept)
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_form_requires_data_only() {
        let form = ContentForm::build(None);
        assert_eq!(form.violations(), vec![FieldViolation::required("data")]);
    }

    #[test]
    fn test_content_rejects_invalid_base64() {
        let mut form = ContentForm::build(None);
        let err = form.set("data", "not base64!").unwrap_err();
        assert!(matches!(err, FormError::InvalidValue { .. }));

        form.set("data", "aGVsbG8=").unwrap();
        form.set("dataContentType", "text/plain").unwrap();
        let content = form.extract();
        assert_eq!(content.decoded_len(), Some(5));
        assert_eq!(content.data_content_type.as_deref(), Some("text/plain"));
    }

    #[test]
    fn test_content_rejects_long_non_ascii_data() {
        let mut form = ContentForm::build(None);
        let raw = "é".repeat(30);
        let err = form.set("data", &raw).unwrap_err();
        match err {
            FormError::InvalidValue { field, value, .. } => {
                assert_eq!(field, "data");
                assert_eq!(value, format!("{}...", "é".repeat(21)));
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
        assert!(form.extract().data.is_none());
    }

    #[test]
    fn test_content_rejects_mixed_width_data() {
        let mut form = ContentForm::build(None);
        // 'ü' straddles byte 21 when preceded by 20 ASCII characters
        let raw = format!("{}ü{}", "a".repeat(20), "b".repeat(10));
        let err = form.set("data", &raw).unwrap_err();
        assert!(err.to_string().contains(&format!("{}ü...", "a".repeat(20))));

        let short = "日本語";
        let err = form.set("data", short).unwrap_err();
        assert!(err.to_string().contains(short));
    }

    #[test]
    fn test_content_type_accepts_non_ascii() {
        let mut form = ContentForm::build(None);
        form.set("dataContentType", " text/plain; charset=utf-8; name=\"résumé\" ")
            .unwrap();
        assert_eq!(
            form.extract().data_content_type.as_deref(),
            Some("text/plain; charset=utf-8; name=\"résumé\"")
        );
    }

    #[test]
    fn test_content_wire_names() {
        let content: Content =
            serde_json::from_str(r#"{"id":1,"data":"aGk=","dataContentType":"text/plain"}"#)
                .unwrap();
        assert_eq!(content.data_content_type.as_deref(), Some("text/plain"));
        let value = serde_json::to_value(&content).unwrap();
        assert!(value.get("dataContentType").is_some());
    }
}
