//! Entity identity: record kinds, identity projections and identity equality

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The record types managed by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Uploaded document metadata
    Document,
    /// Binary payload attached to at most one document
    Content,
    /// Car that documents belong to
    Car,
}

impl EntityKind {
    /// Get the singular name used on the command line and in messages
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Document => "document",
            EntityKind::Content => "content",
            EntityKind::Car => "car",
        }
    }

    /// Get the REST collection name (`/api/{resource}`)
    pub fn resource(&self) -> &'static str {
        match self {
            EntityKind::Document => "documents",
            EntityKind::Content => "contents",
            EntityKind::Car => "cars",
        }
    }

    /// Get all kinds
    pub fn all() -> &'static [EntityKind] {
        &[EntityKind::Document, EntityKind::Content, EntityKind::Car]
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = KindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "document" | "documents" => Ok(EntityKind::Document),
            "content" | "contents" => Ok(EntityKind::Content),
            "car" | "cars" => Ok(EntityKind::Car),
            _ => Err(KindParseError(s.to_string())),
        }
    }
}

/// Error returned when a kind name is not recognised
#[derive(Debug, Error)]
#[error("unknown entity kind: '{0}' (valid: document, content, car)")]
pub struct KindParseError(pub String);

/// Anything that carries an entity identifier
///
/// Drafts answer `None`; persisted records answer their backend id.
pub trait Identified {
    fn key(&self) -> Option<i64>;
}

/// Identity equality over two optional records
///
/// Both present: equal when their ids are equal. Both absent: equal.
/// Field contents are never compared.
pub fn same_identity<A, B>(a: Option<&A>, b: Option<&B>) -> bool
where
    A: Identified + ?Sized,
    B: Identified + ?Sized,
{
    match (a, b) {
        (Some(a), Some(b)) => a.key() == b.key(),
        (None, None) => true,
        _ => false,
    }
}

/// Identity projection of another record, as stored in a reference field
///
/// Only `id` is guaranteed; any further fields the backend sent along are
/// kept so option lists can show something more useful than a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: i64,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EntityRef {
    /// Create a bare `{id}` projection
    pub fn new(id: i64) -> Self {
        Self {
            id,
            extra: Map::new(),
        }
    }

    /// Human-readable label for selectors: the id, plus the first short text field if any
    pub fn label(&self) -> String {
        let text = self
            .extra
            .iter()
            .filter(|(k, _)| !k.ends_with("ContentType") && k.as_str() != "data")
            .find_map(|(_, v)| {
                v.as_str()
                    .filter(|s| !s.is_empty() && s.chars().count() <= 60)
            });

        match text {
            Some(text) => format!("{} ({})", self.id, text),
            None => self.id.to_string(),
        }
    }
}

impl Identified for EntityRef {
    fn key(&self) -> Option<i64> {
        Some(self.id)
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_identity_rules() {
        let one = EntityRef::new(1);
        let other_one = EntityRef::new(1);
        let two = EntityRef::new(2);

        assert!(same_identity(Some(&one), Some(&one)));
        assert!(same_identity(Some(&one), Some(&other_one)));
        assert!(!same_identity(Some(&one), Some(&two)));
        assert!(!same_identity(Some(&one), None::<&EntityRef>));
        assert!(!same_identity(None::<&EntityRef>, Some(&two)));
        assert!(same_identity(None::<&EntityRef>, None::<&EntityRef>));
    }

    #[test]
    fn test_same_identity_ignores_fields() {
        let mut a = EntityRef::new(7);
        a.extra.insert("model".into(), Value::from("Roadster"));
        let b = EntityRef::new(7);
        assert!(same_identity(Some(&a), Some(&b)));
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("Document".parse::<EntityKind>().unwrap(), EntityKind::Document);
        assert_eq!("contents".parse::<EntityKind>().unwrap(), EntityKind::Content);
        assert!("truck".parse::<EntityKind>().is_err());
        for kind in EntityKind::all() {
            assert_eq!(kind.as_str().parse::<EntityKind>().unwrap(), *kind);
        }
    }

    #[test]
    fn test_kind_resource() {
        assert_eq!(EntityKind::Document.resource(), "documents");
        assert_eq!(EntityKind::Car.resource(), "cars");
    }

    #[test]
    fn test_kind_orders_by_declaration() {
        let mut kinds = vec![EntityKind::Car, EntityKind::Document, EntityKind::Content];
        kinds.sort();
        assert_eq!(kinds, EntityKind::all());

        let mut keyed = std::collections::BTreeMap::new();
        keyed.insert((EntityKind::Car, 1), "Roadster");
        keyed.insert((EntityKind::Content, 1), "aGk=");
        keyed.insert((EntityKind::Car, 0), "Coupe");
        let order: Vec<_> = keyed.keys().copied().collect();
        assert_eq!(
            order,
            vec![(EntityKind::Content, 1), (EntityKind::Car, 0), (EntityKind::Car, 1)]
        );
    }

    #[test]
    fn test_entity_ref_keeps_extra_fields() {
        let r: EntityRef = serde_json::from_str(r#"{"id":3,"model":"Roadster"}"#).unwrap();
        assert_eq!(r.id, 3);
        assert_eq!(r.label(), "3 (Roadster)");
        let back = serde_json::to_value(&r).unwrap();
        assert_eq!(back["model"], "Roadster");
    }

    #[test]
    fn test_entity_ref_label_counts_characters() {
        let mut r = EntityRef::new(4);
        r.extra.insert("model".into(), Value::from("Ä".repeat(40)));
        assert_eq!(r.label(), format!("4 ({})", "Ä".repeat(40)));

        r.extra.insert("model".into(), Value::from("Ä".repeat(61)));
        assert_eq!(r.label(), "4");
    }

    #[test]
    fn test_entity_ref_bare_serializes_id_only() {
        let r = EntityRef::new(63005);
        assert_eq!(serde_json::to_string(&r).unwrap(), r#"{"id":63005}"#);
        assert_eq!(r.label(), "63005");
    }
}
