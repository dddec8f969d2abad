//! In-process backend
//!
//! [`MemoryTransport`] behaves like the REST backend closely enough to drive
//! edit sessions without a server: it assigns ids on create, rejects updates
//! of unknown or mismatched ids, understands the `document-is-null` content
//! filter, and answers a fetch of an unknown id with an empty body. Every call
//! is recorded, and failures can be queued to exercise error paths.

use serde_json::{json, Value};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};

use crate::core::entity::DOCUMENT_IS_NULL;
use crate::core::identity::EntityKind;
use crate::core::transport::{Transport, TransportError};

/// A recorded request
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Query {
        kind: EntityKind,
        filter: Option<String>,
    },
    Fetch {
        kind: EntityKind,
        id: String,
    },
    Create {
        kind: EntityKind,
        body: Value,
    },
    Update {
        kind: EntityKind,
        id: i64,
        body: Value,
    },
    Delete {
        kind: EntityKind,
        id: i64,
    },
}

/// In-memory stand-in for the REST backend
#[derive(Debug, Default)]
pub struct MemoryTransport {
    records: RefCell<BTreeMap<(EntityKind, i64), Value>>,
    next_id: Cell<i64>,
    calls: RefCell<Vec<Call>>,
    failures: RefCell<VecDeque<TransportError>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(1000),
            ..Default::default()
        }
    }

    /// Store a record as if it already existed on the backend
    pub fn insert(&self, kind: EntityKind, record: Value) -> i64 {
        let id = match record.get("id").and_then(Value::as_i64) {
            Some(id) => id,
            None => self.allocate_id(),
        };
        let mut record = record;
        record["id"] = json!(id);
        self.records.borrow_mut().insert((kind, id), record);
        id
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(self, kind: EntityKind, record: Value) -> Self {
        self.insert(kind, record);
        self
    }

    /// Make the next request fail with `error`
    pub fn fail_next(&self, error: TransportError) {
        self.failures.borrow_mut().push_back(error);
    }

    /// Requests seen so far, in order
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Current stored value of a record
    pub fn get(&self, kind: EntityKind, id: i64) -> Option<Value> {
        self.records.borrow().get(&(kind, id)).cloned()
    }

    fn allocate_id(&self) -> i64 {
        let mut id = self.next_id.get();
        while self.records.borrow().keys().any(|(_, existing)| *existing == id) {
            id += 1;
        }
        self.next_id.set(id + 1);
        id
    }

    fn record(&self, call: Call) -> Result<(), TransportError> {
        self.calls.borrow_mut().push(call);
        match self.failures.borrow_mut().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn bad_request(method: &str, kind: EntityKind, detail: &str) -> TransportError {
        TransportError::Status {
            method: method.to_string(),
            url: format!("/api/{}", kind.resource()),
            status: 400,
            detail: Some(detail.to_string()),
        }
    }

    /// Ids of contents currently attached to some document
    fn attached_contents(&self) -> Vec<i64> {
        self.records
            .borrow()
            .iter()
            .filter(|((kind, _), _)| *kind == EntityKind::Document)
            .filter_map(|(_, doc)| doc.get("content").and_then(|c| c.get("id")).and_then(Value::as_i64))
            .collect()
    }
}

impl Transport for MemoryTransport {
    fn query(&self, kind: EntityKind, filter: Option<&str>) -> Result<Vec<Value>, TransportError> {
        self.record(Call::Query {
            kind,
            filter: filter.map(String::from),
        })?;

        let attached = match (kind, filter) {
            (EntityKind::Content, Some(DOCUMENT_IS_NULL)) => self.attached_contents(),
            _ => Vec::new(),
        };

        Ok(self
            .records
            .borrow()
            .iter()
            .filter(|((k, id), _)| *k == kind && !attached.contains(id))
            .map(|(_, v)| v.clone())
            .collect())
    }

    fn fetch(&self, kind: EntityKind, id: &str) -> Result<Option<Value>, TransportError> {
        self.record(Call::Fetch {
            kind,
            id: id.to_string(),
        })?;
        let Ok(id) = id.parse::<i64>() else {
            return Err(Self::bad_request("GET", kind, "Invalid id"));
        };
        Ok(self.get(kind, id))
    }

    fn create(&self, kind: EntityKind, draft: &Value) -> Result<Value, TransportError> {
        self.record(Call::Create {
            kind,
            body: draft.clone(),
        })?;
        if draft.get("id").is_some_and(|id| !id.is_null()) {
            return Err(Self::bad_request("POST", kind, "A new entity cannot already have an ID"));
        }
        let mut record = draft.clone();
        let id = self.allocate_id();
        record["id"] = json!(id);
        self.records.borrow_mut().insert((kind, id), record.clone());
        Ok(record)
    }

    fn update(&self, kind: EntityKind, id: i64, entity: &Value) -> Result<Value, TransportError> {
        self.record(Call::Update {
            kind,
            id,
            body: entity.clone(),
        })?;
        match entity.get("id").and_then(Value::as_i64) {
            None => return Err(Self::bad_request("PUT", kind, "Invalid id")),
            Some(body_id) if body_id != id => {
                return Err(Self::bad_request("PUT", kind, "Invalid ID"))
            }
            Some(_) => {}
        }
        let mut records = self.records.borrow_mut();
        if !records.contains_key(&(kind, id)) {
            return Err(Self::bad_request("PUT", kind, "Entity not found"));
        }
        records.insert((kind, id), entity.clone());
        Ok(entity.clone())
    }

    fn delete(&self, kind: EntityKind, id: i64) -> Result<(), TransportError> {
        self.record(Call::Delete { kind, id })?;
        self.records.borrow_mut().remove(&(kind, id));
        Ok(())
    }
}
