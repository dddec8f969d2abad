//! Option collections for reference selectors

use crate::core::entity::ReferenceSpec;
use crate::core::identity::{EntityKind, EntityRef};
use crate::core::reconcile::add_to_collection_if_missing;

/// One outstanding option-list query
///
/// Captures the value the reference held when loading began; the result is
/// reconciled against that snapshot, not against whatever the form holds by
/// the time the query returns.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionLoad {
    pub field: &'static str,
    pub target: EntityKind,
    pub filter: Option<&'static str>,
    pub selected: Option<EntityRef>,
    pub(crate) generation: u64,
}

impl OptionLoad {
    pub(crate) fn new(spec: &ReferenceSpec, selected: Option<&EntityRef>, generation: u64) -> Self {
        Self {
            field: spec.field,
            target: spec.target,
            filter: spec.filter,
            selected: selected.cloned(),
            generation,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Published option lists, one per reference field, in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionCollections {
    lists: Vec<(&'static str, Vec<EntityRef>)>,
}

impl OptionCollections {
    /// Empty lists for every declared reference
    pub fn for_references(specs: &[ReferenceSpec]) -> Self {
        Self {
            lists: specs.iter().map(|s| (s.field, Vec::new())).collect(),
        }
    }

    /// Current list for `field` (empty for unknown fields)
    pub fn get(&self, field: &str) -> &[EntityRef] {
        self.lists
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, items)| items.as_slice())
            .unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.lists.iter().map(|(name, _)| *name)
    }

    /// Make sure `selected` is offered in the list currently published for `field`
    pub fn include(&mut self, field: &str, selected: Option<&EntityRef>) {
        if let Some((_, items)) = self.lists.iter_mut().find(|(name, _)| *name == field) {
            *items = add_to_collection_if_missing(items.as_slice(), [selected]);
        }
    }

    /// Replace the list for `field` with a fresh query result, reconciled with `selected`
    pub fn publish(&mut self, field: &str, loaded: Vec<EntityRef>, selected: Option<&EntityRef>) {
        if let Some((_, items)) = self.lists.iter_mut().find(|(name, _)| *name == field) {
            *items = add_to_collection_if_missing(&loaded, [selected]);
        }
    }

    pub fn contains(&self, field: &str, id: i64) -> bool {
        self.get(field).iter().any(|r| r.id == id)
    }

    /// Look up the offered projection for `id`
    pub fn find(&self, field: &str, id: i64) -> Option<&EntityRef> {
        self.get(field).iter().find(|r| r.id == id)
    }
}
