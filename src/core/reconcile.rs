//! Option-collection reconciliation
//!
//! A reference field's selector must always be able to show the value the
//! record currently holds, even when the backend query that produced the
//! option list did not return it (e.g. the `document-is-null` content filter
//! excludes the very content attached to the document being edited).

use crate::core::identity::{same_identity, Identified};

/// Prepend every present candidate that is not already in `collection`
///
/// Candidates are taken in order and deduplicated against the collection and
/// against each other, so the first new candidate ends up first. Absent
/// candidates are skipped. The input is left untouched.
pub fn add_to_collection_if_missing<'a, T, I>(collection: &[T], candidates: I) -> Vec<T>
where
    T: Identified + Clone + 'a,
    I: IntoIterator<Item = Option<&'a T>>,
{
    let mut added: Vec<T> = Vec::new();

    for candidate in candidates.into_iter().flatten() {
        let listed = collection
            .iter()
            .chain(added.iter())
            .any(|member| same_identity(Some(member), Some(candidate)));
        if !listed {
            added.push(candidate.clone());
        }
    }

    if added.is_empty() {
        return collection.to_vec();
    }

    added.extend(collection.iter().cloned());
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::EntityRef;

    fn ids(items: &[EntityRef]) -> Vec<i64> {
        items.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_missing_candidate_is_prepended() {
        let collection = vec![EntityRef::new(3011)];
        let candidate = EntityRef::new(63005);
        let result = add_to_collection_if_missing(&collection, [Some(&candidate)]);
        assert_eq!(ids(&result), vec![63005, 3011]);
        assert_eq!(ids(&collection), vec![3011]);
    }

    #[test]
    fn test_listed_candidate_not_duplicated() {
        let collection = vec![EntityRef::new(63005)];
        let candidate = EntityRef::new(63005);
        let result = add_to_collection_if_missing(&collection, [Some(&candidate)]);
        assert_eq!(ids(&result), vec![63005]);
    }

    #[test]
    fn test_absent_candidate_returns_collection() {
        let collection = vec![EntityRef::new(1), EntityRef::new(2)];
        let result = add_to_collection_if_missing(&collection, [None]);
        assert_eq!(result, collection);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let collection = vec![EntityRef::new(3011)];
        let candidate = EntityRef::new(63005);
        let once = add_to_collection_if_missing(&collection, [Some(&candidate)]);
        let twice = add_to_collection_if_missing(&once, [Some(&candidate)]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_multiple_candidates_keep_order() {
        let collection = vec![EntityRef::new(10)];
        let (a, b, c) = (EntityRef::new(1), EntityRef::new(10), EntityRef::new(2));
        let result =
            add_to_collection_if_missing(&collection, [Some(&a), None, Some(&b), Some(&c), Some(&a)]);
        assert_eq!(ids(&result), vec![1, 2, 10]);
    }

    #[test]
    fn test_empty_collection() {
        let candidate = EntityRef::new(5);
        let result = add_to_collection_if_missing(&[], [Some(&candidate)]);
        assert_eq!(ids(&result), vec![5]);
    }
}
