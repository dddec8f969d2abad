//! Entity resolution before entering a show/edit view

use crate::core::entity::Entity;
use crate::core::navigation::{Navigator, NOT_FOUND_PATH};
use crate::core::transport::{EntityTransport, Transport, TransportError};

/// Outcome of resolving the id a view was opened with
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<E> {
    /// No id was requested: the view creates a new record
    New,
    /// The record exists
    Found(E),
    /// The backend answered with an empty body
    NotFound,
}

impl<E> Resolution<E> {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Resolution::NotFound)
    }

    /// Seed for the view, or `None` when the view must not be entered
    pub fn into_seed(self) -> Option<Option<E>> {
        match self {
            Resolution::New => Some(None),
            Resolution::Found(entity) => Some(Some(entity)),
            Resolution::NotFound => None,
        }
    }
}

/// Resolve `requested` into the record a view should start from
///
/// An absent or empty id means "new" and issues no request. Transport errors
/// are returned as-is.
pub fn resolve<E, T>(transport: &T, requested: Option<&str>) -> Result<Resolution<E>, TransportError>
where
    E: Entity,
    T: Transport + ?Sized,
{
    let id = match requested.map(str::trim) {
        Some(id) if !id.is_empty() => id,
        _ => return Ok(Resolution::New),
    };

    match transport.fetch_entity::<E>(id)? {
        Some(entity) => Ok(Resolution::Found(entity)),
        None => Ok(Resolution::NotFound),
    }
}

/// Enter a view: redirect to the not-found destination when needed
///
/// Returns the view's seed, or `None` after redirecting.
pub fn enter<E>(resolution: Resolution<E>, navigator: &mut dyn Navigator) -> Option<Option<E>> {
    if resolution.is_not_found() {
        navigator.go_to(NOT_FOUND_PATH);
    }
    resolution.into_seed()
}
