//! Save orchestration: create-or-update, in-flight tracking, outcome handling

use thiserror::Error;

use crate::core::entity::Entity;
use crate::core::form::{EntityForm, FormError};
use crate::core::transport::{EntityTransport, Transport, TransportError};

/// What a save will send to the backend
#[derive(Debug, Clone, PartialEq)]
pub enum SaveRequest<E> {
    /// The record has no id yet
    Create(E),
    /// The record exists; send the full value
    Update { id: i64, entity: E },
}

impl<E: Entity> SaveRequest<E> {
    /// Decide create vs update from the id alone
    pub fn for_entity(entity: E) -> Self {
        match entity.key() {
            Some(id) => SaveRequest::Update { id, entity },
            None => SaveRequest::Create(entity),
        }
    }

    pub fn entity(&self) -> &E {
        match self {
            SaveRequest::Create(entity) => entity,
            SaveRequest::Update { entity, .. } => entity,
        }
    }

    pub fn is_update(&self) -> bool {
        matches!(self, SaveRequest::Update { .. })
    }

    /// Send the request and wait for the backend's answer
    pub fn dispatch<T: Transport + ?Sized>(&self, transport: &T) -> Result<E, TransportError> {
        match self {
            SaveRequest::Create(draft) => transport.create_entity(draft),
            SaveRequest::Update { id, entity } => transport.update_entity(*id, entity),
        }
    }
}

/// A save that has been dispatched but not completed
///
/// Consumed by [`SaveOrchestrator::finish`], so each save completes once.
#[derive(Debug)]
#[must_use = "a pending save must be finished to clear the in-flight flag"]
pub struct PendingSave<E> {
    request: SaveRequest<E>,
    generation: u64,
}

impl<E> PendingSave<E> {
    pub fn request(&self) -> &SaveRequest<E> {
        &self.request
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// How a save ended
#[derive(Debug)]
pub enum SaveOutcome<E> {
    /// The backend accepted it; the view should be left
    Saved(E),
    /// The backend (or the connection) refused it; the view stays editable
    Failed(TransportError),
    /// The completion belongs to a session that has since been closed or reopened
    Stale,
}

impl<E> SaveOutcome<E> {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved(_))
    }
}

/// Errors that keep a save from being dispatched
#[derive(Debug, Error, PartialEq)]
pub enum SaveError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error("a save is already in progress")]
    InFlight,
}

/// Tracks the single outstanding save of one edit session
#[derive(Debug, Default)]
pub struct SaveOrchestrator {
    in_flight: bool,
}

impl SaveOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// True between `begin` and the matching `finish`
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Validate the form, extract its value and mark a save in flight
    ///
    /// An invalid form is never dispatched and leaves the flag untouched.
    pub fn begin<F>(&mut self, form: &F, generation: u64) -> Result<PendingSave<F::Entity>, SaveError>
    where
        F: EntityForm,
        F::Entity: Entity,
    {
        if self.in_flight {
            return Err(SaveError::InFlight);
        }
        form.validate()?;

        self.in_flight = true;
        Ok(PendingSave {
            request: SaveRequest::for_entity(form.extract()),
            generation,
        })
    }

    /// Apply the backend's answer to a pending save
    ///
    /// Clears the in-flight flag whatever the result, unless the save belongs
    /// to an older generation (the session was closed and the flag already
    /// cleared then).
    pub fn finish<E>(
        &mut self,
        pending: PendingSave<E>,
        result: Result<E, TransportError>,
        current_generation: u64,
    ) -> SaveOutcome<E> {
        if pending.generation != current_generation {
            return SaveOutcome::Stale;
        }

        self.in_flight = false;
        match result {
            Ok(saved) => SaveOutcome::Saved(saved),
            Err(err) => SaveOutcome::Failed(err),
        }
    }

    /// Forget any outstanding save (session closed)
    pub fn cancel(&mut self) {
        self.in_flight = false;
    }
}
