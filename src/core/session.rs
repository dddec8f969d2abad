//! Edit sessions
//!
//! An [`EditSession`] is the context of one create/edit view: the typed form,
//! the option lists published for its reference fields, the save orchestrator
//! and a generation counter. Every suspension point is split into a `begin_*`
//! step that hands out a token and a `complete_*`/`finish_*` step that applies
//! the backend's answer. Tokens from an older generation (the session was
//! closed or reopened in between) are discarded on completion.
//!
//! `load_options` and `save` run both halves back to back against a blocking
//! [`Transport`].

use crate::core::entity::Entity;
use crate::core::form::{parse_reference, EntityForm, FormError};
use crate::core::identity::EntityRef;
use crate::core::navigation::{ErrorEvent, Navigator, Notifier};
use crate::core::options::{OptionCollections, OptionLoad};
use crate::core::save::{PendingSave, SaveError, SaveOrchestrator, SaveOutcome};
use crate::core::transport::{EntityTransport, Transport, TransportError};

/// State of one create/edit view
#[derive(Debug)]
pub struct EditSession<E: Entity> {
    form: E::Form,
    seed: Option<E>,
    options: OptionCollections,
    saver: SaveOrchestrator,
    generation: u64,
    saved: Option<E>,
}

impl<E: Entity> Default for EditSession<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> EditSession<E> {
    /// A session showing the empty draft form
    pub fn new() -> Self {
        Self {
            form: E::Form::build(None),
            seed: None,
            options: OptionCollections::for_references(E::REFERENCES),
            saver: SaveOrchestrator::new(),
            generation: 0,
            saved: None,
        }
    }

    /// Start editing `seed` (or a new record when `None`)
    ///
    /// Starts a new generation, resets the form and publishes each reference's
    /// current value as its provisional option list. Returns the option loads
    /// to run.
    pub fn open(&mut self, seed: Option<E>) -> Vec<OptionLoad> {
        self.close();
        self.options = OptionCollections::for_references(E::REFERENCES);
        self.saved = None;

        match &seed {
            Some(entity) => {
                self.form.reset(entity);
                for spec in E::REFERENCES {
                    self.options.include(spec.field, entity.reference(spec.field));
                }
            }
            None => self.form = E::Form::build(None),
        }
        self.seed = seed;

        self.begin_option_loads()
    }

    /// Option loads for every reference, against the current seed snapshot
    pub fn begin_option_loads(&self) -> Vec<OptionLoad> {
        E::REFERENCES
            .iter()
            .map(|spec| {
                let selected = self.seed.as_ref().and_then(|s| s.reference(spec.field));
                OptionLoad::new(spec, selected, self.generation)
            })
            .collect()
    }

    /// Publish a finished option query; returns false if the load was stale
    pub fn complete_option_load(&mut self, load: OptionLoad, loaded: Vec<EntityRef>) -> bool {
        if load.generation != self.generation {
            return false;
        }
        self.options.publish(load.field, loaded, load.selected.as_ref());
        true
    }

    /// Run every option load against `transport`
    ///
    /// A failing query leaves that field's list as it was and publishes the
    /// error; the other fields still load.
    pub fn load_options<T>(&mut self, transport: &T, notifier: &mut dyn Notifier)
    where
        T: Transport + ?Sized,
    {
        for load in self.begin_option_loads() {
            match transport.query_refs(load.target, load.filter) {
                Ok(loaded) => {
                    self.complete_option_load(load, loaded);
                }
                Err(err) => notifier.publish(error_event(&err)),
            }
        }
    }

    /// End the session: pending loads and saves become stale
    pub fn close(&mut self) {
        self.generation += 1;
        self.saver.cancel();
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn form(&self) -> &E::Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut E::Form {
        &mut self.form
    }

    /// The record the session was opened with
    pub fn seed(&self) -> Option<&E> {
        self.seed.as_ref()
    }

    /// The backend's version of the record after a successful save
    pub fn saved(&self) -> Option<&E> {
        self.saved.as_ref()
    }

    pub fn options(&self, field: &str) -> &[EntityRef] {
        self.options.get(field)
    }

    pub fn option_collections(&self) -> &OptionCollections {
        &self.options
    }

    pub fn is_saving(&self) -> bool {
        self.saver.is_in_flight()
    }

    /// Assign a textual value to a field
    ///
    /// Reference fields take an id (or `none`) that must be offered in the
    /// field's option list.
    pub fn set(&mut self, field: &str, raw: &str) -> Result<(), FormError> {
        if is_reference::<E>(field) {
            let id = parse_reference(field, raw)?.map(|r| r.id);
            return self.select_reference(field, id);
        }
        self.form.set(field, raw)
    }

    /// Select one of the offered options for a reference field, or clear it
    pub fn select_reference(&mut self, field: &str, id: Option<i64>) -> Result<(), FormError> {
        let value = match id {
            Some(id) => Some(
                self.options
                    .find(field, id)
                    .cloned()
                    .ok_or_else(|| FormError::UnknownOption {
                        field: field.to_string(),
                        id,
                    })?,
            ),
            None => None,
        };
        self.form.set_reference(field, value)
    }

    /// Validate, extract and mark the save in flight
    pub fn begin_save(&mut self) -> Result<PendingSave<E>, SaveError> {
        self.saver.begin(&self.form, self.generation)
    }

    /// Apply a save's result; remembers the saved record on success
    pub fn finish_save(
        &mut self,
        pending: PendingSave<E>,
        result: Result<E, TransportError>,
    ) -> SaveOutcome<E> {
        let outcome = self.saver.finish(pending, result, self.generation);
        if let SaveOutcome::Saved(saved) = &outcome {
            self.saved = Some(saved.clone());
        }
        outcome
    }

    /// Save the form: create or update, then leave on success
    ///
    /// On failure nothing navigates; the error goes to `notifier` and the form
    /// stays as it is so the user can try again.
    pub fn save<T>(
        &mut self,
        transport: &T,
        navigator: &mut dyn Navigator,
        notifier: &mut dyn Notifier,
    ) -> Result<SaveOutcome<E>, SaveError>
    where
        T: Transport + ?Sized,
    {
        let pending = self.begin_save()?;
        let result = pending.request().dispatch(transport);
        let outcome = self.finish_save(pending, result);

        match &outcome {
            SaveOutcome::Saved(_) => navigator.go_back(),
            SaveOutcome::Failed(err) => notifier.publish(error_event(err)),
            SaveOutcome::Stale => {}
        }
        Ok(outcome)
    }
}

fn is_reference<E: Entity>(field: &str) -> bool {
    E::REFERENCES.iter().any(|spec| spec.field == field)
}

/// Alert for a failed request, keyed by HTTP status when there is one
pub fn error_event(err: &TransportError) -> ErrorEvent {
    let key = match err.status() {
        Some(status) => format!("error.http.{}", status),
        None => "error.http.0".to_string(),
    };
    ErrorEvent::new(key, err.to_string())
}
