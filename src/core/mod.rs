//! Core module - record identity, forms, transport and edit sessions

pub mod config;
pub mod data;
pub mod entity;
pub mod form;
pub mod identity;
pub mod memory;
pub mod navigation;
pub mod options;
pub mod reconcile;
pub mod resolver;
pub mod save;
pub mod session;
pub mod transport;

pub use config::Config;
pub use data::{load_file, load_file_into_form, FileLoadError, LoadedFile};
pub use entity::{Entity, ReferenceSpec, DOCUMENT_IS_NULL};
pub use form::{EntityForm, FieldViolation, FormError, Slot};
pub use identity::{same_identity, EntityKind, EntityRef, Identified, KindParseError};
pub use memory::{Call, MemoryTransport};
pub use navigation::{ErrorEvent, Navigator, Notifier, Recorder, Step, NOT_FOUND_PATH};
pub use options::{OptionCollections, OptionLoad};
pub use reconcile::add_to_collection_if_missing;
pub use resolver::{enter, resolve, Resolution};
pub use save::{PendingSave, SaveError, SaveOrchestrator, SaveOutcome, SaveRequest};
pub use session::{error_event, EditSession};
pub use transport::{EntityTransport, HttpTransport, Transport, TransportError};
