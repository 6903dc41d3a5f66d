//! Type-name dispatch over decoded entities.
//!
//! # Example
//!
//! ```rust
//! use astreams::{Dispatcher, TypeRegistry};
//! use serde_json::json;
//!
//! let dispatcher = Dispatcher::new()
//!     .on("Follow", |_| "follow")
//!     .on("Activity", |_| "other activity");
//!
//! let registry = TypeRegistry::activity_streams();
//! let doc = json!({"type": "Like", "actor": "https://example.com/users/alice"});
//! assert_eq!(dispatcher.resolve(&doc, registry).unwrap(), "other activity");
//! ```

use rustc_hash::FxHashMap;
use serde_json::Value;
use thiserror::Error;

use crate::codec::decode_entity;
use crate::error::DecodeError;
use crate::model::Entity;
use crate::registry::TypeRegistry;

/// Error from [`Dispatcher::resolve`] and [`Dispatcher::dispatch`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("no handler for any of {types:?}")]
    NoHandler { types: Vec<String> },
}

type Handler<'h, T> = Box<dyn Fn(&Entity) -> T + Send + Sync + 'h>;

/// Routes entities to handlers by type name.
///
/// The entity's own `type` names are tried in document order, then the
/// ancestors of its term, nearest first. A handler registered for a parent
/// therefore catches every subtype without its own handler.
pub struct Dispatcher<'h, T> {
    handlers: FxHashMap<String, Handler<'h, T>>,
}

impl<'h, T> Default for Dispatcher<'h, T> {
    fn default() -> Self {
        Self { handlers: FxHashMap::default() }
    }
}

impl<'h, T> Dispatcher<'h, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `type_name`, replacing any earlier one.
    pub fn on<F>(mut self, type_name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Entity) -> T + Send + Sync + 'h,
    {
        self.handlers.insert(type_name.into(), Box::new(handler));
        self
    }

    pub fn handles(&self, type_name: &str) -> bool {
        self.handlers.contains_key(type_name)
    }

    /// Runs the most specific handler for `entity`.
    pub fn dispatch(&self, entity: &Entity) -> Result<T, DispatchError> {
        let candidates = entity
            .type_names()
            .chain(std::iter::once(entity.type_name()))
            .chain(entity.term().ancestors().iter().map(String::as_str));
        for name in candidates {
            if let Some(handler) = self.handlers.get(name) {
                tracing::trace!(type_name = name, "dispatching");
                return Ok(handler(entity));
            }
        }
        Err(DispatchError::NoHandler {
            types: entity.type_names().map(str::to_string).collect(),
        })
    }

    /// Decodes `doc` and dispatches the result.
    pub fn resolve(&self, doc: &Value, registry: &TypeRegistry) -> Result<T, DispatchError> {
        let entity = decode_entity(doc, registry)?;
        self.dispatch(&entity)
    }
}

impl<T> std::fmt::Debug for Dispatcher<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("Dispatcher").field("handlers", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dispatcher() -> Dispatcher<'static, &'static str> {
        Dispatcher::new()
            .on("Create", |_| "create")
            .on("Activity", |_| "activity")
            .on("Object", |_| "object")
            .on("custom:Poll", |_| "poll")
    }

    #[test]
    fn test_exact_type_wins() {
        let registry = TypeRegistry::activity_streams();
        assert_eq!(dispatcher().resolve(&json!({"type": "Create"}), registry), Ok("create"));
    }

    #[test]
    fn test_falls_back_to_nearest_ancestor() {
        let registry = TypeRegistry::activity_streams();
        assert_eq!(dispatcher().resolve(&json!({"type": "TentativeAccept"}), registry), Ok("activity"));
        assert_eq!(dispatcher().resolve(&json!({"type": "Note"}), registry), Ok("object"));
    }

    #[test]
    fn test_document_type_names_come_first() {
        let registry = TypeRegistry::activity_streams();
        // Decoded as Question, but the extension name has its own handler
        let doc = json!({"type": ["custom:Poll", "Question"]});
        assert_eq!(dispatcher().resolve(&doc, registry), Ok("poll"));
    }

    #[test]
    fn test_no_handler() {
        let registry = TypeRegistry::activity_streams();
        let only_create = Dispatcher::new().on("Create", |_| ());
        assert_eq!(
            only_create.resolve(&json!({"type": "Mention"}), registry),
            Err(DispatchError::NoHandler { types: vec!["Mention".to_string()] })
        );
    }

    #[test]
    fn test_decode_errors_propagate() {
        let registry = TypeRegistry::activity_streams();
        assert!(matches!(
            dispatcher().resolve(&json!({"type": "Unheard"}), registry),
            Err(DispatchError::Decode(DecodeError::UnhandledType { .. }))
        ));
    }

    #[test]
    fn test_handlers_see_the_entity() {
        let registry = TypeRegistry::activity_streams();
        let dispatcher = Dispatcher::new().on("Note", |note: &Entity| note.values("name").len());
        let doc = json!({"type": "Note", "name": ["a", "b"]});
        assert_eq!(dispatcher.resolve(&doc, registry), Ok(2));
        assert!(dispatcher.handles("Note"));
        assert!(!dispatcher.handles("Article"));
    }
}
