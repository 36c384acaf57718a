//! Contains the definition of [`TypeAdapterFactory`].

use std::sync::Arc;

use crate::{ErasedAdapter, Json, TypeAdapter, TypeToken};

/// Produces adapters for the types it claims.
///
/// Returning `None` lets [`Json`] fall through to the next registered
/// factory, and eventually to the default adapter. The returned adapter must
/// convert exactly the type named by the token; one that does not is
/// ignored.
pub trait TypeAdapterFactory: Send + Sync {
    /// Returns an adapter for the type named by `token`, or `None` if this
    /// factory does not handle it.
    fn create(&self, json: &Json, token: &TypeToken) -> Option<ErasedAdapter>;
}

/// Hands out one fixed adapter for exactly one type.
#[derive(Debug, Clone)]
pub struct SingleTypeFactory {
    adapter: ErasedAdapter,
}

impl SingleTypeFactory {
    /// Creates a factory that answers with `adapter` for `T` only.
    #[must_use]
    pub fn new<T: 'static>(adapter: Arc<dyn TypeAdapter<T>>) -> Self {
        Self { adapter: ErasedAdapter::new(adapter) }
    }
}

impl TypeAdapterFactory for SingleTypeFactory {
    fn create(&self, _: &Json, token: &TypeToken) -> Option<ErasedAdapter> {
        (self.adapter.token().id() == token.id()).then(|| self.adapter.clone())
    }
}
