//! The adapter contract and its type-erased form.

use std::{
    any::{Any, TypeId},
    fmt::{Debug, Display},
    marker::PhantomData,
    sync::Arc,
};

use serde::{de::DeserializeOwned, Serialize};

use crate::{Error, JsonReader, JsonWriter};

/// Converts values of type `T` to and from JSON.
///
/// `None` stands for the absent value and conventionally maps to `null`.
pub trait TypeAdapter<T>: Send + Sync {
    /// Writes `value` to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented or the sink
    /// rejects it.
    fn write(
        &self,
        out: &mut JsonWriter,
        value: Option<&T>,
    ) -> Result<(), Error>;

    /// Reads a value from `input`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is exhausted or does not hold a valid
    /// representation of `T`.
    fn read(&self, input: &mut JsonReader) -> Result<Option<T>, Error>;
}

/// Identifies the concrete type an adapter is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeToken {
    id: TypeId,
    name: &'static str,
}

impl TypeToken {
    /// Returns the token of `T`.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self { id: TypeId::of::<T>(), name: std::any::type_name::<T>() }
    }

    /// Returns the [`TypeId`] of the type.
    #[must_use]
    pub const fn id(&self) -> TypeId { self.id }

    /// Returns the name of the type, as reported by
    /// [`std::any::type_name`].
    #[must_use]
    pub const fn name(&self) -> &'static str { self.name }

    /// Returns `true` if this is the token of exactly `T`.
    #[must_use]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl Display for TypeToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

/// A [`TypeAdapter`] with its value type erased, as handed out by
/// factories.
#[derive(Clone)]
pub struct ErasedAdapter {
    token: TypeToken,
    adapter: Arc<dyn Any + Send + Sync>,
}

impl ErasedAdapter {
    /// Erases the value type of the given adapter.
    #[must_use]
    pub fn new<T: 'static>(adapter: Arc<dyn TypeAdapter<T>>) -> Self {
        let adapter: Arc<dyn Any + Send + Sync> = Arc::new(adapter);

        Self { token: TypeToken::of::<T>(), adapter }
    }

    /// Returns the token of the type the adapter converts.
    #[must_use]
    pub const fn token(&self) -> TypeToken { self.token }

    /// Recovers the typed adapter, or `None` if it converts a type other
    /// than `T`.
    #[must_use]
    pub fn downcast<T: 'static>(&self) -> Option<Arc<dyn TypeAdapter<T>>> {
        self.adapter.downcast_ref::<Arc<dyn TypeAdapter<T>>>().cloned()
    }
}

impl Debug for ErasedAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErasedAdapter")
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

/// The adapter used when no factory claims a type: the type's own serde
/// implementation, with `null` standing for the absent value.
pub struct SerdeAdapter<T>(PhantomData<fn() -> T>);

impl<T> SerdeAdapter<T> {
    /// Creates the adapter.
    #[must_use]
    pub const fn new() -> Self { Self(PhantomData) }
}

impl<T> Default for SerdeAdapter<T> {
    fn default() -> Self { Self::new() }
}

impl<T> Clone for SerdeAdapter<T> {
    fn clone(&self) -> Self { *self }
}

impl<T> Copy for SerdeAdapter<T> {}

impl<T> Debug for SerdeAdapter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SerdeAdapter<{}>", std::any::type_name::<T>())
    }
}

impl<T: Serialize + DeserializeOwned> TypeAdapter<T> for SerdeAdapter<T> {
    fn write(
        &self,
        out: &mut JsonWriter,
        value: Option<&T>,
    ) -> Result<(), Error> {
        match value {
            Some(value) => out.value(serde_json::to_value(value)?),
            None => out.null_value(),
        }
    }

    fn read(&self, input: &mut JsonReader) -> Result<Option<T>, Error> {
        let value = input.next_value()?;

        if value.is_null() {
            return Ok(None);
        }

        Ok(Some(serde_json::from_value(value)?))
    }
}
