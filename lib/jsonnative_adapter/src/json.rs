//! Contains the definition of [`Json`], the entry point of the host.

use std::{
    any::TypeId,
    collections::HashMap,
    fmt::Debug,
    sync::{Arc, OnceLock},
    thread::ThreadId,
};

use parking_lot::{Mutex, RwLock};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    ErasedAdapter, Error, JsonReader, JsonWriter, SerdeAdapter,
    SingleTypeFactory, TypeAdapter, TypeAdapterFactory, TypeToken,
};

/// The bound every type converted through [`Json`] satisfies: it must be
/// convertible by the default [`SerdeAdapter`].
pub trait Adaptable: Serialize + DeserializeOwned + 'static {}

impl<T: Serialize + DeserializeOwned + 'static> Adaptable for T {}

/// Converts values to and from JSON using the adapters produced by its
/// registered factories.
///
/// The adapter chosen for a type is created on first use and cached for the
/// lifetime of the instance. Threads that miss the cache at the same time
/// may each run the factories; the first adapter cached is kept.
pub struct Json {
    factories: Vec<Arc<dyn TypeAdapterFactory>>,
    adapters: RwLock<HashMap<TypeId, ErasedAdapter>>,
    pending: Mutex<HashMap<(ThreadId, TypeId), ErasedAdapter>>,
    pretty: bool,
}

impl Json {
    /// Creates a [`Json`] without any factory: every type uses its
    /// [`SerdeAdapter`].
    #[must_use]
    pub fn new() -> Self { JsonBuilder::new().build() }

    /// Starts configuring a [`Json`].
    #[must_use]
    pub fn builder() -> JsonBuilder { JsonBuilder::new() }

    /// Returns the adapter for `T`.
    ///
    /// The first registered factory that claims `T` wins; when none does,
    /// the [`SerdeAdapter`] is used.
    ///
    /// A factory asking for the adapter of `T` while that adapter is being
    /// created gets a placeholder forwarding to it once it exists. Using
    /// the placeholder before then fails with [`Error::Incomplete`].
    pub fn adapter<T: Adaptable>(&self) -> Arc<dyn TypeAdapter<T>> {
        let token = TypeToken::of::<T>();

        if let Some(adapter) = self
            .adapters
            .read()
            .get(&token.id())
            .and_then(ErasedAdapter::downcast::<T>)
        {
            return adapter;
        }

        let key = (std::thread::current().id(), token.id());

        if let Some(pending) =
            self.pending.lock().get(&key).and_then(ErasedAdapter::downcast::<T>)
        {
            return pending;
        }

        let pending = Arc::new(PendingAdapter::<T>::new());
        let placeholder: Arc<dyn TypeAdapter<T>> = pending.clone();
        self.pending.lock().insert(key, ErasedAdapter::new(placeholder));

        // no lock is held while factories run; they may ask for other
        // adapters, including this very one
        let adapter = self.create_adapter::<T>(&self.factories);

        self.pending.lock().remove(&key);
        pending.resolve(Arc::clone(&adapter));

        log::debug!("created the adapter for `{token}`");

        self.adapters
            .write()
            .entry(token.id())
            .or_insert_with(|| ErasedAdapter::new::<T>(Arc::clone(&adapter)))
            .downcast::<T>()
            .unwrap_or(adapter)
    }

    /// Returns the adapter `T` would get if `skip_past` and every factory
    /// registered before it did not exist.
    ///
    /// This is how a factory wraps the behaviour it replaces. If `skip_past`
    /// is not registered on this instance, every factory is consulted. The
    /// result is not cached.
    pub fn delegate_adapter<T: Adaptable>(
        &self,
        skip_past: &dyn TypeAdapterFactory,
    ) -> Arc<dyn TypeAdapter<T>> {
        let start = self
            .factories
            .iter()
            .position(|factory| {
                std::ptr::addr_eq(
                    Arc::as_ptr(factory),
                    skip_past as *const dyn TypeAdapterFactory,
                )
            })
            .map_or(0, |index| index + 1);

        self.create_adapter::<T>(&self.factories[start..])
    }

    fn create_adapter<T: Adaptable>(
        &self,
        factories: &[Arc<dyn TypeAdapterFactory>],
    ) -> Arc<dyn TypeAdapter<T>> {
        let token = TypeToken::of::<T>();

        for factory in factories {
            let Some(erased) = factory.create(self, &token) else {
                continue;
            };

            match erased.downcast::<T>() {
                Some(adapter) => return adapter,
                None => log::warn!(
                    "ignoring an adapter for `{}` produced when `{token}` was \
                     requested",
                    erased.token()
                ),
            }
        }

        log::trace!("no factory claims `{token}`, using its serde adapter");

        Arc::new(SerdeAdapter::<T>::new())
    }

    /// Writes `value` to a JSON value; `None` becomes whatever the adapter
    /// writes for the absent value.
    ///
    /// # Errors
    ///
    /// Returns the error raised by the adapter.
    pub fn to_value<T: Adaptable>(
        &self,
        value: Option<&T>,
    ) -> Result<Value, Error> {
        let mut out = JsonWriter::new();
        self.adapter::<T>().write(&mut out, value)?;

        Ok(out.into_value())
    }

    /// Writes `value` to JSON text, pretty printed if configured.
    ///
    /// # Errors
    ///
    /// Returns the error raised by the adapter.
    pub fn to_json<T: Adaptable>(&self, value: &T) -> Result<String, Error> {
        let value = self.to_value(Some(value))?;

        let text = if self.pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };

        Ok(text)
    }

    /// Reads a `T` from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns the error raised by the adapter.
    pub fn from_value<T: Adaptable>(
        &self,
        value: Value,
    ) -> Result<Option<T>, Error> {
        self.adapter::<T>().read(&mut JsonReader::from_value(value))
    }

    /// Reads a `T` from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the text is malformed, otherwise the error
    /// raised by the adapter.
    pub fn from_json<T: Adaptable>(
        &self,
        json: &str,
    ) -> Result<Option<T>, Error> {
        self.adapter::<T>().read(&mut JsonReader::parse(json)?)
    }
}

impl Default for Json {
    fn default() -> Self { Self::new() }
}

impl Debug for Json {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Json")
            .field("factories", &self.factories.len())
            .field("adapters", &self.adapters.read().len())
            .field("pretty", &self.pretty)
            .finish_non_exhaustive()
    }
}

/// Stands in for an adapter while the factories are creating it.
struct PendingAdapter<T> {
    resolved: OnceLock<Arc<dyn TypeAdapter<T>>>,
}

impl<T> PendingAdapter<T> {
    const fn new() -> Self { Self { resolved: OnceLock::new() } }

    fn resolve(&self, adapter: Arc<dyn TypeAdapter<T>>) {
        // only the creating thread resolves its own placeholder
        let _ = self.resolved.set(adapter);
    }

    fn get(&self) -> Result<&Arc<dyn TypeAdapter<T>>, Error> {
        self.resolved.get().ok_or(Error::Incomplete)
    }
}

impl<T> TypeAdapter<T> for PendingAdapter<T> {
    fn write(
        &self,
        out: &mut JsonWriter,
        value: Option<&T>,
    ) -> Result<(), Error> {
        self.get()?.write(out, value)
    }

    fn read(&self, input: &mut JsonReader) -> Result<Option<T>, Error> {
        self.get()?.read(input)
    }
}

/// Configures and builds a [`Json`].
#[derive(Default)]
pub struct JsonBuilder {
    factories: Vec<Arc<dyn TypeAdapterFactory>>,
    pretty: bool,
}

impl JsonBuilder {
    /// Creates a builder with no factory and compact output.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Registers a factory. Factories are consulted in registration order.
    #[must_use]
    pub fn register_type_adapter_factory(
        self,
        factory: impl TypeAdapterFactory + 'static,
    ) -> Self {
        self.register_shared_type_adapter_factory(Arc::new(factory))
    }

    /// Registers a factory the caller keeps a handle to, e.g. to pass it as
    /// `skip_past` to [`Json::delegate_adapter`].
    #[must_use]
    pub fn register_shared_type_adapter_factory(
        mut self,
        factory: Arc<dyn TypeAdapterFactory>,
    ) -> Self {
        self.factories.push(factory);
        self
    }

    /// Registers an adapter used for exactly the type `T`.
    #[must_use]
    pub fn register_type_adapter<T: 'static>(
        self,
        adapter: Arc<dyn TypeAdapter<T>>,
    ) -> Self {
        self.register_type_adapter_factory(SingleTypeFactory::new(adapter))
    }

    /// Makes [`Json::to_json`] pretty print its output.
    #[must_use]
    pub fn pretty_printing(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Builds the [`Json`].
    #[must_use]
    pub fn build(self) -> Json {
        Json {
            factories: self.factories,
            adapters: RwLock::new(HashMap::new()),
            pending: Mutex::new(HashMap::new()),
            pretty: self.pretty,
        }
    }
}

impl Debug for JsonBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonBuilder")
            .field("factories", &self.factories.len())
            .field("pretty", &self.pretty)
            .finish()
    }
}
