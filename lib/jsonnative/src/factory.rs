//! Contains the definition of [`NativeFactory`].

use std::{
    any::{Any, TypeId},
    collections::{HashMap, HashSet},
    fmt::Debug,
    sync::Arc,
};

use jsonnative_adapter::{
    Adaptable, ErasedAdapter, Json, TypeAdapter, TypeAdapterFactory, TypeToken,
};
use jsonnative_handler::{Handler, Log};
use parking_lot::Mutex;

use crate::{
    adapter::{NativeAdapter, Replace, Replacer, Reporting, ResolveFn},
    AccessPolicy, Diagnostic, HookKind, OnHookFailure, PermitAll, ReadResolve,
    WriteReplace,
};

/// Binds the write replacement of `T` to the adapter of its replacement
/// type.
type BindFn<T> = fn(&Json, &dyn TypeAdapterFactory) -> Arc<dyn Replace<T>>;

/// Builds the adapter of one registered type from its [`Probe`].
type CreateFn =
    fn(&NativeFactory, &Json, &TypeToken, &Probe) -> Option<ErasedAdapter>;

/// The hooks registered for one exact type.
///
/// The hook entries hold a [`BindFn`] and a [`ResolveFn`] of that type; only
/// the monomorphised `create` knows how to recover them.
struct Probe {
    write_replace: Option<Box<dyn Any + Send + Sync>>,
    read_resolve: Option<Box<dyn Any + Send + Sync>>,
    create: CreateFn,
}

/// A [`TypeAdapterFactory`] applying the [`WriteReplace`] and
/// [`ReadResolve`] hooks of the types registered on it.
///
/// Hooks are looked up by exact type: a type that merely wraps or derefs to
/// a registered type is not handled unless it is registered itself. For a
/// type without any usable hook, the factory produces nothing and the
/// host falls through to the adapter it would have used anyway.
///
/// A failing hook never fails the read or write by default; the failure is
/// reported to the configured handler (the [`log`] facade unless configured
/// otherwise) and the value the hook was invoked on is used instead.
pub struct NativeFactory {
    probes: HashMap<TypeId, Probe>,
    access: Arc<dyn AccessPolicy>,
    denied: Mutex<HashSet<(TypeId, HookKind)>>,
    reporting: Arc<Reporting>,
}

impl NativeFactory {
    /// Starts configuring a [`NativeFactory`].
    #[must_use]
    pub fn builder() -> NativeFactoryBuilder { NativeFactoryBuilder::new() }

    /// Returns `true` if a hook of the exact type named by `token` has been
    /// registered, regardless of whether it is allowed to be used.
    #[must_use]
    pub fn is_registered(&self, token: &TypeToken) -> bool {
        self.probes.contains_key(&token.id())
    }

    /// Returns the policy applied when a hook fails.
    #[must_use]
    pub fn on_hook_failure(&self) -> OnHookFailure {
        self.reporting.on_hook_failure
    }

    /// Checks the access policy, reporting a denial the first time it
    /// happens for a hook of a type.
    fn permits(&self, token: &TypeToken, hook: HookKind) -> bool {
        match self.access.check(token, hook) {
            Ok(()) => true,
            Err(reason) => {
                if !self.denied.lock().insert((token.id(), hook)) {
                    return false;
                }

                self.reporting.handler.receive(Diagnostic::AccessDenied {
                    type_name: token.name(),
                    hook,
                    reason,
                });

                false
            }
        }
    }
}

impl TypeAdapterFactory for NativeFactory {
    fn create(&self, json: &Json, token: &TypeToken) -> Option<ErasedAdapter> {
        let probe = self.probes.get(&token.id())?;

        (probe.create)(self, json, token, probe)
    }
}

impl Debug for NativeFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeFactory")
            .field("types", &self.probes.len())
            .field("on_hook_failure", &self.reporting.on_hook_failure)
            .finish_non_exhaustive()
    }
}

fn create<T: Adaptable>(
    factory: &NativeFactory,
    json: &Json,
    token: &TypeToken,
    probe: &Probe,
) -> Option<ErasedAdapter> {
    let write_replace = probe
        .write_replace
        .as_ref()
        .and_then(|hook| hook.downcast_ref::<BindFn<T>>())
        .copied()
        .filter(|_| factory.permits(token, HookKind::WriteReplace));

    let read_resolve = probe
        .read_resolve
        .as_ref()
        .and_then(|hook| hook.downcast_ref::<ResolveFn<T>>())
        .copied()
        .filter(|_| factory.permits(token, HookKind::ReadResolve));

    if write_replace.is_none() && read_resolve.is_none() {
        return None;
    }

    log::debug!(
        "adapting `{token}` (write replacement: {}, read resolution: {})",
        write_replace.is_some(),
        read_resolve.is_some()
    );

    let adapter: Arc<dyn TypeAdapter<T>> = Arc::new(NativeAdapter {
        token: *token,
        delegate: json.delegate_adapter::<T>(factory),
        write_replace: write_replace.map(|bind| bind(json, factory)),
        read_resolve,
        reporting: Arc::clone(&factory.reporting),
    });

    Some(ErasedAdapter::new(adapter))
}

fn bind<T: WriteReplace>(
    json: &Json,
    skip_past: &dyn TypeAdapterFactory,
) -> Arc<dyn Replace<T>> {
    // a replacement of another type is written exactly as that type is on
    // its own; only a replacement of the same type skips past this factory
    let adapter = if TypeId::of::<T::Replacement>() == TypeId::of::<T>() {
        json.delegate_adapter::<T::Replacement>(skip_past)
    } else {
        json.adapter::<T::Replacement>()
    };

    Arc::new(Replacer::<T>::new(adapter))
}

/// Configures and builds a [`NativeFactory`].
pub struct NativeFactoryBuilder {
    probes: HashMap<TypeId, Probe>,
    access: Arc<dyn AccessPolicy>,
    on_hook_failure: OnHookFailure,
    handler: Arc<dyn Handler<Diagnostic>>,
}

impl NativeFactoryBuilder {
    /// Creates a builder without any registered type, allowing every hook,
    /// using the original value on failure and logging diagnostics.
    #[must_use]
    pub fn new() -> Self {
        Self {
            probes: HashMap::new(),
            access: Arc::new(PermitAll),
            on_hook_failure: OnHookFailure::default(),
            handler: Arc::new(Log::default()),
        }
    }

    /// Registers the [`WriteReplace`] hook of `T`.
    #[must_use]
    pub fn write_replace<T: WriteReplace>(mut self) -> Self {
        let hook: BindFn<T> = bind::<T>;
        self.probe::<T>().write_replace = Some(Box::new(hook));
        self
    }

    /// Registers the [`ReadResolve`] hook of `T`.
    #[must_use]
    pub fn read_resolve<T: ReadResolve>(mut self) -> Self {
        let hook: ResolveFn<T> = <T as ReadResolve>::read_resolve;
        self.probe::<T>().read_resolve = Some(Box::new(hook));
        self
    }

    /// Registers both hooks of `T`.
    #[must_use]
    pub fn native<T: WriteReplace + ReadResolve>(self) -> Self {
        self.write_replace::<T>().read_resolve::<T>()
    }

    fn probe<T: Adaptable>(&mut self) -> &mut Probe {
        self.probes.entry(TypeId::of::<T>()).or_insert_with(|| Probe {
            write_replace: None,
            read_resolve: None,
            create: create::<T>,
        })
    }

    /// Sets the policy deciding whether a registered hook may be used.
    #[must_use]
    pub fn access_policy(
        mut self,
        access: impl AccessPolicy + 'static,
    ) -> Self {
        self.access = Arc::new(access);
        self
    }

    /// Sets what adapters do when a hook fails.
    #[must_use]
    pub fn on_hook_failure(mut self, on_hook_failure: OnHookFailure) -> Self {
        self.on_hook_failure = on_hook_failure;
        self
    }

    /// Sets the handler receiving the diagnostics.
    #[must_use]
    pub fn handler(mut self, handler: Arc<dyn Handler<Diagnostic>>) -> Self {
        self.handler = handler;
        self
    }

    /// Builds the [`NativeFactory`].
    #[must_use]
    pub fn build(self) -> NativeFactory {
        NativeFactory {
            probes: self.probes,
            access: self.access,
            denied: Mutex::new(HashSet::new()),
            reporting: Arc::new(Reporting {
                on_hook_failure: self.on_hook_failure,
                handler: self.handler,
            }),
        }
    }
}

impl Default for NativeFactoryBuilder {
    fn default() -> Self { Self::new() }
}

impl Debug for NativeFactoryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeFactoryBuilder")
            .field("types", &self.probes.len())
            .field("on_hook_failure", &self.on_hook_failure)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test;
