//! The adapter produced for types with at least one hook.

use std::sync::Arc;

use jsonnative_adapter::{
    Adaptable, Error, JsonReader, JsonWriter, TypeAdapter, TypeToken,
};
use jsonnative_handler::Handler;

use crate::{
    hook::invoke, Diagnostic, HookError, HookFailed, HookKind,
    InvocationError, WriteReplace,
};

/// What the adapters of one factory do when a hook fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum OnHookFailure {
    /// Report the failure and carry on with the value the hook was invoked
    /// on.
    #[default]
    UseOriginalValue,

    /// Fail the read or write with the [`HookFailed`] error.
    Propagate,
}

/// The failure policy and diagnostics sink shared by a factory and its
/// adapters.
pub(crate) struct Reporting {
    pub(crate) on_hook_failure: OnHookFailure,
    pub(crate) handler: Arc<dyn Handler<Diagnostic>>,
}

impl Reporting {
    /// Either reports the failure and lets the caller carry on, or turns it
    /// into the error of the read/write.
    fn recover(
        &self,
        token: &TypeToken,
        hook: HookKind,
        error: InvocationError,
    ) -> Result<(), Error> {
        let failed = HookFailed::new(token.name(), hook, error);

        match self.on_hook_failure {
            OnHookFailure::UseOriginalValue => {
                self.handler.receive(Diagnostic::InvocationFailed(failed));
                Ok(())
            }
            OnHookFailure::Propagate => Err(Error::adapter(failed)),
        }
    }
}

pub(crate) type ResolveFn<T> = fn(&T) -> Result<T, HookError>;

/// A write replacement bound to the adapter its result is written with.
pub(crate) trait Replace<T>: Send + Sync {
    /// Invokes the hook on `value` and writes what it returns.
    ///
    /// The outer error means the hook failed and nothing was written; the
    /// inner result is the one of the write itself.
    fn write_replaced(
        &self,
        out: &mut JsonWriter,
        value: &T,
    ) -> Result<Result<(), Error>, InvocationError>;
}

pub(crate) struct Replacer<T: WriteReplace> {
    adapter: Arc<dyn TypeAdapter<T::Replacement>>,
}

impl<T: WriteReplace> Replacer<T> {
    pub(crate) fn new(adapter: Arc<dyn TypeAdapter<T::Replacement>>) -> Self {
        Self { adapter }
    }
}

impl<T: WriteReplace> Replace<T> for Replacer<T> {
    fn write_replaced(
        &self,
        out: &mut JsonWriter,
        value: &T,
    ) -> Result<Result<(), Error>, InvocationError> {
        let replacement = invoke(|| value.write_replace())?;

        Ok(self.adapter.write(out, Some(&replacement)))
    }
}

/// Wraps the adapter a type would have had, applying its hooks around it.
pub(crate) struct NativeAdapter<T> {
    pub(crate) token: TypeToken,
    pub(crate) delegate: Arc<dyn TypeAdapter<T>>,
    pub(crate) write_replace: Option<Arc<dyn Replace<T>>>,
    pub(crate) read_resolve: Option<ResolveFn<T>>,
    pub(crate) reporting: Arc<Reporting>,
}

impl<T: Adaptable> TypeAdapter<T> for NativeAdapter<T> {
    fn write(
        &self,
        out: &mut JsonWriter,
        value: Option<&T>,
    ) -> Result<(), Error> {
        if let (Some(replace), Some(value)) = (&self.write_replace, value) {
            match replace.write_replaced(out, value) {
                Ok(written) => return written,
                Err(error) => self.reporting.recover(
                    &self.token,
                    HookKind::WriteReplace,
                    error,
                )?,
            }
        }

        self.delegate.write(out, value)
    }

    fn read(&self, input: &mut JsonReader) -> Result<Option<T>, Error> {
        let value = self.delegate.read(input)?;

        let Some(resolve) = self.read_resolve else {
            return Ok(value);
        };
        let Some(value) = value else {
            return Ok(None);
        };

        match invoke(|| resolve(&value)) {
            Ok(resolved) => Ok(Some(resolved)),
            Err(error) => {
                self.reporting.recover(
                    &self.token,
                    HookKind::ReadResolve,
                    error,
                )?;
                Ok(Some(value))
            }
        }
    }
}
