//! The hooks a type implements to take part in its own conversion.

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

use jsonnative_adapter::Adaptable;

/// Substitutes a value with a different representation before it is
/// written.
///
/// The replacement is written with the adapter its own type would get if the
/// [`NativeFactory`](crate::NativeFactory) did not exist, so its hooks, if
/// any, are not applied.
pub trait WriteReplace: Adaptable {
    /// The type written in place of `Self`.
    type Replacement: Adaptable;

    /// Returns the value to write in place of `self`.
    ///
    /// # Errors
    ///
    /// Any error makes the adapter fall back to writing `self` unchanged
    /// (or fail, depending on [`OnHookFailure`](crate::OnHookFailure)).
    fn write_replace(&self) -> Result<Self::Replacement, HookError>;
}

/// Resolves a freshly read value into the value handed to the caller, e.g.
/// a canonical shared instance.
pub trait ReadResolve: Adaptable {
    /// Returns the value to hand out in place of `self`.
    ///
    /// # Errors
    ///
    /// Any error makes the adapter hand out `self` unchanged (or fail,
    /// depending on [`OnHookFailure`](crate::OnHookFailure)).
    fn read_resolve(&self) -> Result<Self, HookError>;
}

/// The failure reported by a hook.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct HookError(Box<dyn std::error::Error + Send + Sync>);

impl HookError {
    /// Wraps an error or a message.
    pub fn new(
        error: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self(error.into())
    }
}

/// Names one of the two hooks.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    displaydoc::Display,
)]
pub enum HookKind {
    /// write replacement
    WriteReplace,

    /// read resolution
    ReadResolve,
}

/// Why invoking a hook did not produce a value.
#[derive(Debug, thiserror::Error, displaydoc::Display)]
pub enum InvocationError {
    /// the hook reported a failure: {0}
    Failed(#[source] HookError),

    /// the hook panicked: {0}
    Panicked(String),
}

/// Runs a hook, turning both its error and its panic into an
/// [`InvocationError`].
pub(crate) fn invoke<R>(
    hook: impl FnOnce() -> Result<R, HookError>,
) -> Result<R, InvocationError> {
    match panic::catch_unwind(AssertUnwindSafe(hook)) {
        Ok(result) => result.map_err(InvocationError::Failed),
        Err(payload) => {
            Err(InvocationError::Panicked(panic_message(payload.as_ref())))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }

    payload
        .downcast_ref::<String>()
        .cloned()
        .unwrap_or_else(|| "a non-string payload".to_string())
}

#[cfg(test)]
mod test;
