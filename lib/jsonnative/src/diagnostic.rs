//! What the factory and its adapters report instead of failing.

use crate::{AccessDenied, HookKind, InvocationError};

/// A hook that could not be used, as reported to the configured
/// [`Handler`](jsonnative_handler::Handler).
#[derive(Debug, displaydoc::Display)]
pub enum Diagnostic {
    /// the {hook} hook of `{type_name}` is treated as absent: {reason}
    AccessDenied {
        /// The type whose hook was denied.
        type_name: &'static str,

        /// The denied hook.
        hook: HookKind,

        /// Why the policy denied it.
        reason: AccessDenied,
    },

    /// {0}; the value it was invoked on is used instead
    InvocationFailed(HookFailed),
}

impl Diagnostic {
    /// Returns the hook the diagnostic is about.
    #[must_use]
    pub const fn hook(&self) -> HookKind {
        match self {
            Self::AccessDenied { hook, .. } => *hook,
            Self::InvocationFailed(failed) => failed.hook,
        }
    }

    /// Returns the name of the type the diagnostic is about.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::AccessDenied { type_name, .. } => *type_name,
            Self::InvocationFailed(failed) => failed.type_name,
        }
    }
}

/// A hook invocation that did not produce a value.
///
/// Reported as [`Diagnostic::InvocationFailed`], or returned inside
/// [`jsonnative_adapter::Error::Adapter`] when the factory is configured with
/// [`OnHookFailure::Propagate`](crate::OnHookFailure::Propagate).
#[derive(Debug, thiserror::Error)]
#[error("the {hook} hook of `{type_name}` failed: {error}")]
pub struct HookFailed {
    type_name: &'static str,
    hook: HookKind,
    #[source]
    error: InvocationError,
}

impl HookFailed {
    pub(crate) const fn new(
        type_name: &'static str,
        hook: HookKind,
        error: InvocationError,
    ) -> Self {
        Self { type_name, hook, error }
    }

    /// Returns the name of the type whose hook failed.
    #[must_use]
    pub const fn type_name(&self) -> &'static str { self.type_name }

    /// Returns the hook that failed.
    #[must_use]
    pub const fn hook(&self) -> HookKind { self.hook }

    /// Returns why the invocation failed.
    #[must_use]
    pub const fn error(&self) -> &InvocationError { &self.error }
}
