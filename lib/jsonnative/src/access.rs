//! Decides whether a registered hook may be used at all.

use std::{any::TypeId, collections::HashSet};

use jsonnative_adapter::TypeToken;

use crate::HookKind;

/// The reason a hook may not be used.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, thiserror::Error)]
#[error("{reason}")]
pub struct AccessDenied {
    reason: String,
}

impl AccessDenied {
    /// Creates a denial with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }

    /// Returns the reason of the denial.
    #[must_use]
    pub fn reason(&self) -> &str { &self.reason }
}

/// Checked once per hook, when the adapter of a type is created.
///
/// A denied hook is reported and then treated as if the type did not
/// implement it; the other hook of the same type is unaffected.
pub trait AccessPolicy: Send + Sync {
    /// Returns whether the `hook` of the type named by `token` may be used.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied`] if it may not.
    fn check(
        &self,
        token: &TypeToken,
        hook: HookKind,
    ) -> Result<(), AccessDenied>;
}

/// Allows every hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PermitAll;

impl AccessPolicy for PermitAll {
    fn check(&self, _: &TypeToken, _: HookKind) -> Result<(), AccessDenied> {
        Ok(())
    }
}

/// Denies an explicit set of hooks and allows the rest.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DenyList {
    denied: HashSet<(TypeId, HookKind)>,
}

impl DenyList {
    /// Creates a list denying nothing.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Denies the `hook` of `T`.
    #[must_use]
    pub fn deny<T: ?Sized + 'static>(mut self, hook: HookKind) -> Self {
        self.denied.insert((TypeId::of::<T>(), hook));
        self
    }
}

impl AccessPolicy for DenyList {
    fn check(
        &self,
        token: &TypeToken,
        hook: HookKind,
    ) -> Result<(), AccessDenied> {
        if self.denied.contains(&(token.id(), hook)) {
            return Err(AccessDenied::new(format!(
                "the {hook} hook of `{token}` is on the deny list"
            )));
        }

        Ok(())
    }
}
