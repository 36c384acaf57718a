//! Where the diagnostics produced while adapting values to and from JSON go.
//!
//! A component that carries on after a recoverable problem hands a
//! description of it to a [`Handler`]. [`Log`] forwards it to the [`log`]
//! facade; [`Storage`] and [`Counter`] keep it for inspection.

use std::{
    fmt::Display,
    sync::atomic::{AtomicUsize, Ordering},
};

use derive_more::Deref;
use parking_lot::{RwLock, RwLockReadGuard};

/// Receives the diagnostics of a component.
pub trait Handler<T>: Send + Sync {
    /// Handles one diagnostic.
    fn receive(&self, diagnostic: T);
}

/// Keeps every diagnostic it receives, in the order received.
#[derive(Debug, Deref)]
pub struct Storage<T> {
    received: RwLock<Vec<T>>,
}

impl<T> Storage<T> {
    /// Creates an empty [`Storage`].
    #[must_use]
    pub const fn new() -> Self { Self { received: RwLock::new(Vec::new()) } }

    /// Returns the diagnostics received so far.
    pub fn as_vec(&self) -> RwLockReadGuard<Vec<T>> { self.received.read() }
}

impl<T> Default for Storage<T> {
    fn default() -> Self { Self::new() }
}

impl<T: Send + Sync, U: Into<T>> Handler<U> for Storage<T> {
    fn receive(&self, diagnostic: U) {
        self.received.write().push(diagnostic.into());
    }
}

/// Only counts the diagnostics it receives.
#[derive(Debug, Default)]
pub struct Counter {
    received: AtomicUsize,
}

impl Counter {
    /// Returns the number of diagnostics received so far.
    #[must_use]
    pub fn count(&self) -> usize { self.received.load(Ordering::Relaxed) }
}

impl<T> Handler<T> for Counter {
    fn receive(&self, _: T) { self.received.fetch_add(1, Ordering::Relaxed); }
}

/// Emits every diagnostic as a [`log`] record of a fixed level and target.
///
/// This is the handler used when no other one is configured, so a broken
/// hook shows up in whatever logger the application installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Log {
    level: log::Level,
    target: &'static str,
}

impl Log {
    /// Creates a [`Log`] handler emitting at the given level under the
    /// `jsonnative` target.
    #[must_use]
    pub const fn new(level: log::Level) -> Self {
        Self { level, target: "jsonnative" }
    }

    /// Overrides the target records are emitted under.
    #[must_use]
    pub const fn with_target(mut self, target: &'static str) -> Self {
        self.target = target;
        self
    }

    /// Returns the level records are emitted at.
    #[must_use]
    pub const fn level(&self) -> log::Level { self.level }

    /// Returns the target records are emitted under.
    #[must_use]
    pub const fn target(&self) -> &'static str { self.target }
}

impl Default for Log {
    fn default() -> Self { Self::new(log::Level::Warn) }
}

impl<T: Display> Handler<T> for Log {
    fn receive(&self, diagnostic: T) {
        log::log!(target: self.target, self.level, "{diagnostic}");
    }
}

#[cfg(test)]
mod test;
