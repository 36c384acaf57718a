//! Write replacement and read resolution for values converted through
//! [`jsonnative_adapter::Json`].
//!
//! A type opts in by implementing [`WriteReplace`] (write a different value in
//! its place) and/or [`ReadResolve`] (hand out a different value after it has
//! been read), and by being registered on a [`NativeFactory`]. The factory is
//! then registered on the host like any other factory:
//!
//! ``` rust
//! use jsonnative::{HookError, NativeFactory, WriteReplace};
//! use jsonnative_adapter::Json;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Money(i64);
//!
//! #[derive(Serialize, Deserialize)]
//! struct MoneyDto {
//!     cents: i64,
//! }
//!
//! impl WriteReplace for Money {
//!     type Replacement = MoneyDto;
//!
//!     fn write_replace(&self) -> Result<MoneyDto, HookError> {
//!         Ok(MoneyDto { cents: self.0 })
//!     }
//! }
//!
//! let json = Json::builder()
//!     .register_type_adapter_factory(
//!         NativeFactory::builder().write_replace::<Money>().build(),
//!     )
//!     .build();
//!
//! assert_eq!(json.to_json(&Money(150)).unwrap(), r#"{"cents":150}"#);
//! ```
//!
//! Hooks never break the conversion of an otherwise healthy value: a hook
//! that fails or panics is reported as a [`Diagnostic`] and the value it was
//! invoked on is used instead, unless the factory is configured with
//! [`OnHookFailure::Propagate`].

mod access;
mod adapter;
mod diagnostic;
mod factory;
mod hook;

pub use access::{AccessDenied, AccessPolicy, DenyList, PermitAll};
pub use adapter::OnHookFailure;
pub use diagnostic::{Diagnostic, HookFailed};
pub use factory::{NativeFactory, NativeFactoryBuilder};
pub use hook::{HookError, HookKind, InvocationError, ReadResolve, WriteReplace};
