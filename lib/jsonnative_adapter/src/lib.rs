//! A small JSON host built around per-type adapters.
//!
//! Values are written to a [`JsonWriter`] and read from a [`JsonReader`] by a
//! [`TypeAdapter`]. Adapters are produced on demand by the
//! [`TypeAdapterFactory`]s registered on a [`Json`] instance, consulted in
//! registration order; when none of them claims a type, the serde-backed
//! [`SerdeAdapter`] is used. A factory can wrap the adapter that would have
//! been chosen without it through [`Json::delegate_adapter`].
//!
//! ``` rust
//! use jsonnative_adapter::Json;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! let json = Json::new();
//!
//! let text = json.to_json(&Point { x: 1, y: 2 }).unwrap();
//! assert_eq!(text, r#"{"x":1,"y":2}"#);
//!
//! let point = json.from_json::<Point>(&text).unwrap();
//! assert_eq!(point, Some(Point { x: 1, y: 2 }));
//! ```

pub mod adapter;
pub mod error;
pub mod factory;
pub mod json;
pub mod stream;

pub use adapter::{ErasedAdapter, SerdeAdapter, TypeAdapter, TypeToken};
pub use error::Error;
pub use factory::{SingleTypeFactory, TypeAdapterFactory};
pub use json::{Adaptable, Json, JsonBuilder};
pub use stream::{JsonReader, JsonWriter};
