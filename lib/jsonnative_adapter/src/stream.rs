//! Single-value JSON sinks and sources handed to adapters.

use serde_json::Value;

use crate::Error;

/// The sink an adapter writes exactly one JSON value to.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JsonWriter {
    value: Option<Value>,
}

impl JsonWriter {
    /// Creates an empty writer.
    #[must_use]
    pub const fn new() -> Self { Self { value: None } }

    /// Writes the given value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyWritten`] if a value has been written before.
    pub fn value(&mut self, value: Value) -> Result<(), Error> {
        if self.value.is_some() {
            return Err(Error::AlreadyWritten);
        }

        self.value = Some(value);
        Ok(())
    }

    /// Writes a JSON `null`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyWritten`] if a value has been written before.
    pub fn null_value(&mut self) -> Result<(), Error> {
        self.value(Value::Null)
    }

    /// Returns `true` once a value has been written.
    #[must_use]
    pub const fn is_written(&self) -> bool { self.value.is_some() }

    /// Returns the written value, if any.
    #[must_use]
    pub const fn as_value(&self) -> Option<&Value> { self.value.as_ref() }

    /// Consumes the writer, yielding `null` when nothing was written.
    #[must_use]
    pub fn into_value(self) -> Value { self.value.unwrap_or(Value::Null) }
}

/// The source an adapter reads exactly one JSON value from.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonReader {
    value: Option<Value>,
}

impl JsonReader {
    /// Creates a reader over an already parsed value.
    #[must_use]
    pub const fn from_value(value: Value) -> Self {
        Self { value: Some(value) }
    }

    /// Parses the given text into a reader.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the text is not well-formed JSON.
    pub fn parse(json: &str) -> Result<Self, Error> {
        Ok(Self::from_value(serde_json::from_str(json)?))
    }

    /// Takes the value out of the reader.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Exhausted`] if the value has already been taken.
    pub fn next_value(&mut self) -> Result<Value, Error> {
        self.value.take().ok_or(Error::Exhausted)
    }

    /// Returns `true` if the pending value is `null`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Exhausted`] if the value has already been taken.
    pub fn peek_null(&self) -> Result<bool, Error> {
        self.value.as_ref().map(Value::is_null).ok_or(Error::Exhausted)
    }

    /// Returns `true` once the value has been taken.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool { self.value.is_none() }
}
