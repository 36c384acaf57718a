//! Contains the definition of [`Error`].

/// An error raised while writing a value to a sink or reading it back.
#[derive(Debug, thiserror::Error, displaydoc::Display)]
pub enum Error {
    /// The JSON text is malformed or does not match the expected shape: {0}
    Json(#[from] serde_json::Error),

    /// A value has already been written to this sink.
    AlreadyWritten,

    /// The source has no value left to read.
    Exhausted,

    /// The adapter was used before its creation finished.
    Incomplete,

    /// {0}
    Adapter(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wraps an error raised by an adapter's own logic.
    pub fn adapter(
        error: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Adapter(error.into())
    }
}
