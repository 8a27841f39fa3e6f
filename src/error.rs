//! Error types for the generator.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every failure the generator or the document loader can report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("unsupported reference, expected {expected}: {reference}")]
    UnsupportedReference {
        reference: String,
        expected: String,
    },

    #[error("{section} {name} not found")]
    UnresolvedReference { section: &'static str, name: String },

    #[error("reference chain starting at {reference} is too deep")]
    ReferenceDepthExceeded { reference: String },

    #[error("invalid schema: {0}")]
    InvalidSchemaNode(String),

    #[error("expected required property to be a string: {0}")]
    InvalidRequired(serde_json::Value),

    #[error("no content type found for request body")]
    MissingContent,

    #[error("parameter is nil")]
    NilParameter,

    #[error("request body is nil")]
    NilRequestBody,

    #[error("operation has no responses")]
    NoResponses,

    #[error("{name} is produced by both {first} and {second}")]
    NameCollision {
        name: String,
        first: String,
        second: String,
    },

    #[error("unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON document")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML document")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{context}: {inner}")]
    Context { context: String, inner: Box<Error> },
}

impl Error {
    pub(crate) fn invalid_schema(message: impl Into<String>) -> Self {
        Error::InvalidSchemaNode(message.into())
    }

    /// Strips every [`Error::Context`] layer and returns the error that
    /// started the failure.
    pub fn root(&self) -> &Error {
        match self {
            Error::Context { inner, .. } => inner.root(),
            other => other,
        }
    }
}

/// Prefixes an error with the location it was raised at.
pub(crate) trait ResultExt<T> {
    fn context<C: Into<String>>(self, context: impl FnOnce() -> C) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context<C: Into<String>>(self, context: impl FnOnce() -> C) -> Result<T> {
        self.map_err(|inner| Error::Context {
            context: context().into(),
            inner: Box::new(inner),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_prefixes_message_and_keeps_root() {
        let err: Result<()> = Err(Error::NoResponses);
        let err = err
            .context(|| "GET /pets")
            .context(|| "outer")
            .unwrap_err();

        assert_eq!(err.to_string(), "outer: GET /pets: operation has no responses");
        assert!(matches!(err.root(), Error::NoResponses));
    }
}
