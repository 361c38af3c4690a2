use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// One or more prefixes are referenced by table contents but have no binding.
    #[error("undefined prefix(es) referenced by the mapping set: {}", .prefixes.join(", "))]
    UndefinedPrefix { prefixes: Vec<String> },

    #[error("prefix `{prefix}` is bound to an empty namespace")]
    EmptyNamespace { prefix: String },

    #[error("prefix `{prefix}` is bound to `{namespace}`, which is not an absolute URI")]
    RelativeNamespace { prefix: String, namespace: String },

    #[error("malformed JSON-LD context `{name}`: {message}")]
    MalformedContext { name: &'static str, message: String },
}

pub type Result<T> = std::result::Result<T, ContextError>;
