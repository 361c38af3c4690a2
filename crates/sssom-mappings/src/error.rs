use sssom_context::ContextError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MappingSetError {
    #[error(transparent)]
    Context(#[from] ContextError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("row {row}: required field `{field}` is missing")]
    MissingField { row: usize, field: &'static str },

    #[error("row {row}: `{field}` value `{value}` is neither a CURIE nor an absolute URI")]
    InvalidIdentifier {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("prefix `{prefix}` is bound to <{left}> in one mapping set and <{right}> in the other")]
    PrefixMapClash {
        prefix: String,
        left: String,
        right: String,
    },

    #[error("namespace <{namespace}> is bound under both `{left}` and `{right}`")]
    NamespaceClash {
        namespace: String,
        left: String,
        right: String,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MappingSetError>;
