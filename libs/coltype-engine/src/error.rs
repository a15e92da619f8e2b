use coltype_api::AdapterError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("config error: {0}")]
    Config(String),

    #[error("adapter error: {0}")]
    Adapter(#[from] AdapterError),

    #[error("unknown user type: {0}")]
    UnknownType(String),

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("io error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl EngineError {
    /// Add context to the error.
    ///
    /// For `Adapter`, context is added to the inner `AdapterError`.
    /// For message variants, context is prepended to the message.
    pub fn with_context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            EngineError::Adapter(e) => EngineError::Adapter(e.with_context(ctx)),
            EngineError::Config(msg) => EngineError::Config(format!("{ctx}: {msg}")),
            EngineError::UnknownType(msg) => EngineError::UnknownType(format!("{ctx}: {msg}")),
            EngineError::UnknownColumn(msg) => EngineError::UnknownColumn(format!("{ctx}: {msg}")),
            other => other,
        }
    }

    /// The adapter error underneath, if any.
    pub fn adapter(&self) -> Option<&AdapterError> {
        match self {
            EngineError::Adapter(e) => Some(e),
            _ => None,
        }
    }
}
