use std::fmt;

type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Category of an adapter error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid or incomplete configuration. Permanent: fail at startup.
    Config,
    /// Stored column value cannot be converted to the domain type.
    Decode,
    /// Domain value cannot be represented as a column value.
    Encode,
    /// Failure reported by the host's column reader/writer.
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Config => f.write_str("config"),
            ErrorKind::Decode => f.write_str("decode"),
            ErrorKind::Encode => f.write_str("encode"),
            ErrorKind::Io => f.write_str("io"),
        }
    }
}

/// Adapter error returned by every fallible `UserType` method.
///
/// Carries an `ErrorKind`, a human-readable message and, when the failure
/// originated elsewhere (date parser, host driver), the original cause.
pub struct AdapterError {
    kind: ErrorKind,
    message: String,
    source: Option<Cause>,
}

impl AdapterError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, msg)
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode, msg)
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Encode, msg)
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, msg)
    }

    /// The adapter was used before `configure` completed.
    pub fn not_configured(type_name: &str) -> Self {
        Self::config(format!("user type '{type_name}' is not configured"))
    }

    fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            message: msg.into(),
            source: None,
        }
    }

    /// Attach the underlying failure, exposed via `Error::source()`.
    pub fn with_source(
        mut self,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Add context to the error, preserving kind and cause.
    ///
    /// Produces: `"context: original message"`.
    pub fn with_context(self, ctx: impl fmt::Display) -> Self {
        Self {
            message: format!("{ctx}: {}", self.message),
            ..self
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_config(&self) -> bool {
        self.kind == ErrorKind::Config
    }

    pub fn is_decode(&self) -> bool {
        self.kind == ErrorKind::Decode
    }

    pub fn is_encode(&self) -> bool {
        self.kind == ErrorKind::Encode
    }
}

impl fmt::Debug for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(source) = &self.source {
            write!(f, " (caused by: {source})")?;
        }
        Ok(())
    }
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for AdapterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<chrono::ParseError> for AdapterError {
    fn from(e: chrono::ParseError) -> Self {
        Self::decode(e.to_string()).with_source(e)
    }
}
