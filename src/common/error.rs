use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("host program unavailable: {0}")]
    HostUnavailable(#[source] libloading::Error),

    #[error("host symbol `{name}` not found: {source}")]
    MissingSymbol {
        name: &'static str,
        #[source]
        source: libloading::Error,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("logging error: {0}")]
    Logging(String),
}

impl ModError {
    /// Whether this error means the host does not expose the mod API at all.
    pub fn is_host_failure(&self) -> bool {
        matches!(
            self,
            ModError::HostUnavailable(_) | ModError::MissingSymbol { .. }
        )
    }

    /// Try to extract a ModError from an anyhow::Error, or classify
    /// the underlying error heuristically.
    pub fn classify(err: &anyhow::Error) -> ModErrorKind {
        if let Some(me) = err.downcast_ref::<ModError>() {
            return me.kind();
        }
        if err.downcast_ref::<std::io::Error>().is_some() {
            return ModErrorKind::Io;
        }
        if err.downcast_ref::<serde_yml::Error>().is_some() {
            return ModErrorKind::Yaml;
        }
        ModErrorKind::Other
    }

    /// Get the kind/category of this error.
    pub fn kind(&self) -> ModErrorKind {
        match self {
            ModError::Io(_) => ModErrorKind::Io,
            ModError::HostUnavailable(_) => ModErrorKind::HostUnavailable,
            ModError::MissingSymbol { .. } => ModErrorKind::MissingSymbol,
            ModError::Config(_) => ModErrorKind::Config,
            ModError::Yaml(_) => ModErrorKind::Yaml,
            ModError::Logging(_) => ModErrorKind::Logging,
        }
    }
}

/// Lightweight error category for pattern matching without borrowing the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModErrorKind {
    Io,
    HostUnavailable,
    MissingSymbol,
    Config,
    Yaml,
    Logging,
    /// 不是 [`ModError`] 也无法归类的错误
    Other,
}

impl ModErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ModErrorKind::Io => "IO",
            ModErrorKind::HostUnavailable => "HOST_UNAVAILABLE",
            ModErrorKind::MissingSymbol => "MISSING_SYMBOL",
            ModErrorKind::Config => "CONFIG",
            ModErrorKind::Yaml => "YAML",
            ModErrorKind::Logging => "LOGGING",
            ModErrorKind::Other => "OTHER",
        }
    }
}
