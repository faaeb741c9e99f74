use thiserror::Error;

/// Failure of the external create operation.
///
/// The widget keeps its search text and open state when this is returned, so
/// the user can edit the text or retry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CreationError {
    #[error("create handler rejected \"{text}\": {reason}")]
    Rejected { text: String, reason: String },

    #[error("create task for \"{0}\" was aborted")]
    Aborted(String),
}

impl CreationError {
    pub fn rejected(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            text: text.into(),
            reason: reason.into(),
        }
    }

    /// Search text the failed request was made with.
    pub fn text(&self) -> &str {
        match self {
            Self::Rejected { text, .. } | Self::Aborted(text) => text,
        }
    }
}

/// Programmer errors: a part or operation used outside the context it needs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MisuseError {
    #[error("{part} must be used within a combobox scope")]
    MissingContext { part: &'static str },

    #[error("cannot supply a controlled value to an uncontrolled combobox")]
    NotControlled,
}

/// All errors that can occur in selectra-core.
#[derive(Debug, Error)]
pub enum ComboboxError {
    #[error(transparent)]
    Creation(#[from] CreationError),

    #[error(transparent)]
    Misuse(#[from] MisuseError),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, ComboboxError>;
