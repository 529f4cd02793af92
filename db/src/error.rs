use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("duplicate entry: {0}")]
    Duplicate(String),

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("could not load {file}: {source}")]
    DataLoad {
        file: String,
        #[source]
        source: LoadCause,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("backup error: {0}")]
    Backup(String),

    #[error("could not save {}", .0.join(", "))]
    Save(Vec<&'static str>),
}

/// Underlying reason a persisted file was rejected.
#[derive(Error, Debug)]
pub enum LoadCause {
    #[error("file I/O issue: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid timestamp {value:?}: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid record: {0}")]
    Record(Box<Error>),
}

impl Error {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Error::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn data_load(file: &str, source: impl Into<LoadCause>) -> Self {
        Error::DataLoad {
            file: file.to_string(),
            source: source.into(),
        }
    }
}

impl From<Error> for LoadCause {
    fn from(error: Error) -> Self {
        LoadCause::Record(Box::new(error))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Rejects empty or whitespace-only names.
pub(crate) fn require_name(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(field, "cannot be blank"));
    }

    Ok(())
}

/// Rejects zero and negative limits, returning the value as unsigned.
pub(crate) fn require_positive(field: &'static str, value: i64) -> Result<u32> {
    if value <= 0 {
        return Err(Error::validation(
            field,
            format!("must be a positive number, got {}", value),
        ));
    }

    u32::try_from(value).map_err(|_| Error::validation(field, format!("{} is too large", value)))
}
