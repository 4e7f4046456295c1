use thiserror::Error;

#[derive(Debug, Error)]
pub enum PmpError {
    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("division by zero computing {0}")]
    DivisionByZero(&'static str),

    #[error("unknown process group: {0}")]
    UnknownProcessGroup(String),

    #[error("unknown knowledge area: {0}")]
    UnknownKnowledgeArea(String),

    #[error("{field} out of range: {value} not in [{min}, {max}]")]
    InvalidRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid type for '{field}': expected {expected}")]
    InvalidType {
        field: String,
        expected: &'static str,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PmpError {
    /// `MissingField` naming several fields at once.
    pub fn missing_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = fields.into_iter().map(|f| f.as_ref().to_string()).collect();
        PmpError::MissingField(names.join(", "))
    }

    pub fn is_division_by_zero(&self) -> bool {
        matches!(self, PmpError::DivisionByZero(_))
    }
}

pub type Result<T> = std::result::Result<T, PmpError>;
