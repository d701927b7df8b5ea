#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{context}: missing process label '{label}'")]
    MissingProcess { label: String, context: String },
    #[error("{context}: unknown process label '{label}'")]
    UnknownProcess { label: String, context: String },
    #[error("{context}: process label '{label}' appears more than once")]
    DuplicateProcess { label: String, context: String },
    #[error("row {row}: expected {expected} fields, found {found}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("row {row}, column '{column}': '{value}' is not a valid number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },
    #[error("row {row}, column '{column}': negative value {value}")]
    NegativeValue { row: usize, column: String, value: f64 },
    #[error("equipment table: process '{label}' has {count} machines, the limit is {max}")]
    TooManyMachines { label: String, count: f64, max: u32 },
    #[error("equipment table is missing the '{0}' column")]
    MissingColumn(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
