use thiserror::Error;

#[derive(Error, Debug)]
pub enum RotationError {
    #[error("Need at least {minimum} people to build a schedule, have {headcount}")]
    InsufficientStaff { headcount: usize, minimum: usize },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RotationError>;
