use thiserror::Error;

#[derive(Debug, Error)]
pub enum KytchenError {
    #[error("Unknown component: {0}")]
    UnknownComponent(String),

    #[error("Identifier already in use: {0}")]
    DuplicateIdentifier(String),

    #[error("Recipe contains itself: {0}")]
    CyclicComposition(String),

    #[error("Plan lists {consume} consume days but {prepare_extra} prepare days")]
    MismatchedPlanLength { consume: usize, prepare_extra: usize },

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

pub type Result<T> = std::result::Result<T, KytchenError>;
