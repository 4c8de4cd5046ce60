use thiserror::Error;

/// Rejected caller input. Fatal to the single call that supplied it; a batch
/// never aborts on one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputValidationError {
    #[error("{side} text must not be empty or whitespace-only")]
    EmptyText { side: &'static str },
    #[error("document {index} must not be empty or whitespace-only")]
    EmptyDocument { index: usize },
    #[error("weight `{name}` must be within [0.0, 1.0], got {value}")]
    WeightOutOfRange { name: &'static str, value: f64 },
    #[error("scoring weights must sum to 1.0 within {tolerance:e}, got {sum}")]
    WeightSumMismatch { sum: f64, tolerance: f64 },
}

/// Failure inside a single subscore calculator. Recovered at the aggregation
/// boundary: substituted with the neutral 0.5 and logged with the posting id.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubscoreError {
    #[error("malformed {field}: {detail}")]
    MalformedField { field: &'static str, detail: String },
}

/// Embedding backend failure. Recovered by permanently switching the engine
/// to the lexical fallback for the rest of the process lifetime.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    #[error("embedding backend failed to initialize: {0}")]
    InitFailed(String),
    #[error("embedding backend encode call failed: {0}")]
    EncodeFailed(String),
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}
