use thiserror::Error;

/// Errors that abort a reduction call.
///
/// Recoverable conditions (an empty selection, a failing evaluation oracle during calibration)
/// never surface here; they are logged and replaced by a fallback.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Dataset {name:?} has no instances")]
    EmptyDataSet { name: String },

    #[error("Label count {n_labels} is out of range for {n_attributes} attributes")]
    InvalidLabelCount { n_labels: usize, n_attributes: usize },

    #[error("Label {label} of row {row} must be 0 or 1, found {value}")]
    InvalidLabelValue { row: usize, label: usize, value: f32 },

    #[error("Feature {column} of row {row} must be finite, found {value}")]
    InvalidFeatureValue { row: usize, column: usize, value: f32 },

    #[error("Row {row} has {actual} {what}, expected {expected}")]
    DimensionMismatch {
        row: usize,
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid hyper-parameter: {0}")]
    InvalidHyperParam(String),

    #[error("Evaluation oracle {learner} failed: {message}")]
    Oracle { learner: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
