use thiserror::Error;

/// Failures in the loaded dataset or the scaling derived from it.
///
/// Per-value coercion failures are not represented here: a property that does
/// not parse as a number is missing data for that (feature, year) pair and is
/// skipped locally.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("no 4-digit year attributes found in feature properties")]
    NoYearAttributes,

    #[error("no numeric values found across {features} features and {attributes} year attributes")]
    NoNumericValues { features: usize, attributes: usize },

    #[error("global minimum {0} must be finite and strictly positive")]
    InvalidMinimum(f64),

    #[error("base radius {0} must be strictly positive")]
    InvalidBaseRadius(f64),
}
