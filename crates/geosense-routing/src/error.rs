//! Normalization error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizationError {
    /// None of fastest/eco/cheapest could be resolved
    #[error("No routes found. Please check your origin and destination.")]
    EmptyComparison,

    /// The backend wrapped the payload in `{success: false, error}`
    #[error("{0}")]
    Rejected(String),
}
