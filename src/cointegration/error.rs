//! Cointegration input errors

use thiserror::Error;

/// Inputs the engine refuses to test
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CointegrationError {
    #[error("Series lengths differ: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
    #[error("Need at least {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },
}
