// src/math/error.rs
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Grid data length mismatch: expected {expected} samples, got {actual}")]
    DataLengthMismatch { expected: usize, actual: usize },

    #[error("Grid must have a positive extent, got {rows}x{cols}")]
    EmptyGrid { rows: usize, cols: usize },
}

pub type MathResult<T> = Result<T, MathError>;
