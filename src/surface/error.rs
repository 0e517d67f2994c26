// src/surface/error.rs
use crate::math::MathError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("Shape mismatch on axis {axis}: expected {expected}, got {actual}")]
    ShapeMismatch {
        axis: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid coordinates: {message}")]
    InvalidCoordinates { message: String },

    #[error("Invalid levels: {message}")]
    InvalidLevels { message: String },

    #[error("Unknown colormap '{name}'")]
    UnknownColormap { name: String },

    #[error(transparent)]
    Math(#[from] MathError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SurfaceResult<T> = Result<T, SurfaceError>;
