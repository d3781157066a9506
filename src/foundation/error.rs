//! Engine error type
//!
//! Every failure the engine reports is a contract violation by the caller:
//! bad indices, mismatched array sizes, grids returned to the wrong pool, or
//! a configuration that cannot describe a grid. The one exception is a
//! runner thread the OS refuses to start. Numerical edge cases (such as
//! cancelled normals) are states, not errors, and never show up here.

use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Cell coordinate outside the grid rectangle
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    IndexOutOfBounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },

    /// Flat index past the end of the grid
    #[error("index {index} is outside 0..{len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Flat input array does not cover the grid exactly
    #[error("{name} has {actual} entries, expected {expected}")]
    SizeMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Grid or bitmap of the wrong size, e.g. returned to another pool
    #[error("grid is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}")]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Background thread could not be started
    #[error("worker thread: {0}")]
    Worker(String),
}

impl EngineError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        EngineError::InvalidConfig(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_values() {
        let err = EngineError::SizeMismatch {
            name: "presence array",
            expected: 12,
            actual: 10,
        };
        assert_eq!(err.to_string(), "presence array has 10 entries, expected 12");

        let err = EngineError::IndexOutOfBounds { x: -1, y: 3, width: 4, height: 4 };
        assert!(err.to_string().contains("(-1, 3)"));
    }
}
