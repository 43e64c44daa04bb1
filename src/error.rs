use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
pub enum KdIndexError {
    /// A tree cannot be built with leaves holding zero points.
    #[error("Leaf size must be at least 1, got {0}.")]
    InvalidLeafSize(usize),

    /// A point returned by the accessor does not have the advertised dimensionality.
    #[error("Point {id} has {actual} coordinates when {expected} were expected.")]
    DimensionMismatch {
        id: u32,
        expected: usize,
        actual: usize,
    },

    /// A split strategy proposed a position outside of the range it was asked to split.
    #[error("Split position {pos} is outside of the range ({left}, {right}].")]
    InvalidSplit {
        left: usize,
        right: usize,
        pos: usize,
    },

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, KdIndexError>;
