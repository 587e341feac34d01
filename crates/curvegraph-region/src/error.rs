//! Region errors

use thiserror::Error;

/// Region errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegionError {
    #[error("Index overflow: {requested} vertices requested, limit is {limit}")]
    IndexOverflow { requested: u64, limit: u32 },

    #[error("Aliased vertex {relative} out of range, shape has {available} raw vertices")]
    AliasOutOfRange { relative: u32, available: usize },

    #[error("Triangle {triangle} mixes aliased and fresh vertices")]
    MixedTriangle { triangle: usize },

    #[error("Inconsistent sample configuration: {left} vs {right} samples")]
    InconsistentSampleConfiguration { left: u32, right: u32 },
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;
