use thiserror::Error;

/// Errors raised by the clustering engines and their I/O helpers.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// `k`, `max_iter` or a similar knob is outside its allowed range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Input rows could not be turned into a valid point set.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Coincident or isolated points made a step undefined
    /// (zero degree in the normalized graph, empty K-means cluster).
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// A non-finite value appeared while iterating.
    #[error("numerical instability: {0}")]
    NumericalInstability(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, ClusterError>;
