//! Error type shared by all parts of the library.

use ndarray_linalg::error::LinalgError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Invalid truncation or configuration, including mismatched operator
    /// dimensions.
    #[error("configuration error: {0}")]
    Config(String),

    /// An eigensolve failed inside LAPACK.
    #[error("solver error: {0}")]
    Solver(#[from] LinalgError),

    /// The accelerator backend was requested but none is available.
    #[error("accelerator backend unavailable")]
    AcceleratorUnavailable,

    /// Index maps and gather arrays disagree on the truncation they were built
    /// for.
    #[error("internal invariant violated: {0}")]
    Invariant(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("error parsing configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("error reading array: {0}")]
    NpyRead(#[from] ndarray_npy::ReadNpyError),

    #[error("error writing array: {0}")]
    NpyWrite(#[from] ndarray_npy::WriteNpyError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Shorthand for an early return with [`Error::Config`].
macro_rules! config_err {
    ( $($arg:tt)* ) => {
        return Err($crate::error::Error::Config(format!($($arg)*)))
    }
}
pub(crate) use config_err;
