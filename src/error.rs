//! Crate error type.
//!
//! Only setup and host operations can fail. Guest memory accesses never
//! return errors: unmodeled hardware is logged and defaulted on the bus.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or hosting a machine.
#[derive(Debug, Error)]
pub enum Error {
    /// A ROM image does not have the size its window requires.
    #[error("{rom} ROM must be {expected} bytes, got {actual}")]
    RomSize {
        rom: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A ROM image could not be read from disk.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The host window or input layer failed.
    #[error("host error: {0}")]
    Host(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
