//! Error types for loading and querying feature extraction libraries.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the crate's [`enum@Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for explorer operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The library could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The library was loaded but its transforms could not be queried.
    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Errors that can occur when opening a library.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Nothing exists at the given path.
    #[error("library not found: {}", path.display())]
    NotFound {
        /// Path that was tried.
        path: PathBuf,
    },

    /// The OS loader rejected the file.
    #[error("failed to load library {}: {source}", path.display())]
    Open {
        /// Path of the rejected file.
        path: PathBuf,
        /// Underlying loader error.
        #[source]
        source: libloading::Error,
    },

    /// A library looked up by name was not present in any search path.
    #[error("library '{name}' not found in search paths {searched:?}")]
    NotInSearchPaths {
        /// Bare library name.
        name: String,
        /// Directories that were searched, in order.
        searched: Vec<PathBuf>,
    },

    /// Neither a path nor a name was configured.
    #[error("no library path or name configured")]
    Unconfigured,
}

/// Errors that can occur when querying a loaded library for its transforms.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The library doesn't export the introspection entry point.
    #[error("library '{library}' has no entry point sfe_library_descriptor")]
    MissingEntryPoint {
        /// Library that was queried.
        library: String,
    },

    /// The entry point returned a null descriptor.
    #[error("library '{library}' returned a null descriptor")]
    NullDescriptor {
        /// Library that was queried.
        library: String,
    },

    /// ABI version mismatch.
    #[error("library '{library}' has ABI version {actual}, expected {expected}")]
    AbiMismatch {
        /// Library that was queried.
        library: String,
        /// Expected ABI version.
        expected: u32,
        /// Actual ABI version found.
        actual: u32,
    },

    /// The descriptor tables are malformed.
    #[error("library '{library}' has an invalid descriptor: {reason}")]
    InvalidDescriptor {
        /// Library that was queried.
        library: String,
        /// What was wrong.
        reason: String,
    },

    /// Two transforms share the same name.
    #[error("transform '{name}' is described more than once")]
    DuplicateTransform {
        /// Repeated transform name.
        name: String,
    },
}
