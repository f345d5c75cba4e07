//! # Sound Feature Extraction explorer
//!
//! Load a native sound feature extraction library and discover the
//! transforms it provides.
//!
//! A library is a shared object exporting `sfe_library_descriptor`, which
//! returns static tables describing each transform: its name, a short
//! description, the buffer formats it consumes and produces, and its
//! parameters with their defaults.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sound_feature_extraction::prelude::*;
//!
//! let config = ExplorerConfig::from_env();
//! let library = unsafe { config.open()? };
//! let explorer = Explorer::new(&library)?;
//! for transform in explorer.iter() {
//!     println!("{transform}\n");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod config;
pub mod error;
pub mod explorer;
pub mod format;
pub mod library;
pub mod logging;
pub mod transform;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::ExplorerConfig;
    pub use crate::error::{Error, LoadError, QueryError, Result};
    pub use crate::explorer::Explorer;
    pub use crate::format::FormatId;
    pub use crate::library::{Introspect, Library, LibraryLoader, StaticLibrary};
    pub use crate::transform::{LibraryInfo, ParameterInfo, TransformInfo};
}

pub use error::{Error, Result};

#[doc(hidden)]
pub mod __private {
    pub use paste;
}
