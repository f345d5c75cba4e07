//! Loading feature extraction libraries and discovering their transforms.
//!
//! A feature extraction library is a shared library (.so on Linux) that
//! exports a single symbol:
//!
//! ```c
//! const LibraryDescriptor* sfe_library_descriptor();
//! ```
//!
//! The descriptor lists the library's transforms together with their
//! buffer formats and parameters. The ABI is kept minimal and
//! C-compatible, so the library can be written in any language.
//!
//! # Example Library (Rust)
//!
//! ```ignore
//! sound_feature_extraction::define_library! {
//!     name: "my_features",
//!     version: "0.1.0",
//!     transforms: [
//!         {
//!             name: "Intensity",
//!             description: "Unnormalized sound intensity calculation.",
//!             input: "ArrayFormatF",
//!             output: "SingleFormatF",
//!             parameters: [],
//!         },
//!     ]
//! }
//! ```

mod descriptor;
mod introspect;
mod loader;

pub use descriptor::{
    ENTRY_POINT_SYMBOL, EntryPoint, LibraryDescriptor, ParameterDescriptor, SFE_ABI_VERSION,
    TransformDescriptor,
};
pub use introspect::{Introspect, StaticLibrary};
pub use loader::{Library, LibraryLoader};
