//! Capability discovery over library descriptors.

use super::descriptor::{EntryPoint, SFE_ABI_VERSION};
use crate::error::QueryError;
use crate::transform::LibraryInfo;
use tracing::{debug, warn};

/// Anything that can report the transforms it provides.
pub trait Introspect {
    /// Query the library for its name, version and transforms.
    fn query(&self) -> Result<LibraryInfo, QueryError>;
}

impl<T: Introspect + ?Sized> Introspect for &T {
    fn query(&self) -> Result<LibraryInfo, QueryError> {
        (**self).query()
    }
}

impl<T: Introspect + ?Sized> Introspect for std::sync::Arc<T> {
    fn query(&self) -> Result<LibraryInfo, QueryError> {
        (**self).query()
    }
}

impl Introspect for LibraryInfo {
    fn query(&self) -> Result<LibraryInfo, QueryError> {
        Ok(self.clone())
    }
}

/// A library linked into the current process.
///
/// Wraps the entry point directly instead of resolving it from a shared
/// object, e.g. the function emitted by [`define_library!`](crate::define_library).
#[derive(Debug, Clone, Copy)]
pub struct StaticLibrary {
    entry: EntryPoint,
    label: &'static str,
}

impl StaticLibrary {
    /// Wrap an entry point.
    ///
    /// # Safety
    ///
    /// `entry` must return null or a pointer to a valid descriptor that
    /// stays valid for the rest of the program.
    pub unsafe fn new(entry: EntryPoint) -> Self {
        Self {
            entry,
            label: "<static>",
        }
    }

    /// Wrap a safe entry point, as emitted by `define_library!`.
    pub fn from_fn(entry: extern "C" fn() -> *const super::LibraryDescriptor) -> Self {
        Self {
            entry,
            label: "<static>",
        }
    }

    /// Set the label used for this library in errors and logs.
    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }
}

impl Introspect for StaticLibrary {
    fn query(&self) -> Result<LibraryInfo, QueryError> {
        // SAFETY: The constructor requires the entry point to be valid.
        unsafe { query_entry_point(self.entry, self.label) }
    }
}

/// Call an entry point and copy the descriptor it returns.
///
/// # Safety
///
/// `entry` must be callable and return null or a pointer to a valid
/// descriptor whose tables are all valid.
pub(crate) unsafe fn query_entry_point(
    entry: EntryPoint,
    library: &str,
) -> Result<LibraryInfo, QueryError> {
    // SAFETY: Calling the entry point function. Caller guarantees it is valid.
    let descriptor = unsafe { entry() };
    if descriptor.is_null() {
        return Err(QueryError::NullDescriptor {
            library: library.to_string(),
        });
    }

    // SAFETY: Dereferencing the descriptor pointer. Entry point returned non-null.
    let desc = unsafe { &*descriptor };
    if desc.abi_version != SFE_ABI_VERSION {
        return Err(QueryError::AbiMismatch {
            library: library.to_string(),
            expected: SFE_ABI_VERSION,
            actual: desc.abi_version,
        });
    }

    // SAFETY: Caller guarantees the descriptor tables are valid.
    let info = unsafe { desc.to_info() }.map_err(|reason| {
        warn!(library, %reason, "rejected library descriptor");
        QueryError::InvalidDescriptor {
            library: library.to_string(),
            reason,
        }
    })?;

    debug!(
        library,
        name = %info.name,
        version = %info.version,
        transforms = info.transforms.len(),
        "queried library"
    );
    Ok(info)
}
