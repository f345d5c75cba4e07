//! Dynamic library loading using libloading.

use super::descriptor::{ENTRY_POINT_SYMBOL, EntryPoint};
use super::introspect::{Introspect, query_entry_point};
use crate::error::{LoadError, QueryError};
use crate::transform::LibraryInfo;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A loaded feature extraction library.
///
/// The native handle is released when the `Library` is dropped. Share it
/// through an `Arc` when several owners need it.
pub struct Library {
    /// The loaded library.
    handle: libloading::Library,
    /// Path the library was loaded from.
    path: PathBuf,
}

impl Library {
    /// Load a library from a specific path.
    ///
    /// A bare file name refers to the current directory, as it does for
    /// every other file operation, and is stored as `./<name>`.
    ///
    /// # Safety
    ///
    /// Loading a library runs its initialization routines, which is
    /// arbitrary native code. The library must be trusted. If it exports
    /// `sfe_library_descriptor`, that function must return a valid, static
    /// descriptor.
    pub unsafe fn open(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = local_path(path.as_ref());
        if !path.exists() {
            return Err(LoadError::NotFound { path });
        }

        debug!(path = %path.display(), "loading library");
        // SAFETY: Loading a dynamic library. Caller ensures the library is trusted.
        let handle = match unsafe { libloading::Library::new(&path) } {
            Ok(handle) => handle,
            Err(source) => return Err(LoadError::Open { path, source }),
        };

        Ok(Self { handle, path })
    }

    /// Get the path the library was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name used to refer to this library in errors and logs.
    fn display_name(&self) -> String {
        self.path.display().to_string()
    }
}

/// Anchor a bare file name to the current directory.
///
/// The dynamic loader searches the system library paths for names without
/// a directory separator and never looks in the current directory.
fn local_path(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Path::new(".").join(path),
        _ => path.to_path_buf(),
    }
}

impl Introspect for Library {
    fn query(&self) -> Result<LibraryInfo, QueryError> {
        // SAFETY: Getting a symbol from a library that is still loaded. The
        // function pointer is only used while `self.handle` is alive.
        let entry: EntryPoint = unsafe {
            *self
                .handle
                .get::<EntryPoint>(ENTRY_POINT_SYMBOL)
                .map_err(|_| QueryError::MissingEntryPoint {
                    library: self.display_name(),
                })?
        };

        // SAFETY: `open` requires the entry point to return a valid descriptor.
        unsafe { query_entry_point(entry, &self.display_name()) }
    }
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library").field("path", &self.path).finish()
    }
}

/// Library loader that resolves bare library names against search paths.
#[derive(Debug, Clone)]
pub struct LibraryLoader {
    /// Search paths for libraries.
    search_paths: Vec<PathBuf>,
}

impl LibraryLoader {
    /// Create a new loader with default search paths.
    pub fn new() -> Self {
        Self {
            search_paths: vec![
                // Current directory
                PathBuf::from("."),
                // Standard install locations
                PathBuf::from("/usr/lib/sound-feature-extraction"),
                PathBuf::from("/usr/local/lib/sound-feature-extraction"),
            ],
        }
    }

    /// Create a loader with no search paths at all.
    pub fn empty() -> Self {
        Self {
            search_paths: Vec::new(),
        }
    }

    /// Add a search path. Paths are searched in insertion order.
    pub fn add_search_path(&mut self, path: impl Into<PathBuf>) {
        self.search_paths.push(path.into());
    }

    /// Get the search paths.
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Find the file for a library given its bare name.
    ///
    /// The name is mapped to the platform file name, so on Linux
    /// "SoundFeatureExtraction" is looked up as `libSoundFeatureExtraction.so`.
    pub fn find(&self, name: &str) -> Result<PathBuf, LoadError> {
        let file_name = libloading::library_filename(name);

        for search_path in &self.search_paths {
            let path = search_path.join(&file_name);
            if path.exists() {
                debug!(name, path = %path.display(), "found library");
                return Ok(path);
            }
        }

        Err(LoadError::NotInSearchPaths {
            name: name.to_string(),
            searched: self.search_paths.clone(),
        })
    }

    /// Load a library by name, searching in all search paths.
    ///
    /// # Safety
    ///
    /// See [`Library::open`] for safety requirements.
    pub unsafe fn load_by_name(&self, name: &str) -> Result<Library, LoadError> {
        let path = self.find(name)?;
        // SAFETY: Caller guarantees the library is trusted.
        unsafe { Library::open(&path) }
    }
}

impl Default for LibraryLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_loader_creation() {
        let loader = LibraryLoader::new();
        assert!(!loader.search_paths().is_empty());
        assert!(LibraryLoader::empty().search_paths().is_empty());
    }

    #[test]
    fn test_loader_add_search_path() {
        let mut loader = LibraryLoader::new();
        let initial_count = loader.search_paths().len();
        loader.add_search_path("/custom/path");
        assert_eq!(loader.search_paths().len(), initial_count + 1);
        assert_eq!(loader.search_paths().last().unwrap(), Path::new("/custom/path"));
    }

    #[test]
    fn test_load_nonexistent_by_name() {
        let loader = LibraryLoader::new();
        let result = unsafe { loader.load_by_name("nonexistent_library_xyz") };
        match result {
            Err(LoadError::NotInSearchPaths { name, searched }) => {
                assert_eq!(name, "nonexistent_library_xyz");
                assert_eq!(searched, loader.search_paths());
            }
            other => panic!("expected NotInSearchPaths, got {other:?}"),
        }
    }

    #[test]
    fn test_open_missing_path() {
        let result = unsafe { Library::open("/nonexistent/libSoundFeatureExtraction.so") };
        assert!(matches!(result, Err(LoadError::NotFound { .. })));
    }

    #[test]
    fn test_open_non_library_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not a shared object").unwrap();
        let result = unsafe { Library::open(file.path()) };
        match result {
            Err(LoadError::Open { path, .. }) => assert_eq!(path, file.path()),
            other => panic!("expected Open error, got {other:?}"),
        }
    }

    #[test]
    fn test_bare_name_is_anchored_to_current_dir() {
        assert_eq!(
            local_path(Path::new("libSoundFeatureExtraction.so")),
            Path::new("./libSoundFeatureExtraction.so")
        );
        assert_eq!(local_path(Path::new("lib/libsfe.so")), Path::new("lib/libsfe.so"));
        assert_eq!(local_path(Path::new("./libsfe.so")), Path::new("./libsfe.so"));
        assert_eq!(local_path(Path::new("/opt/libsfe.so")), Path::new("/opt/libsfe.so"));
    }

    #[test]
    fn test_open_missing_bare_name() {
        let result = unsafe { Library::open("libsfe_missing_xyz.so") };
        match result {
            Err(LoadError::NotFound { path }) => {
                assert_eq!(path, Path::new("./libsfe_missing_xyz.so"))
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_find_prefers_first_search_path() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let file_name = libloading::library_filename("Features");
        std::fs::write(first.path().join(&file_name), b"").unwrap();
        std::fs::write(second.path().join(&file_name), b"").unwrap();

        let mut loader = LibraryLoader::empty();
        loader.add_search_path(first.path());
        loader.add_search_path(second.path());
        assert_eq!(loader.find("Features").unwrap(), first.path().join(&file_name));
    }
}
