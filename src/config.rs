//! Where to find the feature extraction library.
//!
//! The artifact is located from, in order of preference:
//!
//! 1. an explicit path (`SFE_LIBRARY_PATH` or [`ExplorerConfig::with_library_path`]),
//! 2. a bare library name resolved against the search paths
//!    (`SFE_LIBRARY_SEARCH_PATH` entries first, then the loader defaults).

use crate::error::LoadError;
use crate::library::{Library, LibraryLoader};
use std::path::PathBuf;
use tracing::debug;

/// Environment variable holding an explicit library path.
pub const LIBRARY_PATH_ENV: &str = "SFE_LIBRARY_PATH";

/// Environment variable holding extra search directories (OS path list).
pub const SEARCH_PATH_ENV: &str = "SFE_LIBRARY_SEARCH_PATH";

/// Library name used when nothing else is configured.
pub const DEFAULT_LIBRARY_NAME: &str = "SoundFeatureExtraction";

/// Configuration for locating the library to explore.
#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    /// Explicit path to the library. Takes precedence over the name.
    pub library_path: Option<PathBuf>,
    /// Bare library name, without platform prefix and suffix.
    pub library_name: String,
    /// Extra directories searched before the default locations.
    pub search_paths: Vec<PathBuf>,
    /// Whether to include the default search locations.
    pub default_search_paths: bool,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            library_path: None,
            library_name: DEFAULT_LIBRARY_NAME.to_string(),
            search_paths: Vec::new(),
            default_search_paths: true,
        }
    }
}

impl ExplorerConfig {
    /// Build a config from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var_os(LIBRARY_PATH_ENV),
            std::env::var_os(SEARCH_PATH_ENV),
        )
    }

    /// Build a config from the raw values of the two environment variables.
    pub fn from_vars(
        library_path: Option<std::ffi::OsString>,
        search_path: Option<std::ffi::OsString>,
    ) -> Self {
        let search_paths = search_path
            .map(|dirs| {
                std::env::split_paths(&dirs)
                    .filter(|p| !p.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default();
        Self {
            library_path: library_path.filter(|p| !p.is_empty()).map(PathBuf::from),
            search_paths,
            ..Self::default()
        }
    }

    /// Use an explicit library path.
    pub fn with_library_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.library_path = Some(path.into());
        self
    }

    /// Look the library up by this name.
    pub fn with_library_name(mut self, name: impl Into<String>) -> Self {
        self.library_name = name.into();
        self
    }

    /// Add a directory searched before the defaults.
    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_paths.push(path.into());
        self
    }

    /// Search only the configured directories.
    pub fn without_default_search_paths(mut self) -> Self {
        self.default_search_paths = false;
        self
    }

    /// Build the loader these settings describe.
    pub fn loader(&self) -> LibraryLoader {
        let mut loader = LibraryLoader::empty();
        for path in &self.search_paths {
            loader.add_search_path(path);
        }
        if self.default_search_paths {
            for path in LibraryLoader::new().search_paths() {
                loader.add_search_path(path);
            }
        }
        loader
    }

    /// Resolve the library file to load.
    pub fn resolve(&self) -> Result<PathBuf, LoadError> {
        if let Some(path) = &self.library_path {
            debug!(path = %path.display(), "using configured library path");
            return Ok(path.clone());
        }
        if self.library_name.is_empty() {
            return Err(LoadError::Unconfigured);
        }
        self.loader().find(&self.library_name)
    }

    /// Resolve and load the library.
    ///
    /// # Safety
    ///
    /// See [`Library::open`] for safety requirements.
    pub unsafe fn open(&self) -> Result<Library, LoadError> {
        let path = self.resolve()?;
        // SAFETY: Caller guarantees the configured library is trusted.
        unsafe { Library::open(path) }
    }
}
