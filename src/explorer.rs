//! Name-keyed view over the transforms a library exposes.

use crate::error::QueryError;
use crate::library::Introspect;
use crate::transform::{LibraryInfo, TransformInfo};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use tracing::debug;

/// Transforms discovered in a library, indexed by name.
///
/// The explorer copies everything out of the library when it is built,
/// so it does not keep the library borrowed. Iteration is in name order.
///
/// ```rust,ignore
/// let library = unsafe { Library::open(path)? };
/// let explorer = Explorer::new(&library)?;
/// for transform in explorer.iter() {
///     println!("{transform}\n");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Explorer {
    /// Library name as reported by the library.
    library_name: String,
    /// Library version as reported by the library.
    library_version: String,
    /// Transform name -> description.
    transforms: BTreeMap<String, TransformInfo>,
}

impl Explorer {
    /// Query `library` and index its transforms.
    pub fn new(library: &impl Introspect) -> Result<Self, QueryError> {
        Self::from_info(library.query()?)
    }

    /// Index an already-queried library.
    ///
    /// Transform names must be non-empty and unique.
    pub fn from_info(info: LibraryInfo) -> Result<Self, QueryError> {
        let mut transforms = BTreeMap::new();
        for transform in info.transforms {
            if transform.name.is_empty() {
                return Err(QueryError::InvalidDescriptor {
                    library: info.name,
                    reason: "transform name is empty".to_string(),
                });
            }
            match transforms.entry(transform.name.clone()) {
                Entry::Occupied(_) => {
                    return Err(QueryError::DuplicateTransform {
                        name: transform.name,
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(transform);
                }
            }
        }

        debug!(
            library = %info.name,
            version = %info.version,
            transforms = transforms.len(),
            "explored library"
        );

        Ok(Self {
            library_name: info.name,
            library_version: info.version,
            transforms,
        })
    }

    /// Query `library` again and replace the indexed transforms.
    ///
    /// On failure the explorer is left unchanged.
    pub fn refresh(&mut self, library: &impl Introspect) -> Result<(), QueryError> {
        *self = Self::new(library)?;
        Ok(())
    }

    /// Get the library name.
    pub fn library_name(&self) -> &str {
        &self.library_name
    }

    /// Get the library version.
    pub fn library_version(&self) -> &str {
        &self.library_version
    }

    /// Get the transform mapping.
    pub fn transforms(&self) -> &BTreeMap<String, TransformInfo> {
        &self.transforms
    }

    /// Iterate over transforms in name order.
    pub fn iter(&self) -> impl Iterator<Item = &TransformInfo> {
        self.transforms.values()
    }

    /// List transform names in order.
    pub fn names(&self) -> Vec<&str> {
        self.transforms.keys().map(String::as_str).collect()
    }

    /// Look up a transform by name.
    pub fn get(&self, name: &str) -> Option<&TransformInfo> {
        self.transforms.get(name)
    }

    /// Check if a transform is available.
    pub fn contains(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }

    /// Number of transforms.
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Check whether the library exposes no transforms.
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Transforms that can consume the output of the named transform.
    ///
    /// Returns `None` if no transform has that name.
    pub fn successors(&self, name: &str) -> Option<Vec<&TransformInfo>> {
        let upstream = self.transforms.get(name)?;
        Some(
            self.iter()
                .filter(|t| t.accepts_output_of(upstream))
                .collect(),
        )
    }

    /// Render every transform, each followed by a blank line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for transform in self.iter() {
            out.push_str(&transform.to_string());
            out.push_str("\n\n");
        }
        out
    }
}

impl<'a> IntoIterator for &'a Explorer {
    type Item = (&'a String, &'a TransformInfo);
    type IntoIter = std::collections::btree_map::Iter<'a, String, TransformInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.transforms.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library(transforms: Vec<TransformInfo>) -> LibraryInfo {
        LibraryInfo {
            name: "test".to_string(),
            version: "1.0.0".to_string(),
            transforms,
        }
    }

    fn speech_library() -> LibraryInfo {
        library(vec![
            TransformInfo::new("MFCC", "Mel cepstrum.", "ArrayFormatF", "ArrayFormatF"),
            TransformInfo::new("Framer", "Splits into windows.", "ArrayFormat16", "ArrayFormatF"),
            TransformInfo::new("FFT", "Spectrum.", "ArrayFormatF", "ArrayFormatF")
                .with_parameter("inverse", "Inverse transform.", "false"),
        ])
    }

    #[test]
    fn test_explorer_indexes_by_name() {
        let explorer = Explorer::new(&speech_library()).unwrap();
        assert_eq!(explorer.len(), 3);
        assert_eq!(explorer.names(), vec!["FFT", "Framer", "MFCC"]);
        assert!(explorer.contains("MFCC"));
        assert!(!explorer.contains("Beat"));
        assert_eq!(explorer.library_name(), "test");
        assert_eq!(explorer.library_version(), "1.0.0");
        assert_eq!(explorer.get("FFT").unwrap().parameters.len(), 1);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let info = library(vec![
            TransformInfo::new("Energy", "", "ArrayFormatF", "ArrayFormatF"),
            TransformInfo::new("Energy", "again", "ArrayFormatF", "ArrayFormatF"),
        ]);
        match Explorer::from_info(info) {
            Err(QueryError::DuplicateTransform { name }) => assert_eq!(name, "Energy"),
            other => panic!("expected DuplicateTransform, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_name_rejected() {
        let info = library(vec![
            TransformInfo::new("Energy", "", "ArrayFormatF", "ArrayFormatF"),
            TransformInfo::new("", "unnamed", "ArrayFormatF", "ArrayFormatF"),
        ]);
        match Explorer::new(&info) {
            Err(QueryError::InvalidDescriptor { library, reason }) => {
                assert_eq!(library, "test");
                assert_eq!(reason, "transform name is empty");
            }
            other => panic!("expected InvalidDescriptor, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_library() {
        let explorer = Explorer::new(&library(Vec::new())).unwrap();
        assert!(explorer.is_empty());
        assert_eq!(explorer.render(), "");
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let source = speech_library();
        let mut explorer = Explorer::new(&source).unwrap();
        let before: Vec<String> = explorer.names().iter().map(|s| s.to_string()).collect();
        explorer.refresh(&source).unwrap();
        assert_eq!(explorer.names(), before);
    }

    #[test]
    fn test_failed_refresh_keeps_state() {
        let mut explorer = Explorer::new(&speech_library()).unwrap();
        let broken = library(vec![
            TransformInfo::new("A", "", "x", "x"),
            TransformInfo::new("A", "", "x", "x"),
        ]);
        assert!(explorer.refresh(&broken).is_err());
        assert_eq!(explorer.len(), 3);
    }

    #[test]
    fn test_render_separates_with_blank_lines() {
        let explorer = Explorer::new(&speech_library()).unwrap();
        let text = explorer.render();
        assert_eq!(text.matches("\n\n").count(), 3);
        assert!(text.starts_with("FFT\n"));
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn test_successors_follow_formats() {
        let explorer = Explorer::new(&speech_library()).unwrap();
        let names: Vec<&str> = explorer
            .successors("Framer")
            .unwrap()
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["FFT", "MFCC"]);
        assert!(explorer.successors("Beat").is_none());
    }

    #[test]
    fn test_into_iterator() {
        let explorer = Explorer::new(&speech_library()).unwrap();
        let mut count = 0;
        for (name, transform) in &explorer {
            assert_eq!(name, &transform.name);
            count += 1;
        }
        assert_eq!(count, 3);
    }
}
