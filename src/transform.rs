//! Safe descriptions of the transforms a library exposes.
//!
//! These types are owned copies of the C descriptor tables, so they stay
//! valid after the library that produced them is unloaded.

use crate::format::FormatId;
use std::collections::BTreeMap;
use std::fmt;

/// A configurable parameter of a transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterInfo {
    /// Parameter name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Default value, as the library renders it.
    pub default_value: String,
}

/// Description of a single transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformInfo {
    /// Unique transform name (e.g. "FilterBank").
    pub name: String,
    /// One-line description.
    pub description: String,
    /// Format of the buffers the transform consumes.
    pub input_format: FormatId,
    /// Format of the buffers the transform produces.
    pub output_format: FormatId,
    /// Parameters keyed by name.
    pub parameters: BTreeMap<String, ParameterInfo>,
}

impl TransformInfo {
    /// Create a transform description without parameters.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_format: impl Into<FormatId>,
        output_format: impl Into<FormatId>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_format: input_format.into(),
            output_format: output_format.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Add a parameter, replacing any parameter of the same name.
    pub fn with_parameter(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        default_value: impl Into<String>,
    ) -> Self {
        let name = name.into();
        self.parameters.insert(
            name.clone(),
            ParameterInfo {
                name,
                description: description.into(),
                default_value: default_value.into(),
            },
        );
        self
    }

    /// Look up a parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&ParameterInfo> {
        self.parameters.get(name)
    }

    /// Check whether this transform can consume the output of `upstream`.
    pub fn accepts_output_of(&self, upstream: &TransformInfo) -> bool {
        upstream.output_format.is_compatible(&self.input_format)
    }
}

impl fmt::Display for TransformInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        if !self.description.is_empty() {
            writeln!(f, "    {}", self.description)?;
        }
        writeln!(f, "    input:  {}", self.input_format)?;
        writeln!(f, "    output: {}", self.output_format)?;
        if self.parameters.is_empty() {
            return write!(f, "    parameters: none");
        }
        write!(f, "    parameters:")?;
        // Column width in characters, not bytes.
        let column = |p: &ParameterInfo| p.name.chars().count() + p.default_value.chars().count();
        let width = self.parameters.values().map(column).max().unwrap_or(0);
        for param in self.parameters.values() {
            let pad = width - column(param);
            write!(
                f,
                "\n        {} = {}{}    {}",
                param.name,
                param.default_value,
                " ".repeat(pad),
                param.description
            )?;
        }
        Ok(())
    }
}

/// Everything a library reported about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryInfo {
    /// Library name.
    pub name: String,
    /// Library version.
    pub version: String,
    /// Transforms in the order the library listed them.
    pub transforms: Vec<TransformInfo>,
}

impl fmt::Display for LibraryInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({} transforms)",
            self.name,
            self.version,
            self.transforms.len()
        )
    }
}
