//! Library and transform descriptors for the C-compatible ABI.
//!
//! These types define the minimal ABI surface that a feature extraction
//! library must implement to be explored. The tables are static data owned
//! by the library; [`LibraryDescriptor::to_info`] copies them into owned
//! Rust values.

use crate::format::FormatId;
use crate::transform::{LibraryInfo, ParameterInfo, TransformInfo};
use std::collections::BTreeMap;
use std::ffi::{CStr, c_char};

/// Current ABI version. Libraries must match this version to be explored.
pub const SFE_ABI_VERSION: u32 = 1;

/// Name of the symbol every library exports, NUL-terminated.
pub const ENTRY_POINT_SYMBOL: &[u8] = b"sfe_library_descriptor\0";

/// Type of the library entry point function.
pub type EntryPoint = unsafe extern "C" fn() -> *const LibraryDescriptor;

/// Describes one parameter of a transform.
///
/// This struct is `#[repr(C)]` for C ABI compatibility.
#[repr(C)]
pub struct ParameterDescriptor {
    /// Null-terminated parameter name.
    pub name: *const c_char,
    /// Null-terminated description (may be null).
    pub description: *const c_char,
    /// Null-terminated default value (may be null).
    pub default_value: *const c_char,
}

/// Describes a single transform provided by a library.
///
/// This struct is `#[repr(C)]` for C ABI compatibility.
#[repr(C)]
pub struct TransformDescriptor {
    /// Null-terminated transform name (e.g., "FilterBank").
    pub name: *const c_char,
    /// Null-terminated description (may be null).
    pub description: *const c_char,
    /// Null-terminated input format id; null means identity.
    pub input_format: *const c_char,
    /// Null-terminated output format id; null means identity.
    pub output_format: *const c_char,
    /// Number of entries in the `parameters` array.
    pub num_parameters: u32,
    /// Array of parameter descriptors.
    pub parameters: *const ParameterDescriptor,
}

/// Descriptor returned by `sfe_library_descriptor()`.
///
/// This struct is `#[repr(C)]` for C ABI compatibility.
#[repr(C)]
pub struct LibraryDescriptor {
    /// ABI version - must match `SFE_ABI_VERSION`.
    pub abi_version: u32,
    /// Null-terminated library name.
    pub name: *const c_char,
    /// Null-terminated library version string.
    pub version: *const c_char,
    /// Number of elements in the `transforms` array.
    pub num_transforms: u32,
    /// Array of transform descriptors.
    pub transforms: *const TransformDescriptor,
}

// SAFETY: The descriptors contain only raw pointers to static data,
// which is never written after the library is loaded.
unsafe impl Send for ParameterDescriptor {}
unsafe impl Sync for ParameterDescriptor {}
unsafe impl Send for TransformDescriptor {}
unsafe impl Sync for TransformDescriptor {}
unsafe impl Send for LibraryDescriptor {}
unsafe impl Sync for LibraryDescriptor {}

/// Read a required string field.
///
/// # Safety
///
/// `ptr` must be null or point to a valid null-terminated string.
unsafe fn required_str<'a>(ptr: *const c_char, field: &str) -> Result<&'a str, String> {
    if ptr.is_null() {
        return Err(format!("{field} is null"));
    }
    // SAFETY: Caller guarantees non-null pointers are valid and null-terminated.
    let s = unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| format!("{field} is not valid UTF-8"))?;
    if s.is_empty() {
        return Err(format!("{field} is empty"));
    }
    Ok(s)
}

/// Read an optional string field, mapping null to the empty string.
///
/// # Safety
///
/// `ptr` must be null or point to a valid null-terminated string.
unsafe fn optional_str<'a>(ptr: *const c_char, field: &str) -> Result<&'a str, String> {
    if ptr.is_null() {
        return Ok("");
    }
    // SAFETY: Caller guarantees non-null pointers are valid and null-terminated.
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| format!("{field} is not valid UTF-8"))
}

/// View a `(pointer, count)` pair as a slice.
///
/// # Safety
///
/// If non-null, `ptr` must point to `len` initialized items.
unsafe fn table<'a, T>(ptr: *const T, len: u32) -> &'a [T] {
    if ptr.is_null() || len == 0 {
        &[]
    } else {
        // SAFETY: Caller guarantees `ptr` points to `len` items.
        unsafe { std::slice::from_raw_parts(ptr, len as usize) }
    }
}

impl ParameterDescriptor {
    /// Copy this descriptor into a [`ParameterInfo`].
    ///
    /// # Safety
    ///
    /// All pointer fields must be null or valid null-terminated strings.
    pub unsafe fn to_info(&self) -> Result<ParameterInfo, String> {
        // SAFETY: Caller guarantees the pointer fields are valid.
        unsafe {
            Ok(ParameterInfo {
                name: required_str(self.name, "parameter name")?.to_string(),
                description: optional_str(self.description, "parameter description")?
                    .to_string(),
                default_value: optional_str(self.default_value, "parameter default")?
                    .to_string(),
            })
        }
    }
}

impl TransformDescriptor {
    /// Get the parameter descriptors.
    ///
    /// # Safety
    ///
    /// The `parameters` pointer must be valid and point to `num_parameters` items.
    pub unsafe fn parameters(&self) -> &[ParameterDescriptor] {
        // SAFETY: Caller guarantees `parameters` points to a valid array.
        unsafe { table(self.parameters, self.num_parameters) }
    }

    /// Copy this descriptor into a [`TransformInfo`].
    ///
    /// # Safety
    ///
    /// All pointer fields must be null or valid.
    pub unsafe fn to_info(&self) -> Result<TransformInfo, String> {
        // SAFETY: Caller guarantees the pointer fields are valid.
        let name = unsafe { required_str(self.name, "transform name")? };
        let format_id = |ptr: *const c_char, field: &str| -> Result<FormatId, String> {
            if ptr.is_null() {
                Ok(FormatId::identity())
            } else {
                // SAFETY: Non-null format pointers are valid per the caller.
                unsafe { required_str(ptr, field) }.map(FormatId::from)
            }
        };

        if self.parameters.is_null() && self.num_parameters > 0 {
            return Err(format!(
                "{name}: parameter table is null but {} parameters are declared",
                self.num_parameters
            ));
        }

        let mut parameters = BTreeMap::new();
        // SAFETY: Caller guarantees the parameter table is valid.
        for param in unsafe { self.parameters() } {
            // SAFETY: Caller guarantees each parameter descriptor is valid.
            let param = unsafe { param.to_info() }.map_err(|e| format!("{name}: {e}"))?;
            if parameters.contains_key(&param.name) {
                return Err(format!("{name}: parameter '{}' is repeated", param.name));
            }
            parameters.insert(param.name.clone(), param);
        }

        Ok(TransformInfo {
            name: name.to_string(),
            // SAFETY: Caller guarantees the description pointer is valid.
            description: unsafe { optional_str(self.description, "transform description")? }
                .to_string(),
            input_format: format_id(self.input_format, "input format")
                .map_err(|e| format!("{name}: {e}"))?,
            output_format: format_id(self.output_format, "output format")
                .map_err(|e| format!("{name}: {e}"))?,
            parameters,
        })
    }
}

impl LibraryDescriptor {
    /// Get the library name, or "unknown" if it is missing or malformed.
    ///
    /// # Safety
    ///
    /// The `name` pointer must be null or valid and null-terminated.
    pub unsafe fn name_str(&self) -> &str {
        // SAFETY: Caller guarantees `name` is null or valid.
        unsafe { required_str(self.name, "library name").unwrap_or("unknown") }
    }

    /// Get the slice of transform descriptors.
    ///
    /// # Safety
    ///
    /// The `transforms` pointer must be valid and point to `num_transforms` items.
    pub unsafe fn transforms(&self) -> &[TransformDescriptor] {
        // SAFETY: Caller guarantees `transforms` points to a valid array.
        unsafe { table(self.transforms, self.num_transforms) }
    }

    /// Validate the descriptor and copy it into a [`LibraryInfo`].
    ///
    /// The ABI version is checked separately by the caller so that a
    /// mismatch can be reported with both versions.
    ///
    /// # Safety
    ///
    /// All pointer fields, including those of nested descriptors, must be
    /// null or valid.
    pub unsafe fn to_info(&self) -> Result<LibraryInfo, String> {
        // SAFETY: Caller guarantees every pointer in the tables is valid.
        unsafe {
            let name = required_str(self.name, "library name")?.to_string();
            let version = required_str(self.version, "library version")?.to_string();
            if self.transforms.is_null() && self.num_transforms > 0 {
                return Err(format!(
                    "transform table is null but {} transforms are declared",
                    self.num_transforms
                ));
            }
            let transforms = self
                .transforms()
                .iter()
                .map(|t| t.to_info())
                .collect::<Result<Vec<_>, _>>()?;
            Ok(LibraryInfo {
                name,
                version,
                transforms,
            })
        }
    }
}

/// Helper macro for defining a library descriptor in Rust.
///
/// Emits the static descriptor tables and the exported
/// `sfe_library_descriptor` entry point. Transform names must be valid
/// Rust identifiers.
///
/// # Example
///
/// ```ignore
/// sound_feature_extraction::define_library! {
///     name: "my_features",
///     version: "1.0.0",
///     transforms: [
///         {
///             name: "Energy",
///             description: "Calculates the energy of each complex number.",
///             input: "ArrayFormatF",
///             output: "ArrayFormatF",
///             parameters: [],
///         },
///     ]
/// }
/// ```
#[macro_export]
macro_rules! define_library {
    (
        name: $name:literal,
        version: $version:literal,
        transforms: [
            $(
                {
                    name: $t_name:literal,
                    description: $t_desc:literal,
                    input: $t_in:literal,
                    output: $t_out:literal,
                    parameters: [
                        $(
                            {
                                name: $p_name:literal,
                                description: $p_desc:literal,
                                default: $p_default:literal $(,)?
                            }
                        ),* $(,)?
                    ] $(,)?
                }
            ),* $(,)?
        ] $(,)?
    ) => {
        // Parameter tables, one per transform
        $(
            $crate::__private::paste::paste! {
                static [<SFE_PARAMS_ $t_name:upper>]: &[$crate::library::ParameterDescriptor] = &[
                    $(
                        $crate::library::ParameterDescriptor {
                            name: concat!($p_name, "\0").as_ptr() as *const std::ffi::c_char,
                            description: concat!($p_desc, "\0").as_ptr() as *const std::ffi::c_char,
                            default_value: concat!($p_default, "\0").as_ptr() as *const std::ffi::c_char,
                        },
                    )*
                ];
            }
        )*

        // Transform descriptors array
        $crate::__private::paste::paste! {
            static SFE_TRANSFORM_DESCRIPTORS: &[$crate::library::TransformDescriptor] = &[
                $(
                    $crate::library::TransformDescriptor {
                        name: concat!($t_name, "\0").as_ptr() as *const std::ffi::c_char,
                        description: concat!($t_desc, "\0").as_ptr() as *const std::ffi::c_char,
                        input_format: concat!($t_in, "\0").as_ptr() as *const std::ffi::c_char,
                        output_format: concat!($t_out, "\0").as_ptr() as *const std::ffi::c_char,
                        num_parameters: [<SFE_PARAMS_ $t_name:upper>].len() as u32,
                        parameters: [<SFE_PARAMS_ $t_name:upper>].as_ptr(),
                    },
                )*
            ];
        }

        // Library descriptor
        static SFE_LIBRARY_DESCRIPTOR: $crate::library::LibraryDescriptor =
            $crate::library::LibraryDescriptor {
                abi_version: $crate::library::SFE_ABI_VERSION,
                name: concat!($name, "\0").as_ptr() as *const std::ffi::c_char,
                version: concat!($version, "\0").as_ptr() as *const std::ffi::c_char,
                num_transforms: SFE_TRANSFORM_DESCRIPTORS.len() as u32,
                transforms: SFE_TRANSFORM_DESCRIPTORS.as_ptr(),
            };

        /// Library entry point.
        #[unsafe(no_mangle)]
        pub extern "C" fn sfe_library_descriptor() -> *const $crate::library::LibraryDescriptor {
            &SFE_LIBRARY_DESCRIPTOR
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    static PARAMS: [ParameterDescriptor; 1] = [ParameterDescriptor {
        name: c"rectify".as_ptr(),
        description: c"Rectify the output.".as_ptr(),
        default_value: ptr::null(),
    }];

    fn diff() -> TransformDescriptor {
        TransformDescriptor {
            name: c"Diff".as_ptr(),
            description: ptr::null(),
            input_format: c"ArrayFormatF".as_ptr(),
            output_format: ptr::null(),
            num_parameters: 1,
            parameters: PARAMS.as_ptr(),
        }
    }

    #[test]
    fn test_abi_version() {
        assert_eq!(SFE_ABI_VERSION, 1);
        assert_eq!(ENTRY_POINT_SYMBOL.last(), Some(&0));
    }

    #[test]
    fn test_transform_to_info_fills_optional_fields() {
        let info = unsafe { diff().to_info() }.unwrap();
        assert_eq!(info.name, "Diff");
        assert_eq!(info.description, "");
        assert_eq!(info.input_format.as_str(), "ArrayFormatF");
        assert!(info.output_format.is_identity());
        assert_eq!(info.parameter("rectify").unwrap().default_value, "");
    }

    #[test]
    fn test_transform_without_name_is_rejected() {
        let mut desc = diff();
        desc.name = ptr::null();
        let err = unsafe { desc.to_info() }.unwrap_err();
        assert_eq!(err, "transform name is null");
    }

    #[test]
    fn test_empty_transform_name_is_rejected() {
        let mut desc = diff();
        desc.name = c"".as_ptr();
        let err = unsafe { desc.to_info() }.unwrap_err();
        assert_eq!(err, "transform name is empty");
    }

    #[test]
    fn test_transform_with_dangling_parameter_count_is_rejected() {
        let mut desc = diff();
        desc.num_parameters = 5;
        desc.parameters = ptr::null();
        let err = unsafe { desc.to_info() }.unwrap_err();
        assert_eq!(err, "Diff: parameter table is null but 5 parameters are declared");

        desc.num_parameters = 0;
        assert!(unsafe { desc.to_info() }.unwrap().parameters.is_empty());
    }

    #[test]
    fn test_library_with_dangling_count_is_rejected() {
        let desc = LibraryDescriptor {
            abi_version: SFE_ABI_VERSION,
            name: c"broken".as_ptr(),
            version: c"0.1.0".as_ptr(),
            num_transforms: 3,
            transforms: ptr::null(),
        };
        assert!(unsafe { desc.to_info() }.is_err());
        assert_eq!(unsafe { desc.name_str() }, "broken");
    }

    #[test]
    fn test_library_without_transforms() {
        let desc = LibraryDescriptor {
            abi_version: SFE_ABI_VERSION,
            name: c"empty".as_ptr(),
            version: c"0.1.0".as_ptr(),
            num_transforms: 0,
            transforms: ptr::null(),
        };
        let info = unsafe { desc.to_info() }.unwrap();
        assert!(info.transforms.is_empty());
    }
}
