//! Reference feature extraction library.
//!
//! Publishes the catalog of the standard sound feature extraction
//! transforms through `sfe_library_descriptor`. Build it as a cdylib and
//! point `sfe-explore` at the result:
//!
//! ```text
//! cargo build -p sfe-reference-library
//! sfe-explore --library target/debug/libsfe_reference_library.so
//! ```
//!
//! The library only describes the transforms; it does not implement them.

use sound_feature_extraction::define_library;

define_library! {
    name: "SoundFeatureExtraction",
    version: "0.1.0",
    transforms: [
        {
            name: "Energy",
            description: "Calculates the squared magnitude of each complex number.",
            input: "ArrayFormatF",
            output: "ArrayFormatF",
            parameters: [],
        },
        {
            name: "FilterBank",
            description: "Converts the signal to the selected psychoacoustic scale (default is mel).",
            input: "ArrayFormatF",
            output: "ArrayFormatF",
            parameters: [
                {
                    name: "type",
                    description: "The type of the scale. Supported values are \"linear\", \"mel\" and \"bark\".",
                    default: "mel",
                },
                {
                    name: "number",
                    description: "The number of triangular filters.",
                    default: "32",
                },
                {
                    name: "frequency_min",
                    description: "Minimal frequency of the filter bank.",
                    default: "130",
                },
                {
                    name: "frequency_max",
                    description: "Maximal frequency of the filter bank.",
                    default: "6854",
                },
                {
                    name: "squared",
                    description: "Apply the squared filter bank.",
                    default: "false",
                },
                {
                    name: "debug",
                    description: "Dump the precalculated filter bank.",
                    default: "false",
                },
            ],
        },
        {
            name: "Diff",
            description: "Finds the difference from one sample to the next.",
            input: "ArrayFormatF",
            output: "ArrayFormatF",
            parameters: [
                {
                    name: "rectify",
                    description: "Replace negative differences with zero.",
                    default: "false",
                },
                {
                    name: "swt",
                    description: "Differentiate using the stationary wavelet transform of this level (0 disables).",
                    default: "0",
                },
            ],
        },
        {
            name: "Beat",
            description: "Detects the tempo using comb filter energies.",
            input: "ArrayFormatF",
            output: "FixedArrayF<2>",
            parameters: [
                {
                    name: "bands",
                    description: "The number of bands to sum up.",
                    default: "1",
                },
                {
                    name: "pulses",
                    description: "The number of pulses in the comb filter.",
                    default: "3",
                },
                {
                    name: "min_bpm",
                    description: "Minimal tempo to search for, in beats per minute.",
                    default: "60",
                },
                {
                    name: "max_bpm",
                    description: "Maximal tempo to search for, in beats per minute.",
                    default: "240",
                },
                {
                    name: "resolution1",
                    description: "Tempo step of the rough first pass.",
                    default: "1",
                },
                {
                    name: "resolution2",
                    description: "Tempo step of the precise second pass.",
                    default: "0.1",
                },
                {
                    name: "max_peaks",
                    description: "The number of tempo candidates to output.",
                    default: "3",
                },
                {
                    name: "debug",
                    description: "Dump the calculated energies.",
                    default: "false",
                },
            ],
        },
        {
            name: "Mean",
            description: "Calculates arithmetic and geometric means.",
            input: "ArrayFormatF",
            output: "FixedArrayF<2>",
            parameters: [
                {
                    name: "types",
                    description: "Space separated mean types to calculate: \"arithmetic\", \"geometric\".",
                    default: "arithmetic",
                },
            ],
        },
        {
            name: "RDFT",
            description: "Discrete Fourier transform of a real signal using FFT.",
            input: "ArrayFormatF",
            output: "ArrayFormatF",
            parameters: [],
        },
        {
            name: "RDFTInverse",
            description: "Inverse discrete Fourier transform to a real signal using FFT.",
            input: "ArrayFormatF",
            output: "ArrayFormatF",
            parameters: [],
        },
        {
            name: "ZeroPadding",
            description: "Pads the signal with zeros to make its length a power of 2.",
            input: "ArrayFormatF",
            output: "ArrayFormatF",
            parameters: [],
        },
        {
            name: "Intensity",
            description: "Unnormalized sound intensity calculation.",
            input: "ArrayFormatF",
            output: "SingleFormatF",
            parameters: [],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use sound_feature_extraction::explorer::Explorer;
    use sound_feature_extraction::library::{Introspect, SFE_ABI_VERSION, StaticLibrary};

    fn library() -> StaticLibrary {
        StaticLibrary::from_fn(sfe_library_descriptor).with_label("reference")
    }

    #[test]
    fn test_library_descriptor_is_valid() {
        let desc = sfe_library_descriptor();
        assert!(!desc.is_null());

        // SAFETY: The pointer is non-null and points to the static descriptor.
        unsafe {
            let desc = &*desc;
            assert_eq!(desc.abi_version, SFE_ABI_VERSION);
            assert_eq!(desc.num_transforms, 9);
        }
    }

    #[test]
    fn test_catalog_names() {
        let explorer = Explorer::new(&library()).unwrap();
        assert_eq!(
            explorer.names(),
            vec![
                "Beat",
                "Diff",
                "Energy",
                "FilterBank",
                "Intensity",
                "Mean",
                "RDFT",
                "RDFTInverse",
                "ZeroPadding",
            ]
        );
        assert_eq!(explorer.library_name(), "SoundFeatureExtraction");
    }

    #[test]
    fn test_filter_bank_defaults() {
        let info = library().query().unwrap();
        let filter_bank = info
            .transforms
            .iter()
            .find(|t| t.name == "FilterBank")
            .unwrap();
        assert_eq!(filter_bank.parameters.len(), 6);
        assert_eq!(filter_bank.parameter("type").unwrap().default_value, "mel");
        assert_eq!(filter_bank.parameter("frequency_max").unwrap().default_value, "6854");
    }

    #[test]
    fn test_every_transform_renders() {
        let explorer = Explorer::new(&library()).unwrap();
        for transform in explorer.iter() {
            let text = transform.to_string();
            assert!(text.starts_with(&transform.name));
            assert!(text.contains("input:"));
        }
    }

    #[test]
    fn test_intensity_produces_scalars() {
        let explorer = Explorer::new(&library()).unwrap();
        let names: Vec<&str> = explorer
            .successors("Intensity")
            .unwrap()
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert!(names.is_empty());
    }
}
