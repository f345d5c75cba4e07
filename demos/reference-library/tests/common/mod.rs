//! Helpers shared by the tests that load the built shared object.

use std::path::PathBuf;

/// Platform file name of the built reference library.
pub fn library_file_name() -> std::ffi::OsString {
    libloading::library_filename("sfe_reference_library")
}

/// Locate the cdylib cargo built next to the running test binary.
///
/// Test binaries live in `target/<profile>/deps`; the library is written
/// there and copied up to `target/<profile>`.
pub fn built_library() -> PathBuf {
    let exe = std::env::current_exe().unwrap();
    let file_name = library_file_name();
    exe.ancestors()
        .skip(1)
        .take(2)
        .map(|dir| dir.join(&file_name))
        .find(|path| path.exists())
        .unwrap_or_else(|| {
            panic!(
                "{} not found next to {}",
                file_name.to_string_lossy(),
                exe.display()
            )
        })
}
