//! Test fixture loading utilities

use std::path::PathBuf;

/// Get the path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// Path to a measurement report fixture, as a string
pub fn measurement_fixture(name: &str) -> String {
    fixture_path(&format!("measurements/{}", name))
        .to_string_lossy()
        .into_owned()
}
