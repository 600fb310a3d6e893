//! Shared helpers for waygraph-data integration tests.

use camino::Utf8PathBuf;

/// Directory containing the OSM XML fixtures.
pub fn fixtures_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}
