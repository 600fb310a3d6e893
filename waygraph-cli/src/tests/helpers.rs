//! Test helpers for staging OSM extracts on disk.

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// Four nodes along a street: way 10 is a residential road through 1-2-3,
/// way 11 a footway from 3 to 4.
pub(super) const TOWN_OSM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="waygraph-tests">
  <node id="1" lat="51.5000" lon="-0.1300"/>
  <node id="2" lat="51.5010" lon="-0.1290"/>
  <node id="3" lat="51.5020" lon="-0.1280"/>
  <node id="4" lat="51.5030" lon="-0.1270"/>
  <way id="10">
    <nd ref="1"/>
    <nd ref="2"/>
    <nd ref="3"/>
    <tag k="highway" v="residential"/>
  </way>
  <way id="11">
    <nd ref="3"/>
    <nd ref="4"/>
    <tag k="highway" v="footway"/>
  </way>
</osm>
"#;

/// Same as [`TOWN_OSM`] plus a residential way pointing at node 99, which
/// the extract never defines.
pub(super) const BROKEN_OSM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="waygraph-tests">
  <node id="1" lat="51.5000" lon="-0.1300"/>
  <node id="2" lat="51.5010" lon="-0.1290"/>
  <node id="3" lat="51.5020" lon="-0.1280"/>
  <way id="10">
    <nd ref="1"/>
    <nd ref="2"/>
    <nd ref="3"/>
    <tag k="highway" v="residential"/>
  </way>
  <way id="12">
    <nd ref="3"/>
    <nd ref="99"/>
    <tag k="highway" v="residential"/>
  </way>
</osm>
"#;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write test file");
}

/// Temporary directory holding the files of one test.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.path(name);
        write_utf8(&path, contents.as_bytes());
        path
    }
}
