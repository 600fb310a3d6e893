//! Export of a [`NetworkGraph`] to graph interchange formats.

use std::io::{self, BufWriter};

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use waygraph_core::NetworkGraph;
use waygraph_fs::{create_utf8_file, ensure_parent_dir};

mod gexf;

pub use gexf::{GEXF_NAMESPACE, write_gexf};

/// Counts of what an export wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GexfSummary {
    /// Nodes written, i.e. nodes with at least one neighbour.
    pub nodes: usize,
    /// Directed edges written.
    pub edges: usize,
}

/// Errors returned when writing a GEXF document.
#[derive(Debug, Error)]
pub enum GexfError {
    /// The XML writer failed.
    #[error("failed to write GEXF document")]
    Xml(#[from] quick_xml::Error),
    /// The output could not be flushed.
    #[error("failed to flush GEXF document")]
    Io(#[from] io::Error),
    /// The output file or its parent directory could not be created.
    #[error("failed to create GEXF file at {path}")]
    Create {
        /// Target path.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// Writes `network` as GEXF to the file at `path`, creating missing parent
/// directories and replacing any existing file.
///
/// # Errors
///
/// Returns [`GexfError::Create`] when the file cannot be created and any
/// error of [`write_gexf`].
pub fn write_gexf_file(network: &NetworkGraph, path: &Utf8Path) -> Result<GexfSummary, GexfError> {
    let create_error = |source| GexfError::Create {
        path: path.to_path_buf(),
        source,
    };
    ensure_parent_dir(path).map_err(create_error)?;
    let file = create_utf8_file(path).map_err(create_error)?;
    write_gexf(network, BufWriter::new(file))
}
