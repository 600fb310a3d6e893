//! Error types emitted by the waygraph CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use waygraph_core::UnknownWeightingScheme;
use waygraph_data::{GexfError, OsmIngestError};

/// Errors emitted by the waygraph CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Name of the missing argument.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// A referenced input path does not exist.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Argument naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Argument naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Argument naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The configured weighting scheme is unknown.
    #[error(transparent)]
    InvalidWeighting(#[from] UnknownWeightingScheme),
    /// The configured road class list is empty.
    #[error("--{field} needs at least one road class")]
    EmptyHighwayList {
        /// Argument naming the list.
        field: &'static str,
    },
    /// OSM ingestion failed.
    #[error("failed to ingest OSM data: {0}")]
    OsmIngest(#[from] OsmIngestError),
    /// Writing the GEXF output failed.
    #[error("failed to export GEXF: {0}")]
    WriteGexf(#[from] GexfError),
    /// Serialising the element counts failed.
    #[error("failed to serialise element counts: {0}")]
    SerialiseCounts(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write command output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
