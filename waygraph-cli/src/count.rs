//! Count command implementation.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use waygraph_data::{OsmElementCounts, count_osm_xml};

use crate::{ARG_INPUT, CliError, ENV_COUNT_INPUT, require_existing};

/// CLI arguments for the `count` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "count",
    about = "Count the nodes, ways and relations of an OSM XML file"
)]
#[ortho_config(prefix = "WAYGRAPH")]
pub(crate) struct CountArgs {
    /// Path to the OpenStreetMap XML file.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) input: Option<Utf8PathBuf>,
}

impl CountArgs {
    fn into_config(self) -> Result<CountConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        CountConfig::try_from(merged)
    }
}

/// Resolved `count` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CountConfig {
    pub(crate) input: Utf8PathBuf,
}

impl TryFrom<CountArgs> for CountConfig {
    type Error = CliError;

    fn try_from(args: CountArgs) -> Result<Self, Self::Error> {
        let input = args.input.ok_or(CliError::MissingArgument {
            field: ARG_INPUT,
            env: ENV_COUNT_INPUT,
        })?;
        Ok(Self { input })
    }
}

pub(crate) fn run_count_with(args: CountArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    require_existing(&config.input, ARG_INPUT)?;
    let counts = count_osm_xml(&config.input)?;
    write_counts(writer, &counts)
}

fn write_counts(writer: &mut dyn Write, counts: &OsmElementCounts) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(counts).map_err(CliError::SerialiseCounts)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
