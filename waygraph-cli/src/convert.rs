//! Convert command implementation for the waygraph CLI.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use waygraph_core::{Directionality, NetworkGraph, SimplifyReport, WeightingScheme};
use waygraph_data::{
    GexfSummary, HighwayFilter, IngestOptions, MissingNodePolicy, OsmIngestSummary,
    WayFilterChain, ingest_osm_xml, write_gexf_file,
};

use crate::{
    ARG_DIRECTED, ARG_HIGHWAY, ARG_INPUT, ARG_OUTPUT, ARG_SKIP_SIMPLIFY, ARG_STRICT,
    ARG_WEIGHTING, CliError, ENV_CONVERT_INPUT, require_existing,
};

/// CLI arguments for the `convert` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "convert",
    long_about = "Read an OpenStreetMap XML extract, keep the ways whose \
                 highway class is accepted, collapse interior nodes of \
                 plain road stretches and write the weighted graph as GEXF. \
                 Options can come from CLI flags, configuration files, or \
                 environment variables.",
    about = "Convert OSM XML into a weighted GEXF road graph"
)]
#[ortho_config(prefix = "WAYGRAPH")]
pub(crate) struct ConvertArgs {
    /// Path to the OpenStreetMap XML file.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) input: Option<Utf8PathBuf>,
    /// Destination of the GEXF document (defaults to the input with a
    /// `.gexf` extension).
    #[arg(long = ARG_OUTPUT, short = 'o', value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// Comma-separated `highway` classes to keep.
    #[arg(long = ARG_HIGHWAY, value_name = "class", value_delimiter = ',')]
    #[serde(default)]
    pub(crate) highway: Option<Vec<String>>,
    /// Edge weighting: uniform, importance or importance-distance.
    #[arg(long = ARG_WEIGHTING, value_name = "scheme")]
    #[serde(default)]
    pub(crate) weighting: Option<String>,
    /// Weight each direction of a connection separately.
    #[arg(
        long = ARG_DIRECTED,
        value_name = "bool",
        num_args = 0..=1,
        default_missing_value = "true",
        require_equals = true
    )]
    #[serde(default)]
    pub(crate) directed: Option<bool>,
    /// Export the graph without collapsing interior nodes.
    #[arg(
        long = ARG_SKIP_SIMPLIFY,
        value_name = "bool",
        num_args = 0..=1,
        default_missing_value = "true",
        require_equals = true
    )]
    #[serde(default)]
    pub(crate) skip_simplify: Option<bool>,
    /// Abort on the first way that references an unknown node.
    #[arg(
        long = ARG_STRICT,
        value_name = "bool",
        num_args = 0..=1,
        default_missing_value = "true",
        require_equals = true
    )]
    #[serde(default)]
    pub(crate) strict: Option<bool>,
}

impl ConvertArgs {
    pub(crate) fn into_config(self) -> Result<ConvertConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ConvertConfig::try_from(merged)
    }
}

/// Resolved `convert` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConvertConfig {
    /// OSM XML input.
    pub(crate) input: Utf8PathBuf,
    /// GEXF output.
    pub(crate) output: Utf8PathBuf,
    /// Accepted `highway` classes.
    pub(crate) highway: Vec<String>,
    pub(crate) weighting: WeightingScheme,
    pub(crate) directionality: Directionality,
    pub(crate) simplify: bool,
    pub(crate) missing_nodes: MissingNodePolicy,
}

impl ConvertConfig {
    fn network(&self) -> NetworkGraph {
        NetworkGraph::with_policy(self.weighting).with_directionality(self.directionality)
    }

    fn ingest_options(&self) -> IngestOptions {
        let filter = HighwayFilter::new(self.highway.iter().map(String::as_str));
        IngestOptions::new(WayFilterChain::new().with(filter))
            .with_missing_nodes(self.missing_nodes)
    }
}

impl TryFrom<ConvertArgs> for ConvertConfig {
    type Error = CliError;

    fn try_from(args: ConvertArgs) -> Result<Self, Self::Error> {
        let input = args.input.ok_or(CliError::MissingArgument {
            field: ARG_INPUT,
            env: ENV_CONVERT_INPUT,
        })?;
        let output = args
            .output
            .unwrap_or_else(|| default_output_for(&input));

        let highway = match args.highway {
            None => HighwayFilter::DEFAULT_CLASSES
                .iter()
                .map(|class| (*class).to_owned())
                .collect(),
            Some(requested) => {
                let classes: Vec<String> = requested
                    .into_iter()
                    .map(|class| class.trim().to_owned())
                    .filter(|class| !class.is_empty())
                    .collect();
                if classes.is_empty() {
                    return Err(CliError::EmptyHighwayList { field: ARG_HIGHWAY });
                }
                classes
            }
        };

        let weighting = args
            .weighting
            .as_deref()
            .map(str::parse::<WeightingScheme>)
            .transpose()?
            .unwrap_or_default();

        let directionality = if args.directed.unwrap_or(false) {
            Directionality::Directed
        } else {
            Directionality::Undirected
        };
        let missing_nodes = if args.strict.unwrap_or(false) {
            MissingNodePolicy::Abort
        } else {
            MissingNodePolicy::Skip
        };

        Ok(Self {
            input,
            output,
            highway,
            weighting,
            directionality,
            simplify: !args.skip_simplify.unwrap_or(false),
            missing_nodes,
        })
    }
}

fn default_output_for(input: &Utf8Path) -> Utf8PathBuf {
    input.with_extension("gexf")
}

/// What a successful conversion produced.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ConvertOutcome {
    pub(crate) output: Utf8PathBuf,
    pub(crate) ingest: OsmIngestSummary,
    pub(crate) simplify: Option<SimplifyReport>,
    pub(crate) export: GexfSummary,
}

pub(super) fn run_convert(args: ConvertArgs) -> Result<ConvertOutcome, CliError> {
    let config = args.into_config()?;
    convert_with_config(&config)
}

pub(crate) fn convert_with_config(config: &ConvertConfig) -> Result<ConvertOutcome, CliError> {
    require_existing(&config.input, ARG_INPUT)?;

    let mut network = config.network();
    let ingest = ingest_osm_xml(&config.input, &mut network, &config.ingest_options())?;
    let simplify = config.simplify.then(|| network.simplify());
    let export = write_gexf_file(&network, &config.output)?;

    let outcome = ConvertOutcome {
        output: config.output.clone(),
        ingest,
        simplify,
        export,
    };
    outcome.log();
    Ok(outcome)
}

impl ConvertOutcome {
    fn log(&self) {
        let removed = self.simplify.map_or(0, |report| report.removed);
        info!(
            "Converted {} accepted ways into {} ({} nodes, {} edges, {removed} nodes collapsed)",
            self.ingest.accepted_ways, self.output, self.export.nodes, self.export.edges
        );
    }
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ConvertConfig, CliError> {
    let merged = ConvertArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ConvertConfig::try_from(merged)
}
