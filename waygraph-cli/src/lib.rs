//! Command-line interface converting OpenStreetMap extracts into weighted
//! road graphs.
#![forbid(unsafe_code)]

use std::io::Write;

use camino::Utf8Path;
use clap::{Parser, Subcommand};

mod convert;
mod count;
mod error;

pub use error::CliError;

use convert::{ConvertArgs, run_convert};
use count::{CountArgs, run_count_with};

pub(crate) const ARG_INPUT: &str = "input";
pub(crate) const ARG_OUTPUT: &str = "output";
pub(crate) const ARG_HIGHWAY: &str = "highway";
pub(crate) const ARG_WEIGHTING: &str = "weighting";
pub(crate) const ARG_DIRECTED: &str = "directed";
pub(crate) const ARG_SKIP_SIMPLIFY: &str = "skip-simplify";
pub(crate) const ARG_STRICT: &str = "strict";
pub(crate) const ENV_CONVERT_INPUT: &str = "WAYGRAPH_CMDS_CONVERT_INPUT";
pub(crate) const ENV_COUNT_INPUT: &str = "WAYGRAPH_CMDS_COUNT_INPUT";

/// Runs the waygraph CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments or configuration are invalid, or when
/// the selected command fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    dispatch(cli.command, &mut stdout)
}

fn dispatch(command: Command, stdout: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Convert(args) => run_convert(args).map(|_| ()),
        Command::Count(args) => run_count_with(args, stdout),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "waygraph",
    about = "Convert OpenStreetMap XML into weighted road graphs",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build a simplified road graph and write it as GEXF.
    Convert(ConvertArgs),
    /// Count the nodes, ways and relations of an OSM XML file.
    Count(CountArgs),
}

/// Checks that `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match waygraph_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests;
