//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "trexgraph", about = "multi-document graph construction tool.")]
/// Holds every command that is callable by the `trexgraph` command.
pub enum TrexgraphCli {
    #[structopt(about = "Run pipeline")]
    Pipeline(Pipeline),
}

#[derive(Debug, StructOpt)]
/// Pipeline command and parameters.
///
/// ```sh
/// trexgraph-pipeline 0.1.0
/// Run pipeline
///
/// USAGE:
///     trexgraph pipeline [OPTIONS] <src> <dst>
///
/// FLAGS:
///     -h, --help       Prints help information
///     -V, --version    Prints version information
///
/// OPTIONS:
///         --parses-path <parses-path>    Path to precomputed parses [default: parses.json]
///
/// ARGS:
///     <src>    source (contains n.json)
///     <dst>    pipeline result destination
/// ```
pub struct Pipeline {
    #[structopt(parse(from_os_str), help = "source (contains n.json)")]
    pub src: PathBuf,
    #[structopt(parse(from_os_str), help = "pipeline result destination")]
    pub dst: PathBuf,
    #[structopt(
        parse(from_os_str),
        long = "parses-path",
        help = "Path to precomputed dependency parses (JSON)",
        default_value = "parses.json"
    )]
    pub parses_path: PathBuf,
}
