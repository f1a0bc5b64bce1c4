//! # trexgraph
//!
//! trexgraph builds multi-document dependency graphs from entity-linked
//! corpora (T-REx-style JSON dumps).
//!
//! ## Getting started
//!
//! ```sh
//! trexgraph 0.1.0
//! multi-document graph construction tool.
//!
//! USAGE:
//!     trexgraph <SUBCOMMAND>
//!
//! FLAGS:
//!     -h, --help       Prints help information
//!     -V, --version    Prints version information
//!
//! SUBCOMMANDS:
//!     help        Prints this message or the help of the given subcommand(s)
//!     pipeline    Run pipeline
//! ```
use log::debug;
use structopt::StructOpt;

use trexgraph::cli;
use trexgraph::error::Error;
use trexgraph::pipelines::{Pipeline, TrexGraph};

fn main() -> Result<(), Error> {
    env_logger::init();

    let opt = cli::TrexgraphCli::from_args();
    debug!("cli args\n{:#?}", opt);

    match opt {
        cli::TrexgraphCli::Pipeline(p) => {
            let pipeline = TrexGraph::new(p.src, p.dst, p.parses_path);
            pipeline.run()?;
        }
    };
    Ok(())
}
