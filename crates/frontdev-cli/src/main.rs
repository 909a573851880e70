//! frontdev entry point: parse flags, set up output, run.

use frontdev_cli::{cli, commands, error, logger, ui};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse_args();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    commands::execute(args).await.map_err(error::cli_error_to_miette)
}
