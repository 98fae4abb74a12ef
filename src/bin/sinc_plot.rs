//! Plot y = sin(x)/x

use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

use vdpsim::curve::{sample, sinc};
use vdpsim::logging;
use vdpsim::{Figure, SimError, TimeGrid};

/// Plot sin(x)/x over an evenly spaced grid
#[derive(Parser, Debug)]
#[command(name = "sinc-plot", version)]
struct Cli {
    /// Starts in silent mode, only errors are output
    #[arg(short, long)]
    silent: bool,

    /// Shows debug info
    #[arg(short, long)]
    debug: bool,

    /// Path to the output image (.png, .bmp, .jpg or .svg)
    #[arg(short, long)]
    output_path: PathBuf,

    /// First sample
    #[arg(long, default_value_t = 0.02, allow_negative_numbers = true)]
    start: f64,

    /// Last sample
    #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
    stop: f64,

    /// Number of samples
    #[arg(long, default_value_t = 100)]
    points: usize,
}

fn plot(cli: &Cli) -> Result<(), SimError> {
    let grid = TimeGrid::linspace(cli.start, cli.stop, cli.points)?;
    let figure = Figure::function_plot("sin(x)/x", "x", "y", sample(&grid, sinc));
    figure.save(&cli.output_path)?;
    info!("Output to: {}", cli.output_path.display());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.silent, cli.debug);

    match plot(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
