use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use vdpsim::config::SimulationConfig;
use vdpsim::driver::Method;
use vdpsim::logging;
use vdpsim::pipeline;
use vdpsim::render::RenderMode;
use vdpsim::SimError;

const EPILOG: &str = "FC2001 team";

/// Simple differential equation integrator
#[derive(Parser, Debug)]
#[command(name = "vdpsim", version, after_help = EPILOG)]
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

    /// Initial position [default: 0]
    #[arg(short = 'x', long, allow_negative_numbers = true)]
    initial_position: Option<f64>,

    /// Initial momentum [default: 1]
    #[arg(short = 'p', long, allow_negative_numbers = true)]
    initial_momentum: Option<f64>,

    /// Integration time [default: 2π]
    #[arg(short = 't', long, allow_negative_numbers = true)]
    integration_time: Option<f64>,

    /// Step size [default: 0.01]
    #[arg(short = 'k', long, allow_negative_numbers = true)]
    delta_time: Option<f64>,

    /// Damping values to sweep [default: 0 1 2]
    #[arg(long, num_args = 1.., allow_negative_numbers = true)]
    mu: Option<Vec<f64>>,

    /// ODE solver [default: rk4]
    #[arg(long, value_enum)]
    solver: Option<Method>,

    /// Panel layout [default: multi]
    #[arg(long, value_enum)]
    mode: Option<RenderMode>,

    /// Also write the trajectories to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// JSON configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn simulation_config(&self) -> Result<SimulationConfig, SimError> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_json_file(path)?,
            None => SimulationConfig::default(),
        };

        if let Some(x) = self.initial_position {
            config.initial_position = x;
        }
        if let Some(p) = self.initial_momentum {
            config.initial_momentum = p;
        }
        if let Some(t) = self.integration_time {
            config.integration_time = t;
        }
        if let Some(k) = self.delta_time {
            config.delta_time = k;
        }
        if let Some(mu) = &self.mu {
            config.mu_values = mu.clone();
        }
        if let Some(solver) = self.solver {
            config.solver = solver;
        }
        if let Some(mode) = self.mode {
            config.render_mode = mode;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    let start = Instant::now();
    let cli = Cli::parse();

    logging::init(cli.silent, cli.debug);
    logging::print_welcome("diff_eq");

    let outcome = cli
        .simulation_config()
        .and_then(|config| pipeline::run(&config, &cli.output_path, cli.csv.as_deref()));

    match outcome {
        Ok(_) => {
            info!("Total computation time: {:?}", start.elapsed());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
