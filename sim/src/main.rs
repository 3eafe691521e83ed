use std::path::PathBuf;

use clap::Parser;
use sim::init::{self, RunOptions};
use sim::scenario::load_scenario;

#[derive(Parser, Debug)]
#[command(version, about = "Headless hull hydrodynamics run", long_about = None)]
struct Args {
    /// Scenario file (.ron). Uses the built-in calm scenario when omitted
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Override the number of steps
    #[arg(short = 'n', long)]
    steps: Option<u32>,

    /// Override the fixed step (s)
    #[arg(short, long)]
    dt: Option<f32>,

    /// Pace the run at wall-clock speed
    #[arg(short, long, default_value_t = false)]
    realtime: bool,

    /// Log every stat each step
    #[arg(short, long, default_value_t = false)]
    echo_stats: bool,
}

fn main() {
    let args = Args::parse();

    let mut scenario = match load_scenario(args.scenario.as_deref()) {
        Ok(scenario) => scenario,
        Err(err) => {
            eprintln!("Error: could not load scenario: {err}");
            std::process::exit(1);
        }
    };

    if let Some(steps) = args.steps {
        scenario.steps = steps;
    }
    if let Some(dt) = args.dt {
        scenario.dt = dt;
    }
    if let Err(err) = scenario.validate() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }

    init::init(
        scenario,
        RunOptions {
            realtime: args.realtime,
            echo_stats: args.echo_stats,
        },
    );
}
