//! Command-line front end: run a turmite and report where it ended up.

use std::{
    ops::ControlFlow,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use turmite::{
    Outcome, SimConfig, StopHandle, Topology, Turmite,
    render::{self, Palette, Settings},
};

#[derive(Parser)]
#[command(
    name = "langtons-ant",
    about = "Langton's ant and turmites on square, hex and triangle grids"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a rule until the step limit or Ctrl-C.
    Run(RunArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// Turn per colour, e.g. `RL`, `RRL/LRR` or the explicit `{{{1,R,0},{0,L,0}}}`.
    rule: String,

    #[arg(long, default_value_t = Topology::Square)]
    grid: Topology,

    /// Total steps before the ant halts. Unbounded when omitted.
    #[arg(long)]
    step_limit: Option<u64>,

    /// Log progress every N steps (0 turns it off).
    #[arg(long, default_value_t = 100_000)]
    progress_every: u64,

    /// Print the final square grid as text.
    #[arg(long)]
    print: bool,

    /// Save the final grid as an image, format taken from the extension (png, ppm, ...).
    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(long, default_value_t = 512)]
    width: usize,

    #[arg(long, default_value_t = 512)]
    height: usize,
}

impl RunArgs {
    fn config(&self) -> SimConfig {
        SimConfig {
            step_limit: self.step_limit,
            progress_interval: self.progress_every,
            ..SimConfig::new(&self.rule, self.grid)
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    execute(Cli::parse(), |stop| {
        ctrlc::set_handler(move || stop.stop()).context("failed to install the Ctrl-C handler")
    })
}

/// `on_start` receives the stop handle once the configuration is valid.
fn execute(cli: Cli, on_start: impl FnOnce(StopHandle) -> Result<()>) -> Result<()> {
    match cli.command {
        Command::Run(args) => run(args, on_start),
    }
}

fn run(args: RunArgs, on_start: impl FnOnce(StopHandle) -> Result<()>) -> Result<()> {
    if args.step_limit.is_none() {
        log::warn!("no step limit, press Ctrl-C to stop");
    }
    let mut sim = args
        .config()
        .build()
        .with_context(|| format!("invalid rule {:?} on the {} grid", args.rule, args.grid))?;
    on_start(sim.stop_handle())?;

    let report = sim.run(None, |turmite| {
        log::info!(
            "step {}: {} cells, ant at {}",
            turmite.steps(),
            turmite.grid().len(),
            turmite.ant().position
        );
        ControlFlow::Continue(())
    });
    let ant = report.ant;
    let how = match report.outcome {
        Outcome::Completed | Outcome::LimitReached => "finished",
        Outcome::Interrupted => "interrupted",
    };
    println!(
        "{how} after {} steps: ant at {} heading {} in state {}, {} cells coloured",
        report.total_steps,
        ant.position,
        ant.heading,
        ant.state,
        sim.turmite().grid().len()
    );

    if args.print {
        print_grid(sim.turmite());
    }
    if let Some(path) = &args.output {
        save(sim.turmite(), path, &args)?;
    }
    Ok(())
}

fn print_grid(turmite: &Turmite) {
    if turmite.topology() != Topology::Square {
        log::warn!(
            "--print draws square cells, the {} grid will look skewed",
            turmite.topology()
        );
    }
    println!("{}", turmite.grid().picture());
}

fn save(turmite: &Turmite, path: &Path, args: &RunArgs) -> Result<()> {
    let settings = Settings {
        width: args.width,
        height: args.height,
        ..Settings::default()
    };
    let palette = Palette::new(turmite.rules().colors());
    let pixels = render::render(turmite, settings, &palette);
    render::save(path, settings, &pixels)
        .with_context(|| format!("cannot write {}", path.display()))?;
    log::info!("wrote {}x{} image to {}", args.width, args.height, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn execute_args(
        args: &[&str],
        on_start: impl FnOnce(StopHandle) -> Result<()>,
    ) -> Result<()> {
        let args = std::iter::once("langtons-ant").chain(args.iter().copied());
        execute(Cli::try_parse_from(args).unwrap(), on_start)
    }

    #[test]
    fn test_bad_rule_fails() {
        assert!(execute_args(&["run", "RX"], |_| Ok(())).is_err());
        assert!(execute_args(&["run", "R2", "--grid", "square"], |_| Ok(())).is_err());
        let hex = ["run", "R2", "--grid", "hex", "--step-limit", "10"];
        assert!(execute_args(&hex, |_| Ok(())).is_ok());
    }

    #[test]
    fn test_completed_run_succeeds() {
        assert!(execute_args(&["run", "RL", "--step-limit", "10"], |_| Ok(())).is_ok());
    }

    #[test]
    fn test_interrupted_run_succeeds() {
        let result = execute_args(&["run", "RL"], |stop| {
            stop.stop();
            Ok(())
        });
        assert!(result.is_ok());
    }

    #[test]
    fn test_unknown_grid_is_rejected() {
        let args = ["langtons-ant", "run", "RL", "--grid", "pentagon"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_output_image() {
        let path = std::env::temp_dir().join(format!("langtons-ant-{}.png", std::process::id()));
        let output = path.to_string_lossy().into_owned();
        let args = ["run", "RL", "--step-limit", "200", "--width", "32", "--height", "16"];
        let args = args.into_iter().chain(["--output", &output]).collect::<Vec<_>>();
        execute_args(&args, |_| Ok(())).unwrap();
        let saved = image::open(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!((saved.width(), saved.height()), (32, 16));
    }
}
