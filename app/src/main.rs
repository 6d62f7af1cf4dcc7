use anyhow::Context;
use clap::Parser;
use turmite::{SimConfig, Topology};

mod app;

/// Watch a turmite walk.
#[derive(Parser)]
struct Args {
    #[arg(default_value = "RL")]
    rule: String,

    #[arg(long, default_value_t = Topology::Square)]
    grid: Topology,

    #[arg(long)]
    step_limit: Option<u64>,

    /// Steps taken per rendered frame.
    #[arg(long, default_value_t = 50)]
    speed: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = SimConfig {
        step_limit: args.step_limit,
        progress_interval: 0,
        ..SimConfig::new(args.rule, args.grid)
    };
    // Fail before a window opens.
    let sim = config.build().context("invalid simulation settings")?;
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Langton's ant",
        options,
        Box::new(move |cc| Ok(Box::new(app::App::new(cc, sim, args.speed)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}
