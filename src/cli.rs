use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Experiment to run (density-growth, density-peak, pattern-stability,
    /// interaction, clustering, census)
    #[arg(value_name = "EXPERIMENT")]
    pub experiment: String,

    /// Path to config TOML
    #[arg(long, default_value = "config.toml")]
    pub config: String,

    /// Trials per sweep point (overrides config)
    #[arg(long)]
    pub trials: Option<usize>,

    /// Generations per run (overrides config)
    #[arg(long)]
    pub generations: Option<u32>,

    /// Seed for reproducible initial grids
    #[arg(long)]
    pub seed: Option<u64>,
}
