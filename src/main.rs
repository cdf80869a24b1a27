use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use lifelab::cli::Args;
use lifelab::config::AppConfig;
use lifelab::experiment::catalog;
use lifelab::sim::dispatcher::Dispatcher;
use lifelab::sim::engine::LifeProcess;
use lifelab::sim::scratch::ScratchDir;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lifelab=info".into()),
        )
        .init();

    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("experiment failed: {err}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load_or_default(&args.config);
    let trials = args.trials.unwrap_or(config.sweep.trials);
    let generations = args.generations.unwrap_or(config.sweep.generations);

    let study = catalog::build(&args.experiment, config.board.clone(), trials, generations)
        .ok_or_else(|| {
            format!(
                "unknown experiment {:?} (available: {})",
                args.experiment,
                catalog::NAMES.join(", ")
            )
        })?;

    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_for_ctrlc = stop_flag.clone();
    ctrlc::set_handler(move || {
        stop_flag_for_ctrlc.store(true, Ordering::SeqCst);
    })?;

    let engine = LifeProcess::new(
        &config.engine.command,
        Duration::from_secs(config.engine.timeout_secs),
    );
    let scratch = ScratchDir::new(&config.engine.scratch_dir)?;
    let dispatcher = Dispatcher::new(engine, config.dispatch.concurrency, scratch)
        .with_stop_flag(stop_flag);

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    info!(
        experiment = study.name,
        trials,
        generations,
        concurrency = config.dispatch.concurrency,
        "starting sweep"
    );
    let results = study.experiment.run(&dispatcher, &mut rng)?;

    println!("Hypothesis: {}", study.experiment.hypothesis.text);
    println!("Results:");
    for entry in &results.entries {
        let dependents: Vec<String> = entry
            .dependents
            .iter()
            .map(|d| format!("{} = {}", d.description, d.value))
            .collect();
        println!(
            "  {} = {}: {}",
            entry.independent.description,
            entry.independent.value,
            dependents.join(", ")
        );
    }
    match &study.test {
        Some(test) => {
            let supported = test.evaluate(&results);
            println!(
                "Hypothesis is {} by the results.",
                if supported { "supported" } else { "not supported" }
            );
        }
        None => println!("No hypothesis test declared; results reported as-is."),
    }
    Ok(())
}
