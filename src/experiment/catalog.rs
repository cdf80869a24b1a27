//! Ready-made experiments: the density, pattern, interaction, and
//! clustering studies from the original investigation, each paired with
//! its hypothesis test where one exists.

use crate::config::BoardConfig;
use crate::experiment::hypothesis::HypothesisTest;
use crate::experiment::protocol::{PatternKind, Protocol};
use crate::experiment::{Experiment, Hypothesis};

pub struct Study {
    pub name: &'static str,
    pub experiment: Experiment,
    pub test: Option<HypothesisTest>,
}

pub const NAMES: &[&str] = &[
    "density-growth",
    "density-peak",
    "pattern-stability",
    "interaction",
    "clustering",
    "census",
];

/// Build a named study. `trials` and `generations` come from config or
/// CLI overrides.
pub fn build(
    name: &str,
    board: BoardConfig,
    trials: usize,
    generations: u32,
) -> Option<Study> {
    let experiment = |hypothesis: &str, protocol: Protocol| Experiment {
        hypothesis: Hypothesis::new(hypothesis),
        protocol,
        trials,
        generations,
        board: board.clone(),
    };

    let study = match name {
        "density-growth" => Study {
            name: "density-growth",
            experiment: experiment(
                "Increasing the initial density of live cells increases the \
                 average number of live cells at the end of the run.",
                Protocol::DensitySweep {
                    densities: vec![0.1, 0.2, 0.3, 0.4, 0.5],
                },
            ),
            test: Some(HypothesisTest::NonDecreasing { dependent: 0 }),
        },
        "density-peak" => Study {
            name: "density-peak",
            experiment: experiment(
                "There exists an initial density of live cells that maximizes \
                 the average number of live cells at the end of the run.",
                Protocol::DensitySweep {
                    densities: (1..=10).map(|i| 0.05 * i as f64).collect(),
                },
            ),
            test: None,
        },
        "pattern-stability" => Study {
            name: "pattern-stability",
            experiment: experiment(
                "Still lifes and oscillators maintain their structure better \
                 than random boards and gliders.",
                Protocol::PatternStability {
                    patterns: vec![
                        PatternKind::Random,
                        PatternKind::Glider,
                        PatternKind::Block,
                        PatternKind::Blinker,
                    ],
                },
            ),
            test: Some(HypothesisTest::CategoriesOutrank {
                greater: vec!["block".into(), "blinker".into()],
                lesser: vec!["random".into(), "glider".into()],
                dependent: 0,
            }),
        },
        "interaction" => Study {
            name: "interaction",
            experiment: experiment(
                "Patterns sharing one board interact, so the composite \
                 board's stability differs from the average of the isolated \
                 patterns.",
                Protocol::PatternStability {
                    patterns: vec![
                        PatternKind::Random,
                        PatternKind::Glider,
                        PatternKind::Block,
                        PatternKind::Blinker,
                        PatternKind::Composite,
                    ],
                },
            ),
            test: Some(HypothesisTest::DiffersFromRest {
                category: "composite".into(),
                dependent: 0,
                tolerance: 0.0,
            }),
        },
        "clustering" => Study {
            name: "clustering",
            experiment: experiment(
                "Stronger initial clustering of live cells increases both \
                 stability and longevity.",
                Protocol::ClusterSweep {
                    cluster_sizes: vec![1, 3, 5],
                    clusters: 100,
                },
            ),
            test: Some(HypothesisTest::StrictlyIncreasing {
                dependents: vec![0, 1],
            }),
        },
        "census" => Study {
            name: "census",
            experiment: experiment(
                "Survey how often runs settle into still or recurring \
                 configurations across initial densities.",
                Protocol::StructureCensus {
                    densities: (1..=9).map(|i| 0.1 * i as f64).collect(),
                },
            ),
            test: None,
        },
        _ => return None,
    };
    Some(study)
}
