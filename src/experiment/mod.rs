//! Independent-variable sweeps over batched simulations, aggregated into
//! results and judged by hypothesis tests.

pub mod catalog;
pub mod hypothesis;
pub mod protocol;

use rand::Rng;
use tracing::info;

use crate::config::BoardConfig;
use crate::error::Result;
use crate::experiment::protocol::Protocol;
use crate::sim::dispatcher::Dispatcher;
use crate::sim::engine::Engine;

/// A natural-language statement. The crate never parses it; it is paired
/// with a `HypothesisTest` predicate by the caller.
#[derive(Debug, Clone)]
pub struct Hypothesis {
    pub text: String,
}

impl Hypothesis {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A tagged scalar observable.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Text(_) => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:.4}"),
            Value::Text(t) => write!(f, "{t}"),
        }
    }
}

/// An independent or dependent variable: a value plus a human-readable
/// description. Immutable value object.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub value: Value,
    pub description: String,
}

impl Variable {
    pub fn float(value: f64, description: impl Into<String>) -> Self {
        Self {
            value: Value::Float(value),
            description: description.into(),
        }
    }

    pub fn int(value: i64, description: impl Into<String>) -> Self {
        Self {
            value: Value::Int(value),
            description: description.into(),
        }
    }

    pub fn text(value: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            value: Value::Text(value.into()),
            description: description.into(),
        }
    }
}

/// One sweep point's aggregated outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub independent: Variable,
    pub dependents: Vec<Variable>,
}

/// Ordered sweep outcomes; the order matches the declared sweep and is
/// meaningful for monotonicity-style hypotheses.
#[derive(Debug, Clone, PartialEq)]
pub struct Results {
    pub entries: Vec<Observation>,
}

/// A declared sweep: build initial grids per point, dispatch, measure,
/// average over trials.
#[derive(Debug, Clone)]
pub struct Experiment {
    pub hypothesis: Hypothesis,
    pub protocol: Protocol,
    pub trials: usize,
    pub generations: u32,
    pub board: BoardConfig,
}

impl Experiment {
    /// Run the whole sweep in declared order, one dispatcher call per
    /// sweep point. A failed run fails the whole sweep point (and with it
    /// the experiment) rather than averaging over a smaller sample.
    pub fn run<E: Engine>(
        &self,
        dispatcher: &Dispatcher<E>,
        rng: &mut impl Rng,
    ) -> Result<Results> {
        let mut entries = Vec::with_capacity(self.protocol.points());
        for point in 0..self.protocol.points() {
            let independent = self.protocol.independent(point);
            info!(point, value = %independent.value, trials = self.trials, "sweep point");

            let grids = self
                .protocol
                .build_initial_grids(point, self.trials, &self.board, rng)?;
            let trajectories = dispatcher.run_many(&grids, self.generations)?;

            let descriptions = self.protocol.dependent_descriptions();
            let mut sums = vec![0.0; descriptions.len()];
            for trajectory in &trajectories {
                let metrics = self.protocol.measure(trajectory)?;
                for (sum, metric) in sums.iter_mut().zip(&metrics) {
                    *sum += metric;
                }
            }
            let n = trajectories.len().max(1) as f64;
            let dependents = sums
                .into_iter()
                .zip(descriptions)
                .map(|(sum, description)| Variable::float(sum / n, description))
                .collect();
            entries.push(Observation {
                independent,
                dependents,
            });
        }
        Ok(Results { entries })
    }
}
