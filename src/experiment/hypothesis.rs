use crate::experiment::{Results, Value};

/// Pure predicate over a results sequence. Total over any well-formed
/// results: missing categories or non-numeric values make the predicate
/// false, never a panic.
#[derive(Debug, Clone)]
pub enum HypothesisTest {
    /// The chosen dependent never decreases across consecutive entries.
    NonDecreasing { dependent: usize },
    /// Every listed dependent strictly increases across entries.
    StrictlyIncreasing { dependents: Vec<usize> },
    /// Every `greater` category's dependent exceeds every `lesser` one's.
    CategoriesOutrank {
        greater: Vec<String>,
        lesser: Vec<String>,
        dependent: usize,
    },
    /// The named category's dependent differs from the mean of all other
    /// entries by more than `tolerance` (zero reproduces a plain
    /// inequality check).
    DiffersFromRest {
        category: String,
        dependent: usize,
        tolerance: f64,
    },
}

impl HypothesisTest {
    pub fn evaluate(&self, results: &Results) -> bool {
        match self {
            HypothesisTest::NonDecreasing { dependent } => {
                match series(results, *dependent) {
                    Some(values) => values.windows(2).all(|pair| pair[0] <= pair[1]),
                    None => false,
                }
            }
            HypothesisTest::StrictlyIncreasing { dependents } => {
                dependents.iter().all(|&dep| match series(results, dep) {
                    Some(values) => values.windows(2).all(|pair| pair[0] < pair[1]),
                    None => false,
                })
            }
            HypothesisTest::CategoriesOutrank {
                greater,
                lesser,
                dependent,
            } => {
                let value_of = |name: &str| category_value(results, name, *dependent);
                greater.iter().all(|g| {
                    lesser.iter().all(|l| match (value_of(g), value_of(l)) {
                        (Some(g), Some(l)) => g > l,
                        _ => false,
                    })
                })
            }
            HypothesisTest::DiffersFromRest {
                category,
                dependent,
                tolerance,
            } => {
                let Some(target) = category_value(results, category, *dependent) else {
                    return false;
                };
                let rest: Vec<f64> = results
                    .entries
                    .iter()
                    .filter(|e| !matches_category(&e.independent.value, category))
                    .filter_map(|e| dependent_value(e, *dependent))
                    .collect();
                if rest.is_empty() {
                    return false;
                }
                let mean = rest.iter().sum::<f64>() / rest.len() as f64;
                (target - mean).abs() > *tolerance
            }
        }
    }
}

fn dependent_value(entry: &crate::experiment::Observation, dependent: usize) -> Option<f64> {
    entry.dependents.get(dependent)?.value.as_f64()
}

fn series(results: &Results, dependent: usize) -> Option<Vec<f64>> {
    results
        .entries
        .iter()
        .map(|e| dependent_value(e, dependent))
        .collect()
}

fn matches_category(value: &Value, name: &str) -> bool {
    matches!(value, Value::Text(t) if t == name)
}

fn category_value(results: &Results, name: &str, dependent: usize) -> Option<f64> {
    results
        .entries
        .iter()
        .find(|e| matches_category(&e.independent.value, name))
        .and_then(|e| dependent_value(e, dependent))
}
