use rand::Rng;

use crate::config::BoardConfig;
use crate::core::grid::Grid;
use crate::core::measure;
use crate::core::pattern::Pattern;
use crate::core::trajectory::Trajectory;
use crate::error::Result;
use crate::experiment::Variable;

/// Named initial configurations used by pattern sweeps. Placements match
/// the reference experiments: the glider in the upper-left corner, the
/// block and blinker well clear of it on the composite board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    Random,
    Glider,
    Block,
    Blinker,
    Composite,
}

impl PatternKind {
    pub fn label(&self) -> &'static str {
        match self {
            PatternKind::Random => "random",
            PatternKind::Glider => "glider",
            PatternKind::Block => "block",
            PatternKind::Blinker => "blinker",
            PatternKind::Composite => "composite",
        }
    }

    fn board(&self, board: &BoardConfig, rng: &mut impl Rng) -> Result<Grid> {
        let (h, w) = (board.height, board.width);
        match self {
            PatternKind::Random => Ok(Grid::random(h, w, 0.5, rng)),
            PatternKind::Glider => Grid::from_pattern(&Pattern::glider(1, 1), h, w),
            PatternKind::Block => Grid::from_pattern(&Pattern::block(1, 1), h, w),
            PatternKind::Blinker => Grid::from_pattern(&Pattern::blinker(1, 2), h, w),
            PatternKind::Composite => Grid::from_patterns(
                &[
                    Pattern::glider(1, 1),
                    Pattern::block(10, 10),
                    Pattern::blinker(20, 21),
                ],
                h,
                w,
            ),
        }
    }
}

/// Sweep-construction strategy: each variant pairs the way initial grids
/// are built with the measurement taken per trajectory, so one experiment
/// shape lives in one place.
#[derive(Debug, Clone)]
pub enum Protocol {
    /// Uniform random boards at each live-cell density; measures the
    /// final frame's live-cell count.
    DensitySweep { densities: Vec<f64> },
    /// Named fixed patterns; measures start-to-end stability.
    PatternStability { patterns: Vec<PatternKind> },
    /// Square clusters of live cells scattered at random; measures
    /// stability and longevity (mean live cells over the run).
    ClusterSweep {
        cluster_sizes: Vec<usize>,
        clusters: usize,
    },
    /// Uniform random boards; measures still-life and oscillator
    /// occurrence rates across trials.
    StructureCensus { densities: Vec<f64> },
}

impl Protocol {
    pub fn points(&self) -> usize {
        match self {
            Protocol::DensitySweep { densities } => densities.len(),
            Protocol::PatternStability { patterns } => patterns.len(),
            Protocol::ClusterSweep { cluster_sizes, .. } => cluster_sizes.len(),
            Protocol::StructureCensus { densities } => densities.len(),
        }
    }

    pub fn independent(&self, point: usize) -> Variable {
        match self {
            Protocol::DensitySweep { densities } => {
                Variable::float(densities[point], "initial density of live cells")
            }
            Protocol::PatternStability { patterns } => {
                Variable::text(patterns[point].label(), "initial pattern of live cells")
            }
            Protocol::ClusterSweep { cluster_sizes, .. } => Variable::int(
                cluster_sizes[point] as i64,
                "edge length of initial live-cell clusters",
            ),
            Protocol::StructureCensus { densities } => {
                Variable::float(densities[point], "initial density of live cells")
            }
        }
    }

    pub fn dependent_descriptions(&self) -> Vec<&'static str> {
        match self {
            Protocol::DensitySweep { .. } => vec!["average live cells in the final frame"],
            Protocol::PatternStability { .. } => {
                vec!["fraction of cells unchanged between first and last frame"]
            }
            Protocol::ClusterSweep { .. } => vec![
                "fraction of cells unchanged between first and last frame",
                "mean live cells per frame",
            ],
            Protocol::StructureCensus { .. } => vec![
                "fraction of runs reaching a still configuration",
                "fraction of runs revisiting an earlier configuration",
            ],
        }
    }

    pub fn build_initial_grids(
        &self,
        point: usize,
        trials: usize,
        board: &BoardConfig,
        rng: &mut impl Rng,
    ) -> Result<Vec<Grid>> {
        let (h, w) = (board.height, board.width);
        let mut grids = Vec::with_capacity(trials);
        for _ in 0..trials {
            let grid = match self {
                Protocol::DensitySweep { densities } | Protocol::StructureCensus { densities } => {
                    Grid::random(h, w, densities[point], rng)
                }
                Protocol::PatternStability { patterns } => patterns[point].board(board, rng)?,
                Protocol::ClusterSweep {
                    cluster_sizes,
                    clusters,
                } => clustered_grid(h, w, cluster_sizes[point], *clusters, rng),
            };
            grids.push(grid);
        }
        Ok(grids)
    }

    pub fn measure(&self, trajectory: &Trajectory) -> Result<Vec<f64>> {
        match self {
            Protocol::DensitySweep { .. } => {
                Ok(vec![trajectory.last()?.live_cells() as f64])
            }
            Protocol::PatternStability { .. } => {
                Ok(vec![measure::stability_fraction(trajectory)?])
            }
            Protocol::ClusterSweep { .. } => Ok(vec![
                measure::stability_fraction(trajectory)?,
                measure::mean_live_cells(trajectory),
            ]),
            Protocol::StructureCensus { .. } => Ok(vec![
                if measure::is_still_life(trajectory) { 1.0 } else { 0.0 },
                if measure::is_oscillator(trajectory) { 1.0 } else { 0.0 },
            ]),
        }
    }
}

/// Scatter `clusters` solid `size` x `size` squares at uniform random
/// positions. Clusters may overlap, as in the reference experiment.
fn clustered_grid(
    height: usize,
    width: usize,
    size: usize,
    clusters: usize,
    rng: &mut impl Rng,
) -> Grid {
    let size = size.min(height).min(width).max(1);
    let mut grid = Grid::new(height, width);
    for _ in 0..clusters {
        let row = rng.random_range(0..=height - size);
        let col = rng.random_range(0..=width - size);
        for r in row..row + size {
            for c in col..col + size {
                grid.set(r, c, true);
            }
        }
    }
    grid
}
