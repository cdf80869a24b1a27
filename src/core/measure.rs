//! Structural measurements over trajectories. All pure functions: a
//! trajectory (plus an optional time-range bound) in, scalars or
//! per-frame series out.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::core::grid::Grid;
use crate::core::trajectory::Trajectory;
use crate::error::{Error, Result};

/// Axis-aligned rectangle enclosing all live cells of one frame.
/// An empty frame yields the degenerate all-zero rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub min_row: i64,
    pub min_col: i64,
    pub max_row: i64,
    pub max_col: i64,
}

impl Bounds {
    pub fn height(&self) -> i64 {
        self.max_row - self.min_row
    }

    pub fn width(&self) -> i64 {
        self.max_col - self.min_col
    }

    /// Distance between two boxes: the larger of the Euclidean
    /// separations of their upper-left and lower-right corners.
    pub fn distance(&self, other: &Bounds) -> f64 {
        let near = corner_dist(
            (self.min_row, self.min_col),
            (other.min_row, other.min_col),
        );
        let far = corner_dist(
            (self.max_row, self.max_col),
            (other.max_row, other.max_col),
        );
        near.max(far)
    }
}

fn corner_dist(a: (i64, i64), b: (i64, i64)) -> f64 {
    ((a.0 - b.0) as f64).hypot((a.1 - b.1) as f64)
}

pub fn frame_bounds(grid: &Grid) -> Bounds {
    let mut bounds: Option<Bounds> = None;
    for (r, row) in grid.rows().enumerate() {
        for (c, &alive) in row.iter().enumerate() {
            if !alive {
                continue;
            }
            let (r, c) = (r as i64, c as i64);
            let b = bounds.get_or_insert(Bounds {
                min_row: r,
                min_col: c,
                max_row: r,
                max_col: c,
            });
            b.min_row = b.min_row.min(r);
            b.min_col = b.min_col.min(c);
            b.max_row = b.max_row.max(r);
            b.max_col = b.max_col.max(c);
        }
    }
    bounds.unwrap_or_default()
}

/// Bounding box of each of the first `time_range` frames, in frame order.
pub fn bounding_boxes(trajectory: &Trajectory, time_range: usize) -> Vec<Bounds> {
    trajectory
        .iter()
        .take(time_range)
        .map(frame_bounds)
        .collect()
}

/// Displacement between each pair of consecutive bounding boxes within
/// the first `time_range` frames; length is one less than the window.
pub fn per_step_velocity(trajectory: &Trajectory, time_range: usize) -> Vec<f64> {
    let boxes = bounding_boxes(trajectory, time_range);
    boxes
        .windows(2)
        .map(|pair| pair[0].distance(&pair[1]))
        .collect()
}

/// Total bounding-box displacement between the first frame and the last
/// frame of the window. Deliberately not divided by the elapsed steps;
/// use `per_step_velocity` for an instantaneous rate.
pub fn long_time_velocity(trajectory: &Trajectory, time_range: usize) -> f64 {
    let boxes = bounding_boxes(trajectory, time_range);
    match (boxes.first(), boxes.last()) {
        (Some(first), Some(last)) => first.distance(last),
        _ => 0.0,
    }
}

/// Binary Shannon entropy of the live-cell fraction, in bits.
/// Zero for uniform boards, one bit at exactly 50% density.
pub fn shannon_entropy(grid: &Grid) -> f64 {
    let total = grid.cells().len();
    if total == 0 {
        return 0.0;
    }
    let p_alive = grid.live_cells() as f64 / total as f64;
    let p_dead = 1.0 - p_alive;
    let mut entropy = 0.0;
    if p_alive > 0.0 {
        entropy -= p_alive * p_alive.log2();
    }
    if p_dead > 0.0 {
        entropy -= p_dead * p_dead.log2();
    }
    entropy
}

/// True when any two consecutive frames are cell-wise identical.
/// Detects a local fixed point, not necessarily the final state.
pub fn is_still_life(trajectory: &Trajectory) -> bool {
    let mut prev: Option<&Grid> = None;
    for frame in trajectory {
        if prev == Some(frame) {
            return true;
        }
        prev = Some(frame);
    }
    false
}

/// True when any frame's exact configuration recurs later. Exact-state
/// comparison only: a translated copy (a glider) never counts.
pub fn is_oscillator(trajectory: &Trajectory) -> bool {
    let mut seen: HashMap<u64, Vec<usize>> = HashMap::new();
    for (i, frame) in trajectory.iter().enumerate() {
        let mut hasher = DefaultHasher::new();
        frame.cells().hash(&mut hasher);
        (frame.height(), frame.width()).hash(&mut hasher);
        let key = hasher.finish();
        let earlier = seen.entry(key).or_default();
        if earlier
            .iter()
            .any(|&j| trajectory.frame(j).ok() == Some(frame))
        {
            return true;
        }
        earlier.push(i);
    }
    false
}

/// Fraction of cells identical between the first and last frame, in
/// [0, 1]. One means a perfect start-to-end fixed point regardless of
/// what happened in between.
pub fn stability_fraction(trajectory: &Trajectory) -> Result<f64> {
    let first = trajectory.first()?;
    let last = trajectory.last()?;
    if first.height() != last.height() || first.width() != last.width() {
        return Err(Error::Shape(format!(
            "stability across {}x{} and {}x{} frames",
            first.height(),
            first.width(),
            last.height(),
            last.width()
        )));
    }
    let total = first.cells().len();
    if total == 0 {
        return Ok(1.0);
    }
    let unchanged = first
        .cells()
        .iter()
        .zip(last.cells())
        .filter(|(a, b)| a == b)
        .count();
    Ok(unchanged as f64 / total as f64)
}

/// Mean live-cell count across all frames.
pub fn mean_live_cells(trajectory: &Trajectory) -> f64 {
    if trajectory.is_empty() {
        return 0.0;
    }
    let total: usize = trajectory.iter().map(Grid::live_cells).sum();
    total as f64 / trajectory.len() as f64
}
