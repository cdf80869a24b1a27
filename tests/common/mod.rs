//! Shared test support: an in-process reference implementation of the
//! standard 2/3-neighbor rule standing in for the external `life`
//! binary, plus a file-backed engine double that exercises the real
//! scratch-slot write/decode cycle.
#![allow(dead_code)]

use lifelab::Result;
use lifelab::core::grid::Grid;
use lifelab::core::trajectory::Trajectory;
use lifelab::sim::engine::Engine;
use lifelab::sim::scratch::{ScratchDir, ScratchSlot};
use std::fs;
use std::path::PathBuf;

/// One generation of the standard rule, dead cells beyond the border.
pub fn step(grid: &Grid) -> Grid {
    let (h, w) = (grid.height(), grid.width());
    let mut next = vec![false; h * w];
    for r in 0..h {
        for c in 0..w {
            let mut neighbors = 0;
            for dr in -1i64..=1 {
                for dc in -1i64..=1 {
                    if dr == 0 && dc == 0 {
                        continue;
                    }
                    let (nr, nc) = (r as i64 + dr, c as i64 + dc);
                    if nr >= 0
                        && nc >= 0
                        && (nr as usize) < h
                        && (nc as usize) < w
                        && grid.get(nr as usize, nc as usize)
                    {
                        neighbors += 1;
                    }
                }
            }
            next[r * w + c] = match (grid.get(r, c), neighbors) {
                (true, 2) | (true, 3) | (false, 3) => true,
                _ => false,
            };
        }
    }
    Grid::from_cells(h, w, next).expect("stepper preserves shape")
}

/// Evolve an initial grid, returning `generations + 1` frames.
pub fn evolve(initial: &Grid, generations: u32) -> Trajectory {
    let mut frames = Vec::with_capacity(generations as usize + 1);
    frames.push(initial.clone());
    for _ in 0..generations {
        let next = step(frames.last().expect("at least the initial frame"));
        frames.push(next);
    }
    Trajectory::new(frames)
}

/// Engine double that evolves in-process but still round-trips every
/// frame through the worker's scratch slot as text.
pub struct ReferenceEngine;

impl Engine for ReferenceEngine {
    fn run(&self, grid: &Grid, generations: u32, slot: &ScratchSlot) -> Result<()> {
        fs::write(&slot.input, grid.to_text())?;
        let mut rendered = String::new();
        for frame in &evolve(grid, generations) {
            rendered.push_str(&frame.to_text());
            rendered.push('\n');
        }
        fs::write(&slot.output, rendered)?;
        Ok(())
    }

    fn decode(&self, slot: &ScratchSlot) -> Result<Trajectory> {
        let text = fs::read_to_string(&slot.output)?;
        let frames = text
            .split("\n\n")
            .filter(|chunk| !chunk.trim().is_empty())
            .map(Grid::from_text)
            .collect::<Result<Vec<_>>>()?;
        Ok(Trajectory::new(frames))
    }
}

/// Fresh scratch directory under the system temp dir; callers clean up.
pub fn unique_scratch(name: &str) -> (ScratchDir, PathBuf) {
    let mut p = std::env::temp_dir();
    p.push(format!(
        "lifelab_it_{}_{}",
        name,
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    (ScratchDir::new(&p).expect("create scratch dir"), p)
}
