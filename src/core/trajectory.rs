use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, RgbaImage};

use crate::core::grid::Grid;
use crate::error::{Error, Result};

/// One simulation's time evolution: frame 0 is the initial condition,
/// frame N the state after N generations. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trajectory {
    frames: Vec<Grid>,
}

impl Trajectory {
    pub fn new(frames: Vec<Grid>) -> Self {
        Self { frames }
    }

    /// Decode a rendered frame sequence. Each frame collapses to a boolean
    /// grid: a cell is alive when any of its RGB channels is non-zero
    /// (the engine renders dead cells as pure black).
    pub fn from_gif(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let decoder = GifDecoder::new(reader)?;
        let mut frames = Vec::new();
        for frame in decoder.into_frames() {
            frames.push(grid_from_frame(frame?.buffer())?);
        }
        Ok(Self { frames })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, index: usize) -> Result<&Grid> {
        self.frames.get(index).ok_or(Error::Index {
            index,
            len: self.frames.len(),
        })
    }

    pub fn first(&self) -> Result<&Grid> {
        self.frame(0)
    }

    pub fn last(&self) -> Result<&Grid> {
        self.frames.last().ok_or(Error::Index { index: 0, len: 0 })
    }

    /// Restartable iteration in generation order, each frame exactly once.
    pub fn iter(&self) -> std::slice::Iter<'_, Grid> {
        self.frames.iter()
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a Grid;
    type IntoIter = std::slice::Iter<'a, Grid>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

fn grid_from_frame(buffer: &RgbaImage) -> Result<Grid> {
    let (width, height) = buffer.dimensions();
    let cells = buffer
        .pixels()
        .map(|p| p.0[..3].iter().any(|&ch| ch != 0))
        .collect();
    Grid::from_cells(height as usize, width as usize, cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn traj(n: usize) -> Trajectory {
        Trajectory::new((0..n).map(tagged_grid).collect())
    }

    fn tagged_grid(i: usize) -> Grid {
        let mut g = Grid::new(3, 3);
        g.set(i % 3, i % 3, true);
        g
    }

    #[test]
    fn indexing_and_bounds() {
        let t = traj(4);
        assert_eq!(t.len(), 4);
        assert_eq!(t.frame(2).unwrap(), &tagged_grid(2));
        assert!(matches!(t.frame(4), Err(Error::Index { index: 4, len: 4 })));
        assert!(traj(0).last().is_err());
    }

    #[test]
    fn iteration_yields_each_frame_once_in_order() {
        let t = traj(5);
        let seen: Vec<&Grid> = t.iter().collect();
        assert_eq!(seen.len(), 5);
        for (i, g) in t.iter().enumerate() {
            assert_eq!(g, &tagged_grid(i));
        }
        // Restartable: a second pass sees the same frames.
        assert_eq!(t.iter().count(), 5);
    }
}
