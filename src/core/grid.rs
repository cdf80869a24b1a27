use rand::Rng;

use crate::core::pattern::Pattern;
use crate::error::{Error, Result};

/// A fixed-size 2-D board of dead/alive cells, row-major.
///
/// Grids are built by a factory (`random`, `from_pattern`, text/frame
/// decode) and treated as read-only afterwards; evolution happens in the
/// external engine, never in place here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    height: usize,
    width: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// All-dead board.
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            cells: vec![false; height * width],
        }
    }

    pub fn from_cells(height: usize, width: usize, cells: Vec<bool>) -> Result<Self> {
        if cells.len() != height * width {
            return Err(Error::Shape(format!(
                "{} cells for a {height}x{width} board",
                cells.len()
            )));
        }
        Ok(Self {
            height,
            width,
            cells,
        })
    }

    /// Each cell independently alive with probability `live_probability`
    /// (clamped to [0, 1]); no spatial correlation.
    pub fn random(
        height: usize,
        width: usize,
        live_probability: f64,
        rng: &mut impl Rng,
    ) -> Self {
        let p = live_probability.clamp(0.0, 1.0);
        let cells = (0..height * width).map(|_| rng.random_bool(p)).collect();
        Self {
            height,
            width,
            cells,
        }
    }

    /// Decode `pattern` onto a zero-filled `height` x `width` canvas.
    pub fn from_pattern(pattern: &Pattern, height: usize, width: usize) -> Result<Self> {
        Self::from_patterns(std::slice::from_ref(pattern), height, width)
    }

    /// Overlay several patterns (OR-combined) onto one canvas.
    pub fn from_patterns(patterns: &[Pattern], height: usize, width: usize) -> Result<Self> {
        let mut grid = Self::new(height, width);
        for pattern in patterns {
            let rows = pattern.decode_rows()?;
            for (i, row) in rows.iter().enumerate() {
                let r = pattern.row + i;
                if r >= height || pattern.col + row.len() > width {
                    return Err(Error::Decode(format!(
                        "pattern overlay at ({}, {}) leaves the {height}x{width} canvas",
                        pattern.row, pattern.col
                    )));
                }
                for (j, &alive) in row.iter().enumerate() {
                    if alive {
                        grid.cells[r * width + pattern.col + j] = true;
                    }
                }
            }
        }
        Ok(grid)
    }

    /// Parse the text form written by `to_text`.
    pub fn from_text(text: &str) -> Result<Self> {
        let mut rows: Vec<Vec<bool>> = Vec::new();
        for line in text.lines() {
            let mut row = Vec::with_capacity(line.len());
            for c in line.chars() {
                match c {
                    'O' => row.push(true),
                    '.' => row.push(false),
                    _ => return Err(Error::Decode(format!("unexpected cell char {c:?}"))),
                }
            }
            rows.push(row);
        }
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != width) {
            return Err(Error::Decode("ragged rows in text grid".into()));
        }
        Ok(Self {
            height,
            width,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// One newline-terminated line per row, `O` alive, `.` dead.
    /// Round-trips with `from_text`.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.rows() {
            out.extend(row.iter().map(|&alive| if alive { 'O' } else { '.' }));
            out.push('\n');
        }
        out
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Panics when `(row, col)` lies outside the board.
    pub fn get(&self, row: usize, col: usize) -> bool {
        debug_assert!(
            row < self.height && col < self.width,
            "cell ({row}, {col}) outside {}x{} board",
            self.height,
            self.width
        );
        self.cells[row * self.width + col]
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, alive: bool) {
        debug_assert!(
            row < self.height && col < self.width,
            "cell ({row}, {col}) outside {}x{} board",
            self.height,
            self.width
        );
        self.cells[row * self.width + col] = alive;
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells.chunks(self.width.max(1))
    }

    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub fn live_cells(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}
