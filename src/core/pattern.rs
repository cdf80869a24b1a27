use crate::error::{Error, Result};

/// A run-length-encoded structure anchored at a board position.
///
/// Grammar: `$` separates rows, decimal digits give a run count for the
/// following token (`o` alive, `b` dead; a missing count means 1), `!`
/// terminates the pattern. Characters after `!` are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    /// Board row of the pattern's upper-left corner.
    pub row: usize,
    /// Board column of the pattern's upper-left corner.
    pub col: usize,
    pub rle: String,
}

impl Pattern {
    pub fn new(row: usize, col: usize, rle: &str) -> Self {
        Self {
            row,
            col,
            rle: rle.to_string(),
        }
    }

    /// Expand the RLE string into per-row cell runs.
    pub fn decode_rows(&self) -> Result<Vec<Vec<bool>>> {
        let mut rows = Vec::new();
        let mut row: Vec<bool> = Vec::new();
        let mut run: Option<usize> = None;
        let mut terminated = false;

        'outer: for c in self.rle.chars() {
            match c {
                '!' => {
                    terminated = true;
                    break 'outer;
                }
                'o' | 'b' => {
                    let n = run.take().unwrap_or(1);
                    row.extend(std::iter::repeat(c == 'o').take(n));
                }
                '$' => {
                    if run.is_some() {
                        return Err(Error::Decode(format!(
                            "run count with no cell token before row break in {:?}",
                            self.rle
                        )));
                    }
                    rows.push(std::mem::take(&mut row));
                }
                '0'..='9' => {
                    let d = c as usize - '0' as usize;
                    run = Some(run.unwrap_or(0) * 10 + d);
                }
                c if c.is_whitespace() => {}
                other => {
                    return Err(Error::Decode(format!(
                        "unexpected {other:?} in pattern {:?}",
                        self.rle
                    )));
                }
            }
        }

        if !terminated {
            return Err(Error::Decode(format!("pattern {:?} missing '!'", self.rle)));
        }
        if run.is_some() {
            return Err(Error::Decode(format!(
                "run count with no cell token before '!' in {:?}",
                self.rle
            )));
        }
        rows.push(row);
        Ok(rows)
    }

    /// The canonical five-cell glider.
    pub fn glider(row: usize, col: usize) -> Self {
        Self::new(row, col, "bo$2bo$3o!")
    }

    /// 2x2 block, the smallest still life.
    pub fn block(row: usize, col: usize) -> Self {
        Self::new(row, col, "2o$2o!")
    }

    /// Vertical blinker, a period-2 oscillator.
    pub fn blinker(row: usize, col: usize) -> Self {
        Self::new(row, col, "o$o$o!")
    }
}
