use thiserror::Error;

/// Crate-wide error type.
///
/// `Decode`, `Index`, `Shape` and `Simulation` are the caller-visible
/// taxonomy; `Engine`, `Io` and `Image` are the underlying causes a
/// `Simulation` error wraps once the dispatcher knows which run failed.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed pattern/text grammar or an overlay outside the canvas.
    #[error("decode failed: {0}")]
    Decode(String),

    /// Out-of-range trajectory access.
    #[error("frame index {index} out of range (trajectory has {len} frames)")]
    Index { index: usize, len: usize },

    /// Grid comparison across mismatched dimensions.
    #[error("shape mismatch: {0}")]
    Shape(String),

    /// External engine invocation failed (spawn, exit status, timeout).
    #[error("engine run failed: {0}")]
    Engine(String),

    /// One simulation run failed; `index` is the position of its initial
    /// grid in the dispatched sequence.
    #[error("simulation {index} failed")]
    Simulation {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    /// Stop flag raised between batches.
    #[error("dispatch interrupted")]
    Interrupted,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl Error {
    /// Attach the dispatched grid index that produced this error.
    pub fn at_index(self, index: usize) -> Self {
        Error::Simulation {
            index,
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
