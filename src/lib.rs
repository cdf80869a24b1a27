//! Runs many Game of Life simulations through an external stepping
//! engine, extracts structural measurements from the trajectories, and
//! tests quantitative hypotheses over the aggregated results.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod experiment;
pub mod sim;

pub use error::{Error, Result};
