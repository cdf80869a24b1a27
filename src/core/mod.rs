//! Domain model: grids, anchored patterns, trajectories, and the pure
//! measurement functions over them.

pub mod grid;
pub mod measure;
pub mod pattern;
pub mod trajectory;
