//! Batched, bounded-concurrency fan-out of simulation runs to the
//! external engine.

pub mod dispatcher;
pub mod engine;
pub mod scratch;
