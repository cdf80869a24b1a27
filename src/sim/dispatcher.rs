use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crossbeam_channel::bounded;
use tracing::debug;

use crate::core::grid::Grid;
use crate::core::trajectory::Trajectory;
use crate::error::{Error, Result};
use crate::sim::engine::Engine;
use crate::sim::scratch::ScratchDir;

/// Fans independent simulation runs out to the engine, at most
/// `concurrency` at a time, and reassembles trajectories in input order.
///
/// Batches run strictly one after another: every worker in a batch must
/// finish (the join barrier) before any of its outputs are decoded and
/// before the next batch starts. Slot indices within a batch, not
/// completion order, decide where results land, so the output sequence
/// always matches the input sequence.
pub struct Dispatcher<E> {
    engine: E,
    concurrency: usize,
    scratch: ScratchDir,
    stop: Option<Arc<AtomicBool>>,
}

impl<E: Engine> Dispatcher<E> {
    pub fn new(engine: E, concurrency: usize, scratch: ScratchDir) -> Self {
        Self {
            engine,
            concurrency: concurrency.max(1),
            scratch,
            stop: None,
        }
    }

    /// Abort between batches once `flag` is set. There is no mid-batch
    /// cancellation; a batch in flight always runs to its barrier.
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop = Some(flag);
        self
    }

    /// Run one simulation per initial grid for `generations` steps.
    ///
    /// Failure policy: any worker failure aborts the whole call with
    /// `Error::Simulation` carrying the failing grid's input index. The
    /// batch barrier still waits for every worker first, and an output
    /// with fewer than `generations + 1` frames counts as a failure
    /// rather than a valid short trajectory.
    pub fn run_many(&self, grids: &[Grid], generations: u32) -> Result<Vec<Trajectory>> {
        let mut trajectories = Vec::with_capacity(grids.len());
        for (batch_no, batch) in grids.chunks(self.concurrency).enumerate() {
            if let Some(stop) = &self.stop {
                if stop.load(Ordering::SeqCst) {
                    return Err(Error::Interrupted);
                }
            }
            let base = batch_no * self.concurrency;
            debug!(batch = batch_no, size = batch.len(), "dispatching batch");

            // Slots live for exactly one batch; Drop cleans them up after
            // every output has been decoded (or the batch failed).
            let slots: Vec<_> = (0..batch.len()).map(|i| self.scratch.slot(i)).collect();
            let mut outcomes: Vec<Option<Result<()>>> = Vec::new();
            outcomes.resize_with(batch.len(), || None);

            thread::scope(|s| {
                let (tx, rx) = bounded(batch.len());
                for (i, (grid, slot)) in batch.iter().zip(&slots).enumerate() {
                    let tx = tx.clone();
                    let engine = &self.engine;
                    s.spawn(move || {
                        let outcome = engine.run(grid, generations, slot);
                        let _ = tx.send((i, outcome));
                    });
                }
                drop(tx);
                // Receiving every slot's outcome is the batch barrier.
                for (i, outcome) in rx {
                    outcomes[i] = Some(outcome);
                }
            });

            // Decode in slot order, only now that the barrier has passed.
            for (i, (outcome, slot)) in outcomes.into_iter().zip(&slots).enumerate() {
                let index = base + i;
                match outcome {
                    Some(Ok(())) => {}
                    Some(Err(e)) => return Err(e.at_index(index)),
                    None => {
                        return Err(Error::Engine("worker terminated without reporting".into())
                            .at_index(index));
                    }
                }
                let trajectory = self
                    .engine
                    .decode(slot)
                    .map_err(|e| e.at_index(index))?;
                let expected = generations as usize + 1;
                if trajectory.len() != expected {
                    return Err(Error::Engine(format!(
                        "decoded {} frames, expected {expected}",
                        trajectory.len()
                    ))
                    .at_index(index));
                }
                trajectories.push(trajectory);
            }
        }
        Ok(trajectories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::sim::scratch::ScratchSlot;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    fn unique_scratch(name: &str) -> (ScratchDir, PathBuf) {
        let mut p = std::env::temp_dir();
        p.push(format!(
            "lifelab_dispatch_test_{}_{}",
            name,
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        (ScratchDir::new(&p).unwrap(), p)
    }

    /// Engine double: repeats the initial grid for every generation and
    /// records scheduling order through shared counters.
    struct EchoEngine {
        active: AtomicUsize,
        max_active: AtomicUsize,
        started: Mutex<Vec<usize>>,
        fail_on_live: Option<usize>,
    }

    impl EchoEngine {
        fn new() -> Self {
            Self {
                active: AtomicUsize::new(0),
                max_active: AtomicUsize::new(0),
                started: Mutex::new(Vec::new()),
                fail_on_live: None,
            }
        }
    }

    impl Engine for EchoEngine {
        fn run(&self, grid: &Grid, generations: u32, slot: &ScratchSlot) -> Result<()> {
            let live = grid.live_cells();
            self.started.lock().unwrap().push(live);
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(5));
            self.active.fetch_sub(1, Ordering::SeqCst);
            if self.fail_on_live == Some(live) {
                return Err(Error::Engine("injected failure".into()));
            }
            let mut frames = String::new();
            for _ in 0..=generations {
                frames.push_str(&grid.to_text());
                frames.push('\n');
            }
            fs::write(&slot.output, frames)?;
            Ok(())
        }

        fn decode(&self, slot: &ScratchSlot) -> Result<Trajectory> {
            let text = fs::read_to_string(&slot.output)?;
            let frames = text
                .split("\n\n")
                .filter(|f| !f.trim().is_empty())
                .map(Grid::from_text)
                .collect::<Result<Vec<_>>>()?;
            Ok(Trajectory::new(frames))
        }
    }

    /// Grids tagged by live-cell count so outputs are attributable.
    fn tagged_grids(n: usize) -> Vec<Grid> {
        (0..n)
            .map(|i| {
                let mut g = Grid::new(4, 4);
                for k in 0..=i {
                    g.set(k / 4, k % 4, true);
                }
                g
            })
            .collect()
    }

    #[test]
    fn preserves_input_order() {
        let (scratch, root) = unique_scratch("order");
        let dispatcher = Dispatcher::new(EchoEngine::new(), 3, scratch);
        let grids = tagged_grids(8);
        let trajectories = dispatcher.run_many(&grids, 2).unwrap();
        assert_eq!(trajectories.len(), 8);
        for (grid, traj) in grids.iter().zip(&trajectories) {
            assert_eq!(traj.len(), 3);
            assert_eq!(traj.first().unwrap(), grid);
        }
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn concurrency_is_bounded_and_batches_are_sequential() {
        let (scratch, root) = unique_scratch("barrier");
        let engine = EchoEngine::new();
        let dispatcher = Dispatcher::new(engine, 3, scratch);
        let grids = tagged_grids(7);
        dispatcher.run_many(&grids, 0).unwrap();

        assert!(dispatcher.engine.max_active.load(Ordering::SeqCst) <= 3);
        // Start order respects batch boundaries: no grid from batch b+1
        // starts before every grid of batch b has (tags 1..=7, batches
        // {1,2,3}, {4,5,6}, {7}).
        let started = dispatcher.engine.started.lock().unwrap().clone();
        assert_eq!(started.len(), 7);
        let batch_of = |tag: usize| (tag - 1) / 3;
        let batch_order: Vec<usize> = started.iter().map(|&t| batch_of(t)).collect();
        let mut sorted = batch_order.clone();
        sorted.sort_unstable();
        assert_eq!(batch_order, sorted, "batches must not interleave");
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn failure_reports_the_grid_index() {
        let (scratch, root) = unique_scratch("failure");
        let mut engine = EchoEngine::new();
        engine.fail_on_live = Some(5); // fifth grid carries 5 live cells
        let dispatcher = Dispatcher::new(engine, 2, scratch);
        let err = dispatcher.run_many(&tagged_grids(6), 1).unwrap_err();
        match err {
            Error::Simulation { index, .. } => assert_eq!(index, 4),
            other => panic!("expected simulation error, got {other}"),
        }
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn short_output_is_an_error_not_a_trajectory() {
        struct Truncating;
        impl Engine for Truncating {
            fn run(&self, grid: &Grid, _generations: u32, slot: &ScratchSlot) -> Result<()> {
                fs::write(&slot.output, grid.to_text())?;
                Ok(())
            }
            fn decode(&self, slot: &ScratchSlot) -> Result<Trajectory> {
                let text = fs::read_to_string(&slot.output)?;
                Ok(Trajectory::new(vec![Grid::from_text(&text)?]))
            }
        }
        let (scratch, root) = unique_scratch("short");
        let dispatcher = Dispatcher::new(Truncating, 1, scratch);
        let err = dispatcher.run_many(&tagged_grids(1), 5).unwrap_err();
        assert!(matches!(err, Error::Simulation { index: 0, .. }));
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn stop_flag_aborts_between_batches() {
        let (scratch, root) = unique_scratch("stop");
        let flag = Arc::new(AtomicBool::new(true));
        let dispatcher =
            Dispatcher::new(EchoEngine::new(), 2, scratch).with_stop_flag(flag.clone());
        assert!(matches!(
            dispatcher.run_many(&tagged_grids(4), 1),
            Err(Error::Interrupted)
        ));
        let _ = fs::remove_dir_all(&root);
    }
}
