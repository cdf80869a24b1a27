use std::fs;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::core::grid::Grid;
use crate::core::trajectory::Trajectory;
use crate::error::{Error, Result};
use crate::sim::scratch::ScratchSlot;

/// Boundary to the external automaton-stepping engine.
///
/// `run` leaves a rendered frame sequence at `slot.output`; `decode`
/// reads it back. The dispatcher calls `decode` only after the whole
/// batch has passed its barrier, so implementations may stream to the
/// slot however they like while running.
pub trait Engine: Sync {
    fn run(&self, grid: &Grid, generations: u32, slot: &ScratchSlot) -> Result<()>;

    fn decode(&self, slot: &ScratchSlot) -> Result<Trajectory>;
}

/// Production engine: one `life` process per simulation, fed a text grid
/// and asked for a GIF of `generations + 1` frames.
#[derive(Debug, Clone)]
pub struct LifeProcess {
    command: String,
    timeout: Duration,
}

impl LifeProcess {
    pub fn new(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            timeout,
        }
    }

    /// Wait for the child, killing it once the deadline passes. A hung
    /// engine must fail its own run, not stall the whole batch.
    fn wait_with_deadline(&self, child: &mut std::process::Child) -> Result<()> {
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(status) = child.try_wait()? {
                if status.success() {
                    return Ok(());
                }
                return Err(Error::Engine(format!(
                    "{} exited with {status}",
                    self.command
                )));
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::Engine(format!(
                    "{} timed out after {:?}",
                    self.command, self.timeout
                )));
            }
            std::thread::sleep(Duration::from_millis(20));
        }
    }
}

impl Engine for LifeProcess {
    fn run(&self, grid: &Grid, generations: u32, slot: &ScratchSlot) -> Result<()> {
        fs::write(&slot.input, grid.to_text())?;
        let mut child = Command::new(&self.command)
            .arg("--in")
            .arg(&slot.input)
            .arg("--max-gen")
            .arg(generations.to_string())
            .arg("--out")
            .arg(&slot.output)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Engine(format!("failed to spawn {}: {e}", self.command)))?;
        self.wait_with_deadline(&mut child)
    }

    fn decode(&self, slot: &ScratchSlot) -> Result<Trajectory> {
        Trajectory::from_gif(&slot.output)
    }
}
