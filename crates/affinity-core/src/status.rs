// ─────────────────────────────────────────────────────────────────────
// Affinity Kernel — Run Status
// ─────────────────────────────────────────────────────────────────────
//! Caller-owned progress record for a simulation run.
//!
//! The engine never touches this type. Callers update it from the
//! cycle-boundary checkpoint, e.g. via [`SharedRunStatus::checkpoint`],
//! so a UI or reporting thread can poll progress while the run proceeds.
//!
//! Transitions: Idle → Running → Completed | Failed | Cancelled.
//! Starting again from any terminal phase resets the record.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use affinity_types::AffinityError;

use crate::engine::CycleProgress;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunPhase {
    Idle,
    Running,
    Completed,
    Failed { message: String },
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStatus {
    pub phase: RunPhase,
    pub cycle: usize,
    pub total_cycles: usize,
    /// Completed fraction in [0, 1].
    pub progress: f64,
}

impl Default for RunStatus {
    fn default() -> Self {
        Self {
            phase: RunPhase::Idle,
            cycle: 0,
            total_cycles: 0,
            progress: 0.0,
        }
    }
}

impl RunStatus {
    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    pub fn start(&mut self, total_cycles: usize) {
        *self = Self {
            phase: RunPhase::Running,
            total_cycles,
            progress: if total_cycles == 0 { 1.0 } else { 0.0 },
            ..Self::default()
        };
    }

    /// Record a completed cycle. Ignored unless running.
    pub fn advance(&mut self, progress: &CycleProgress<'_>) {
        if !self.is_running() {
            return;
        }
        self.cycle = progress.cycle;
        self.total_cycles = progress.total_cycles;
        self.progress = progress.fraction();
    }

    pub fn complete(&mut self) {
        self.phase = RunPhase::Completed;
        self.progress = 1.0;
    }

    /// Record the outcome of a failed run. Cancellation maps to
    /// [`RunPhase::Cancelled`]; everything else to [`RunPhase::Failed`].
    pub fn fail(&mut self, error: &AffinityError) {
        self.phase = match error {
            AffinityError::Cancelled { .. } => RunPhase::Cancelled,
            other => RunPhase::Failed {
                message: other.to_string(),
            },
        };
    }
}

/// Thread-safe status handle with a cooperative cancel flag.
#[derive(Debug, Clone, Default)]
pub struct SharedRunStatus {
    inner: Arc<Mutex<RunStatus>>,
    cancel: Arc<AtomicBool>,
}

impl SharedRunStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current record.
    pub fn snapshot(&self) -> RunStatus {
        self.inner.lock().clone()
    }

    pub fn start(&self, total_cycles: usize) {
        self.cancel.store(false, Ordering::SeqCst);
        self.inner.lock().start(total_cycles);
    }

    /// Ask the run to stop at the next cycle boundary.
    pub fn request_cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// Record the run's final outcome.
    pub fn finish<T>(&self, outcome: &Result<T, AffinityError>) {
        let mut status = self.inner.lock();
        match outcome {
            Ok(_) => status.complete(),
            Err(e) => status.fail(e),
        }
    }

    /// Checkpoint closure for [`crate::SimulationEngine::run_with_checkpoint`].
    pub fn checkpoint(&self) -> impl FnMut(&CycleProgress<'_>) -> ControlFlow<()> + '_ {
        move |progress| {
            self.inner.lock().advance(progress);
            if self.cancel.load(Ordering::SeqCst) {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        }
    }
}
