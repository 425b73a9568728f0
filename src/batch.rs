//! Batch driver
//!
//! Runs many independent trajectories over one shared scene, keeps the ones
//! that escaped inside the window, and persists their terminal values.
//! Trajectories run on the rayon pool; each owns a `Pcg32` stream derived from
//! the batch seed and its index, so output does not depend on thread count.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::consts::PROGRESS_EVERY;
use crate::error::Result;
use crate::results::{ResultStore, Summary};
use crate::scene::Scene;
use crate::settings::{RecordMode, SimSettings};
use crate::signed_degrees;
use crate::sim::{RngState, TrajectoryOutcome, run_trajectory};

/// What became of one trajectory
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrajectoryRecord {
    /// Escaped inside the window; carries the recorded value
    Recorded(f64),
    /// Escaped, but too far off-axis to record
    Filtered,
    /// Never escaped within the step budget
    BudgetExhausted,
    /// Aborted by an engine error
    Failed,
    /// Skipped because the batch was cancelled
    Cancelled,
}

/// Tally of a finished batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub requested: usize,
    pub recorded: usize,
    pub filtered: usize,
    pub budget_exhausted: usize,
    pub failed: usize,
    pub cancelled: usize,
    /// Statistics of the recorded values
    pub summary: Option<Summary>,
}

impl BatchReport {
    /// Build the tally from per-trajectory records
    pub fn from_records(records: &[TrajectoryRecord]) -> Self {
        let mut report = Self {
            requested: records.len(),
            ..Self::default()
        };
        let mut values = Vec::new();
        for record in records {
            match *record {
                TrajectoryRecord::Recorded(value) => {
                    report.recorded += 1;
                    values.push(value);
                }
                TrajectoryRecord::Filtered => report.filtered += 1,
                TrajectoryRecord::BudgetExhausted => report.budget_exhausted += 1,
                TrajectoryRecord::Failed => report.failed += 1,
                TrajectoryRecord::Cancelled => report.cancelled += 1,
            }
        }
        report.summary = Summary::from_values(&values);
        report
    }

    /// Fraction of run trajectories that reached the backstop
    pub fn termination_rate(&self) -> f64 {
        let run = self.requested - self.cancelled;
        if run == 0 {
            return 0.0;
        }
        (self.recorded + self.filtered) as f64 / run as f64
    }
}

/// Runs a batch of trajectories over a scene
pub struct BatchDriver<'a> {
    scene: &'a Scene,
    settings: &'a SimSettings,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> BatchDriver<'a> {
    pub fn new(scene: &'a Scene, settings: &'a SimSettings) -> Self {
        Self {
            scene,
            settings,
            cancel: None,
        }
    }

    /// Stop starting new trajectories once `flag` is set
    pub fn with_cancel(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Run trajectory `index` and classify its outcome
    pub fn run_one(&self, index: usize) -> TrajectoryRecord {
        let mut rng = RngState::for_trajectory(self.settings.seed, index).to_rng();
        let config = self.settings.trace_config();

        match run_trajectory(self.scene.boundaries(), &config, &mut rng) {
            Ok(TrajectoryOutcome::Terminated {
                trajectory,
                exit_angle,
            }) => {
                let Some(end) = trajectory.last() else {
                    return TrajectoryRecord::Failed;
                };
                if end.y.abs() >= self.settings.max_abs_y {
                    return TrajectoryRecord::Filtered;
                }
                let value = match self.settings.record {
                    RecordMode::TerminalY => end.y,
                    RecordMode::ExitAngle => signed_degrees(exit_angle),
                };
                TrajectoryRecord::Recorded(value)
            }
            Ok(TrajectoryOutcome::BudgetExhausted { .. }) => TrajectoryRecord::BudgetExhausted,
            Err(err) => {
                log::debug!("Trajectory {index} failed: {err}");
                TrajectoryRecord::Failed
            }
        }
    }

    /// Run every trajectory in parallel; records come back in index order
    pub fn collect(&self) -> Vec<TrajectoryRecord> {
        let total = self.settings.trajectories;
        let done = AtomicUsize::new(0);

        (0..total)
            .into_par_iter()
            .map(|index| {
                if self.is_cancelled() {
                    return TrajectoryRecord::Cancelled;
                }
                let record = self.run_one(index);
                let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
                if finished % PROGRESS_EVERY == 0 {
                    log::info!("{finished}/{total} trajectories done");
                }
                record
            })
            .collect()
    }

    /// Run the batch, write recorded values to the configured output file
    pub fn run(&self) -> Result<BatchReport> {
        let started = Instant::now();
        log::info!(
            "Running {} trajectories over {} walls (seed {}, spread {}, budget {})",
            self.settings.trajectories,
            self.scene.len(),
            self.settings.seed,
            self.settings.spread,
            self.settings.step_budget
        );

        // Truncate before any work so a failed run never leaves stale results
        let mut store = ResultStore::create(&self.settings.output)?;
        let records = self.collect();
        for record in &records {
            if let TrajectoryRecord::Recorded(value) = record {
                store.append(*value)?;
            }
        }
        log::info!("{} values written to {}", store.written(), store.path().display());
        store.finish()?;

        let report = BatchReport::from_records(&records);
        log::info!(
            "Batch done in {:.2?}: {} recorded, {} filtered, {} budget exhausted, {} failed, {} cancelled",
            started.elapsed(),
            report.recorded,
            report.filtered,
            report.budget_exhausted,
            report.failed,
            report.cancelled
        );
        if report.failed > 0 {
            log::warn!("{} trajectories aborted with engine errors", report.failed);
        }
        if let Some(summary) = &report.summary {
            log::info!(
                "{}: mean {:.4}, std dev {:.4} over {} values",
                self.settings.record.as_str(),
                summary.mean,
                summary.std_dev,
                summary.count
            );
        }
        Ok(report)
    }
}
