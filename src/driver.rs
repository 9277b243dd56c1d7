//! Fixed-point pass driver.
//!
//! A sweep runs every pass once over the whole tree, in order. Sweeps
//! repeat while any pass reports a change; a run that still changes after
//! `max_sweeps` sweeps fails with [`RewriteError::NoFixpoint`].

use std::time::Instant;

use tracing::{debug, info};

use crate::error::RewriteError;
use crate::passes::{Pass, PassKind};
use crate::tree::Tree;

/// Sweeps allowed before a run is declared non-converging.
pub const DEFAULT_MAX_SWEEPS: usize = 10;

/// What a successful run did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Sweeps performed, including the final one that changed nothing.
    pub sweeps: usize,
    /// For each pass in run order, the number of sweeps in which it changed
    /// the tree.
    pub changes: Vec<(&'static str, usize)>,
}

impl RunReport {
    pub fn changed(&self) -> bool {
        self.changes.iter().any(|&(_, n)| n > 0)
    }
}

pub struct Driver {
    passes: Vec<Box<dyn Pass + Send>>,
    max_sweeps: usize,
}

impl Default for Driver {
    fn default() -> Self {
        Self::with_kinds(&PassKind::ALL, DEFAULT_MAX_SWEEPS)
    }
}

impl Driver {
    pub fn new(passes: Vec<Box<dyn Pass + Send>>, max_sweeps: usize) -> Self {
        Self { passes, max_sweeps }
    }

    /// A driver running the built-in passes named by `kinds`, in order.
    pub fn with_kinds(kinds: &[PassKind], max_sweeps: usize) -> Self {
        Self::new(kinds.iter().map(|k| k.build()).collect(), max_sweeps)
    }

    pub fn max_sweeps(&self) -> usize {
        self.max_sweeps
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Run all passes on `tree` until none of them changes it.
    pub fn run(&mut self, tree: &mut Tree) -> Result<RunReport, RewriteError> {
        let start_total = Instant::now();
        let mut report = RunReport {
            sweeps: 0,
            changes: self.passes.iter().map(|p| (p.name(), 0)).collect(),
        };

        loop {
            let mut changed = false;
            report.sweeps += 1;

            if report.sweeps > self.max_sweeps {
                return Err(RewriteError::NoFixpoint {
                    max_sweeps: self.max_sweeps,
                });
            }

            for (i, pass) in self.passes.iter_mut().enumerate() {
                let start = Instant::now();
                let root = tree.root();
                let pass_changed = pass.fold(tree, root)?;
                debug!(
                    "  [sweep {}] {}: {:?} (changed: {})",
                    report.sweeps,
                    pass.name(),
                    start.elapsed(),
                    pass_changed
                );
                if pass_changed {
                    report.changes[i].1 += 1;
                }
                changed |= pass_changed;
            }

            if !changed {
                break;
            }
        }

        info!(
            "folding complete: {} sweeps, {:?} total",
            report.sweeps,
            start_total.elapsed()
        );
        Ok(report)
    }
}
