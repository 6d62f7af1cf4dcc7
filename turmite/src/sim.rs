use std::{
    ops::ControlFlow,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use crate::turmite::{Ant, Phase, Turmite};

#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    LimitReached,
    Interrupted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Report {
    pub steps: u64,
    pub total_steps: u64,
    pub ant: Ant,
    pub outcome: Outcome,
}

#[derive(Debug)]
pub struct Simulation {
    turmite: Turmite,
    step_limit: Option<u64>,
    progress_interval: u64,
    stop: StopHandle,
}

impl Simulation {
    pub fn new(turmite: Turmite, step_limit: Option<u64>, progress_interval: u64) -> Self {
        Self {
            turmite,
            step_limit,
            progress_interval,
            stop: StopHandle::default(),
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn turmite(&self) -> &Turmite {
        &self.turmite
    }

    pub fn into_turmite(self) -> Turmite {
        self.turmite
    }

    pub fn step_limit(&self) -> Option<u64> {
        self.step_limit
    }

    pub fn remaining(&self) -> Option<u64> {
        self.step_limit
            .map(|limit| limit.saturating_sub(self.turmite.steps()))
    }

    /// Steps the turmite up to `max_steps` times (forever if `None`), never
    /// past the configured step limit. `on_progress` sees the turmite every
    /// `progress_interval` total steps and can break to stop early.
    pub fn run(
        &mut self,
        max_steps: Option<u64>,
        mut on_progress: impl FnMut(&Turmite) -> ControlFlow<()>,
    ) -> Report {
        let budget = match (max_steps, self.remaining()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        log::debug!(
            "running {} steps from step {}",
            budget.map_or("unbounded".to_owned(), |b| b.to_string()),
            self.turmite.steps()
        );
        let mut steps = 0;
        let outcome = loop {
            if self.turmite.phase() == Phase::Halted {
                break Outcome::LimitReached;
            }
            if budget.is_some_and(|budget| steps >= budget) {
                if self.remaining() == Some(0) {
                    self.turmite.halt();
                    log::info!("step limit reached after {} steps", self.turmite.steps());
                    break Outcome::LimitReached;
                }
                break Outcome::Completed;
            }
            if self.stop.is_stopped() {
                break Outcome::Interrupted;
            }
            self.turmite.step();
            steps += 1;
            if self.progress_interval > 0 && self.turmite.steps() % self.progress_interval == 0 {
                log::trace!(
                    "step {}: {} cells painted",
                    self.turmite.steps(),
                    self.turmite.grid().len()
                );
                if on_progress(&self.turmite).is_break() {
                    break Outcome::Interrupted;
                }
            }
        };
        if outcome == Outcome::Interrupted {
            log::info!("interrupted after {} steps", self.turmite.steps());
        }
        Report {
            steps,
            total_steps: self.turmite.steps(),
            ant: self.turmite.ant(),
            outcome,
        }
    }
}
