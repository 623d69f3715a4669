//! Interval job registry
//!
//! This module handles:
//! - Running crawls repeatedly at a fixed cadence
//! - Keeping every running job in an explicit registry keyed by job id
//! - Cancelling individual jobs or all of them
//!
//! Each job record owns its cancellation handle. Dropping the registry
//! stops every job at its next tick.

use crate::NewsreelError;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// A running interval job
pub struct JobHandle {
    every: Duration,
    cancel: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl JobHandle {
    pub fn interval(&self) -> Duration {
        self.every
    }

    /// Returns true once the job's task has exited
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Signals the job to stop and aborts a run in progress
    fn cancel(self) {
        let _ = self.cancel.send(true);
        self.task.abort();
    }
}

/// Registry of interval jobs
#[derive(Default)]
pub struct JobRegistry {
    jobs: HashMap<String, JobHandle>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts running `run` every `every`, first run immediately
    ///
    /// Scheduling an id that already exists cancels the previous job.
    /// Runs of one job never overlap; ticks missed during a long run are
    /// skipped.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F, Fut>(
        &mut self,
        id: impl Into<String>,
        every: Duration,
        mut run: F,
    ) -> Result<(), NewsreelError>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let id = id.into();
        if every.is_zero() {
            return Err(NewsreelError::Scheduler(format!(
                "job '{}' needs a non-zero interval",
                id
            )));
        }

        if let Some(previous) = self.jobs.remove(&id) {
            tracing::info!(job = %id, "Replacing scheduled job");
            previous.cancel();
        }

        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let job_id = id.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        tracing::debug!(job = %job_id, "Running scheduled job");
                        run().await;
                    }
                    // Fires on cancel and when the handle is dropped
                    _ = cancel_rx.changed() => break,
                }
            }

            tracing::debug!(job = %job_id, "Scheduled job stopped");
        });

        tracing::info!(job = %id, interval_secs = every.as_secs(), "Scheduled job");
        self.jobs.insert(
            id,
            JobHandle {
                every,
                cancel: cancel_tx,
                task,
            },
        );

        Ok(())
    }

    /// Cancels a job; returns false if no such job exists
    pub fn cancel(&mut self, id: &str) -> bool {
        match self.jobs.remove(id) {
            Some(handle) => {
                handle.cancel();
                tracing::info!(job = %id, "Cancelled job");
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.jobs.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&JobHandle> {
        self.jobs.get(id)
    }

    /// Ids of all scheduled jobs, sorted
    pub fn job_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.jobs.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Cancels every job
    pub fn shutdown(&mut self) {
        for (id, handle) in self.jobs.drain() {
            tracing::debug!(job = %id, "Stopping job");
            handle.cancel();
        }
    }
}
