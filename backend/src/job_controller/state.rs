//! Shared state of background jobs such as record verification.
//!
//! Workers never touch the job map directly: they push [`JobUpdate`]s into the
//! channel held by [`JobsState`], and a single [`start_job_updater`] task
//! applies them. Handlers only read the map.

use common::jobs::JobStatus;
use log::debug;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, RwLock};

/// Capacity of the update channel; workers block on `blocking_send` when full.
pub const UPDATE_BUFFER: usize = 100;

#[derive(Clone)]
pub struct JobsState {
    /// Job id to latest status.
    pub jobs: Arc<RwLock<HashMap<String, JobStatus>>>,
    pub tx: mpsc::Sender<JobUpdate>,
}

impl JobsState {
    /// Creates the state and the receiver to hand to [`start_job_updater`].
    pub fn new() -> (Self, mpsc::Receiver<JobUpdate>) {
        let (tx, rx) = mpsc::channel(UPDATE_BUFFER);
        let state = Self {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            tx,
        };
        (state, rx)
    }

    /// Registers a new job as `Pending` and returns its id.
    pub async fn register(&self) -> String {
        let job_id = uuid::Uuid::new_v4().to_string();
        self.jobs
            .write()
            .await
            .insert(job_id.clone(), JobStatus::Pending);
        job_id
    }

    pub async fn status(&self, job_id: &str) -> Option<JobStatus> {
        self.jobs.read().await.get(job_id).cloned()
    }
}

#[derive(Debug)]
pub struct JobUpdate {
    pub(crate) job_id: String,
    pub(crate) status: JobStatus,
}

/// Applies updates for as long as the channel stays open.
///
/// A finished job never goes back to an earlier state: late progress updates
/// for it are ignored.
pub async fn start_job_updater(state: JobsState, mut rx: mpsc::Receiver<JobUpdate>) {
    while let Some(update) = rx.recv().await {
        let mut jobs = state.jobs.write().await;
        let finished = jobs.get(&update.job_id).is_some_and(JobStatus::is_finished);
        if finished {
            debug!("ignoring update for finished job {}", update.job_id);
            continue;
        }
        jobs.insert(update.job_id, update.status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn finished_jobs_keep_their_outcome() {
        let (state, rx) = JobsState::new();
        let job_id = state.register().await;
        tokio::spawn(start_job_updater(state.clone(), rx));

        for status in [
            JobStatus::InProgress(5),
            JobStatus::Completed("done".into()),
            JobStatus::InProgress(9),
        ] {
            let update = JobUpdate {
                job_id: job_id.clone(),
                status,
            };
            state.tx.send(update).await.unwrap();
        }
        // updates apply in order, so once the marker lands the rest has too
        let marker = JobUpdate {
            job_id: "marker".into(),
            status: JobStatus::Pending,
        };
        state.tx.send(marker).await.unwrap();
        while state.status("marker").await.is_none() {
            tokio::task::yield_now().await;
        }

        assert_eq!(
            state.status(&job_id).await,
            Some(JobStatus::Completed("done".into()))
        );
        assert_eq!(state.status("unknown").await, None);
    }
}
