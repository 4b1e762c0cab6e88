//! Shared job registry for the proverd proof-computation worker.
//!
//! The registry is the single store of all jobs known to the process. It is
//! shared between the session task (which admits and queries jobs) and the
//! executor's workers (which claim, compute and complete them). All state
//! lives behind one mutex; critical sections touch only the job map and the
//! pending queue, never I/O.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use proverd_core_types::{JobDescriptor, JobId, JobResult, JobStatus, ProofJob};

/// Submission failed because the registry cannot track another job.
///
/// Distinguishing resource exhaustion from success is deliberate: callers
/// decide whether to propagate it as a terminal error or to degrade.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("job registry is at capacity ({capacity} jobs)")]
    CapacityExhausted { capacity: usize },
}

/// Outcome of a cancellation request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The cancelling flag is now set. Repeated calls on an incomplete job
    /// keep returning this.
    Cancelling,
    /// No job with that id was ever admitted.
    NotFound,
    /// The job already completed; cancellation is meaningless.
    AlreadyCompleted,
}

/// The job currently being computed, as seen by a status snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentJob {
    pub id: JobId,
    /// Unix seconds when computation started.
    pub started_at: u64,
}

/// The most recently completed job, as seen by a status snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletedJob {
    pub id: JobId,
    /// Unix seconds when the result was recorded.
    pub end_time: u64,
}

/// A consistent point-in-time view of the registry, taken under the lock.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub current: Option<CurrentJob>,
    /// Pending job ids in submission order.
    pub pending: Vec<JobId>,
    pub last_completed: Option<CompletedJob>,
}

#[derive(Default)]
struct Inner {
    jobs: HashMap<JobId, ProofJob>,
    pending: VecDeque<JobId>,
    current: Option<JobId>,
    last_completed: Option<CompletedJob>,
}

/// Thread-safe store of all known jobs, keyed by job id.
///
/// Ids are UUIDs, unique for the registry's lifetime. Jobs are never
/// deleted; retention is outside this component's scope.
pub struct JobRegistry {
    capacity: usize,
    inner: Mutex<Inner>,
}

impl JobRegistry {
    /// Default bound on the number of tracked jobs.
    pub const DEFAULT_CAPACITY: usize = 1024;

    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Admit a validated job: assign a fresh id, store it as pending and
    /// append it to the queue.
    pub fn submit(&self, descriptor: JobDescriptor) -> Result<JobId, SubmitError> {
        let mut inner = self.lock();

        if inner.jobs.len() >= self.capacity {
            return Err(SubmitError::CapacityExhausted {
                capacity: self.capacity,
            });
        }

        let id = JobId::new(Uuid::new_v4());
        let job = ProofJob {
            id: id.clone(),
            kind: descriptor.kind,
            status: JobStatus::Pending,
            cancelling: false,
            input: descriptor.input,
            submitted_at: unix_now(),
            started_at: None,
            result: None,
        };

        debug!(id = %id, kind = %job.kind, "Job admitted");

        inner.jobs.insert(id.clone(), job);
        inner.pending.push_back(id.clone());

        Ok(id)
    }

    /// A point-in-time copy of the job with the given id.
    ///
    /// The lookup and the read of the job's result happen in one critical
    /// section, so a completion racing with the lookup is never observed
    /// half-applied.
    pub fn lookup(&self, id: &JobId) -> Option<ProofJob> {
        self.lock().jobs.get(id).cloned()
    }

    /// Set the cooperative cancellation flag on an incomplete job.
    pub fn set_cancelling(&self, id: &JobId) -> CancelOutcome {
        let mut inner = self.lock();

        match inner.jobs.get_mut(id) {
            None => CancelOutcome::NotFound,
            Some(job) if job.is_completed() => CancelOutcome::AlreadyCompleted,
            Some(job) => {
                job.cancelling = true;
                CancelOutcome::Cancelling
            }
        }
    }

    /// A consistent snapshot of current/pending/last-completed state.
    pub fn snapshot(&self) -> StatusSnapshot {
        let inner = self.lock();

        let current = inner.current.as_ref().and_then(|id| {
            inner.jobs.get(id).map(|job| CurrentJob {
                id: id.clone(),
                started_at: job.started_at.unwrap_or_default(),
            })
        });

        StatusSnapshot {
            current,
            pending: inner.pending.iter().cloned().collect(),
            last_completed: inner.last_completed.clone(),
        }
    }

    /// Number of jobs tracked by the registry, in any state.
    pub fn len(&self) -> usize {
        self.lock().jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().jobs.is_empty()
    }

    /// Executor side: claim the oldest pending job, marking it as the one
    /// being computed and stamping its start time.
    pub fn claim_next(&self) -> Option<ProofJob> {
        let mut inner = self.lock();
        let now = unix_now();

        let id = inner.pending.pop_front()?;
        inner.current = Some(id.clone());

        let Some(job) = inner.jobs.get_mut(&id) else {
            inner.current = None;
            return None;
        };

        job.status = JobStatus::Computing;
        job.started_at = Some(now);

        Some(job.clone())
    }

    /// Executor side: record the result of a claimed job.
    ///
    /// Returns `false` if the id is unknown or the job already completed;
    /// the first recorded result wins.
    pub fn complete(&self, id: &JobId, result: JobResult) -> bool {
        let mut inner = self.lock();
        let now = unix_now();

        let Some(job) = inner.jobs.get_mut(id) else {
            return false;
        };

        if job.is_completed() {
            return false;
        }

        job.status = match result {
            JobResult::Completed(_) => JobStatus::CompletedOk,
            JobResult::Failed => JobStatus::CompletedError,
        };
        job.result = Some(result);

        debug!(id = %id, status = ?job.status, "Job completed");

        if inner.current.as_ref() == Some(id) {
            inner.current = None;
        }
        inner.pending.retain(|pending| pending != id);
        inner.last_completed = Some(CompletedJob {
            id: id.clone(),
            end_time: now,
        });

        true
    }

    /// Executor side: poll point for cooperative cancellation.
    pub fn is_cancelling(&self, id: &JobId) -> bool {
        self.lock()
            .jobs
            .get(id)
            .map(|job| job.cancelling)
            .unwrap_or(false)
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use proverd_core_types::{BatchInput, JobDescriptor, JobOutput, JobResult, JobStatus};

    use super::*;

    fn registry() -> JobRegistry {
        JobRegistry::new(JobRegistry::DEFAULT_CAPACITY)
    }

    fn descriptor() -> JobDescriptor {
        JobDescriptor::single_proof(BatchInput::default())
    }

    #[test]
    fn submitted_job_is_pending() {
        let registry = registry();
        let id = registry.submit(descriptor()).unwrap();

        let job = registry.lookup(&id).unwrap();
        assert_eq!(job.status, JobStatus::Pending);
        assert!(!job.cancelling);
        assert!(job.started_at.is_none());
        assert!(job.result.is_none());
    }

    #[test]
    fn submitted_ids_are_unique_and_ordered() {
        let registry = registry();
        let first = registry.submit(descriptor()).unwrap();
        let second = registry.submit(descriptor()).unwrap();
        assert_ne!(first, second);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.pending, vec![first, second]);
    }

    #[test]
    fn submit_fails_at_capacity() {
        let registry = JobRegistry::new(1);
        registry.submit(descriptor()).unwrap();

        let err = registry.submit(descriptor()).unwrap_err();
        assert_eq!(err, SubmitError::CapacityExhausted { capacity: 1 });
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn lookup_of_unknown_id_is_none() {
        let registry = registry();
        assert!(registry.lookup(&JobId::new("nope")).is_none());
    }

    #[test]
    fn cancel_unknown_id() {
        let registry = registry();
        assert_eq!(
            registry.set_cancelling(&JobId::new("nope")),
            CancelOutcome::NotFound
        );
    }

    #[test]
    fn cancel_is_idempotent_while_incomplete() {
        let registry = registry();
        let id = registry.submit(descriptor()).unwrap();

        assert_eq!(registry.set_cancelling(&id), CancelOutcome::Cancelling);
        assert_eq!(registry.set_cancelling(&id), CancelOutcome::Cancelling);
        assert!(registry.is_cancelling(&id));
    }

    #[test]
    fn cancel_after_completion_is_rejected() {
        let registry = registry();
        let id = registry.submit(descriptor()).unwrap();
        registry.claim_next().unwrap();
        assert!(registry.complete(&id, JobResult::Failed));

        assert_eq!(
            registry.set_cancelling(&id),
            CancelOutcome::AlreadyCompleted
        );
    }

    #[test]
    fn claim_marks_the_job_computing() {
        let registry = registry();
        let id = registry.submit(descriptor()).unwrap();

        let claimed = registry.claim_next().unwrap();
        assert_eq!(claimed.id, id);
        assert_eq!(claimed.status, JobStatus::Computing);
        assert!(claimed.started_at.is_some());

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.current.unwrap().id, id);
        assert!(snapshot.pending.is_empty());
    }

    #[test]
    fn complete_records_the_result_once() {
        let registry = registry();
        let id = registry.submit(descriptor()).unwrap();
        registry.claim_next().unwrap();

        assert!(registry.complete(&id, JobResult::Completed(JobOutput::Blob("{}".to_string()))));
        assert!(!registry.complete(&id, JobResult::Failed));

        let job = registry.lookup(&id).unwrap();
        assert_eq!(job.status, JobStatus::CompletedOk);

        let snapshot = registry.snapshot();
        assert!(snapshot.current.is_none());
        assert_eq!(snapshot.last_completed.unwrap().id, id);
    }

    #[test]
    fn failed_result_completes_with_error() {
        let registry = registry();
        let id = registry.submit(descriptor()).unwrap();
        registry.claim_next().unwrap();
        registry.complete(&id, JobResult::Failed);

        let job = registry.lookup(&id).unwrap();
        assert_eq!(job.status, JobStatus::CompletedError);
        assert_eq!(job.result, Some(JobResult::Failed));
    }

    #[test]
    fn snapshot_of_empty_registry() {
        let registry = registry();
        let snapshot = registry.snapshot();

        assert!(snapshot.current.is_none());
        assert!(snapshot.pending.is_empty());
        assert!(snapshot.last_completed.is_none());
    }

    #[test]
    fn claim_next_on_empty_queue_is_none() {
        let registry = registry();
        assert!(registry.claim_next().is_none());
    }
}
