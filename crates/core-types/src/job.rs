use core::fmt;
use std::sync::Arc;

use crate::{BatchInput, JobInput, ProofBundle, PublicInputsExtended};

/// Opaque token identifying one job for the lifetime of the registry.
///
/// Assigned by the registry at submission time and never reused.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(Arc<str>);

impl JobId {
    pub fn new(id: impl ToString) -> Self {
        Self(Arc::from(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The kind of proof a job computes. Immutable after creation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum JobKind {
    SingleProof,
    BatchProof,
    AggregatedProof,
    FinalProof,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleProof => f.write_str("single_proof"),
            Self::BatchProof => f.write_str("batch_proof"),
            Self::AggregatedProof => f.write_str("aggregated_proof"),
            Self::FinalProof => f.write_str("final_proof"),
        }
    }
}

/// Lifecycle state of a job. Transitions only move forward:
/// `Pending → Computing → CompletedOk | CompletedError`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum JobStatus {
    Pending,
    Computing,
    CompletedOk,
    CompletedError,
}

impl JobStatus {
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::CompletedOk | Self::CompletedError)
    }
}

/// A validated job ready for registry submission, before an id is assigned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobDescriptor {
    pub kind: JobKind,
    pub input: JobInput,
}

impl JobDescriptor {
    pub fn single_proof(input: BatchInput) -> Self {
        Self {
            kind: JobKind::SingleProof,
            input: JobInput::Batch(Box::new(input)),
        }
    }

    pub fn batch_proof(input: BatchInput) -> Self {
        Self {
            kind: JobKind::BatchProof,
            input: JobInput::Batch(Box::new(input)),
        }
    }

    pub fn aggregated_proof(input_1: String, input_2: String) -> Self {
        Self {
            kind: JobKind::AggregatedProof,
            input: JobInput::Aggregated { input_1, input_2 },
        }
    }

    pub fn final_proof(input: String) -> Self {
        Self {
            kind: JobKind::FinalProof,
            input: JobInput::Final { input },
        }
    }
}

/// Kind-specific output of a completed job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JobOutput {
    /// Three-part proof plus the extended public inputs, for single- and
    /// final-proof jobs.
    Proof {
        proof: ProofBundle,
        public: PublicInputsExtended,
    },

    /// Opaque serialized result produced by the executor, for batch- and
    /// aggregated-proof jobs. Passed through to the orchestrator unchanged.
    Blob(String),
}

/// Outcome reported by the executor once computation finishes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JobResult {
    Completed(JobOutput),
    Failed,
}

/// One unit of submitted work, tracked end-to-end by id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofJob {
    pub id: JobId,
    pub kind: JobKind,
    pub status: JobStatus,
    /// Cooperative cancellation flag. Advisory only: the executor must
    /// observe it; setting it never stops in-progress computation.
    pub cancelling: bool,
    pub input: JobInput,
    /// Unix seconds at submission time.
    pub submitted_at: u64,
    /// Unix seconds when computation began. Set only once.
    pub started_at: Option<u64>,
    /// Present only once `status` is completed.
    pub result: Option<JobResult>,
}

impl ProofJob {
    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }
}
