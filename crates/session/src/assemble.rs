//! Assembly of outbound response payloads.

use proverd_core_types::{JobOutput, JobResult, ProofJob};
use proverd_proto::{self as proto, get_proof_response::Payload};
use proverd_registry::StatusSnapshot;

use crate::host::MemoryInfo;

/// Protocol version advertised in status responses.
pub const PROTO_VERSION: &str = "v0_0_1";

/// Server version advertised in status responses.
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build a status response from a registry snapshot and host facts.
///
/// The worker reports itself as computing whenever a job is running or the
/// pending queue is non-empty; the current-job fields are empty/zero when no
/// job is actually running.
pub fn status(
    snapshot: StatusSnapshot,
    prover_id: &str,
    cores: u64,
    memory: MemoryInfo,
) -> proto::GetStatusResponse {
    let status = if snapshot.current.is_some() || !snapshot.pending.is_empty() {
        proto::ProverStatus::Computing
    } else {
        proto::ProverStatus::Idle
    };

    let (current_id, current_start) = snapshot
        .current
        .map(|current| (current.id.to_string(), current.started_at))
        .unwrap_or_default();

    let (last_id, last_end) = snapshot
        .last_completed
        .map(|completed| (completed.id.to_string(), completed.end_time))
        .unwrap_or_default();

    proto::GetStatusResponse {
        status: status as i32,
        last_computed_request_id: last_id,
        last_computed_end_time: last_end,
        current_computing_request_id: current_id,
        current_computing_start_time: current_start,
        version_proto: PROTO_VERSION.to_string(),
        version_server: SERVER_VERSION.to_string(),
        pending_request_queue_ids: snapshot
            .pending
            .iter()
            .map(ToString::to_string)
            .collect(),
        prover_id: prover_id.to_string(),
        number_of_cores: cores,
        total_memory: memory.total,
        free_memory: memory.free,
    }
}

/// Build the response to a proof retrieval, from the registry's view of the
/// job (or its absence).
pub fn get_proof(job: Option<ProofJob>) -> proto::GetProofResponse {
    let Some(job) = job else {
        return proto::GetProofResponse {
            result: proto::GetProofResult::Error as i32,
            result_string: "invalid UUID".to_string(),
            ..Default::default()
        };
    };

    if !job.is_completed() {
        return proto::GetProofResponse {
            result: proto::GetProofResult::Pending as i32,
            result_string: "pending".to_string(),
            ..Default::default()
        };
    }

    let id = job.id.to_string();
    match job.result {
        Some(JobResult::Completed(output)) => {
            let (payload, public) = match output {
                JobOutput::Proof { proof, public } => {
                    (Payload::Proof(proof.into()), Some(public.into()))
                }
                JobOutput::Blob(blob) => (Payload::Output(blob), None),
            };

            proto::GetProofResponse {
                result: proto::GetProofResult::CompletedOk as i32,
                result_string: "completed".to_string(),
                id,
                payload: Some(payload),
                public,
            }
        }
        Some(JobResult::Failed) | None => proto::GetProofResponse {
            result: proto::GetProofResult::CompletedError as i32,
            result_string: "completed_error".to_string(),
            id,
            ..Default::default()
        },
    }
}
