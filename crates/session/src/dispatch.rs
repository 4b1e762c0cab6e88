//! Mapping of inbound commands to handlers.
//!
//! Each orchestrator request produces exactly one response of the matching
//! kind, tagged with the same correlation id. The request oneof is matched
//! exhaustively; a message whose oneof is absent (an unrecognized command
//! kind on the wire) is logged and answered with a payload-less envelope so
//! the orchestrator's request/response bookkeeping stays in step.

use std::sync::Arc;

use tracing::{error, warn};

use proverd_core_types::{JobDescriptor, JobId};
use proverd_proto::{self as proto, orchestrator_message::Request, prover_message::Response};
use proverd_registry::{CancelOutcome, JobRegistry, SubmitError};

use crate::assemble;
use crate::host::HostFacts;
use crate::translate;

/// Routes each inbound command to its handler.
///
/// Holds a reference to the process-wide job registry; the registry is never
/// copied, and its lock is never held across a host-facts query or any I/O.
pub struct Dispatcher {
    registry: Arc<JobRegistry>,
    host: Arc<dyn HostFacts>,
    prover_id: String,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<JobRegistry>,
        host: Arc<dyn HostFacts>,
        prover_id: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            host,
            prover_id: prover_id.into(),
        }
    }

    /// Handle one orchestrator message and build its paired response.
    ///
    /// Validation and lookup failures are surfaced inside the response
    /// payload; only registry exhaustion escapes as an error.
    pub fn dispatch(
        &self,
        message: proto::OrchestratorMessage,
    ) -> Result<proto::ProverMessage, SubmitError> {
        let id = message.id;

        let response = match message.request {
            Some(Request::GetStatusRequest(_)) => {
                Some(Response::GetStatusResponse(self.get_status()))
            }
            Some(Request::GenProofRequest(request)) => {
                let (result, id) = self.admit_batch(request.input, JobDescriptor::single_proof)?;
                Some(Response::GenProofResponse(proto::GenProofResponse {
                    result,
                    id,
                }))
            }
            Some(Request::GenBatchProofRequest(request)) => {
                let (result, id) = self.admit_batch(request.input, JobDescriptor::batch_proof)?;
                Some(Response::GenBatchProofResponse(
                    proto::GenBatchProofResponse { result, id },
                ))
            }
            Some(Request::GenAggregatedProofRequest(request)) => {
                let descriptor =
                    JobDescriptor::aggregated_proof(request.input_1, request.input_2);
                let id = self.registry.submit(descriptor)?;
                Some(Response::GenAggregatedProofResponse(
                    proto::GenAggregatedProofResponse {
                        result: proto::SubmitResult::Ok as i32,
                        id: id.to_string(),
                    },
                ))
            }
            Some(Request::GenFinalProofRequest(request)) => {
                let descriptor = JobDescriptor::final_proof(request.input);
                let id = self.registry.submit(descriptor)?;
                Some(Response::GenFinalProofResponse(
                    proto::GenFinalProofResponse {
                        result: proto::SubmitResult::Ok as i32,
                        id: id.to_string(),
                    },
                ))
            }
            Some(Request::CancelRequest(request)) => {
                Some(Response::CancelResponse(self.cancel(request)))
            }
            Some(Request::GetProofRequest(request)) => {
                let job_id = JobId::new(request.id);
                Some(Response::GetProofResponse(assemble::get_proof(
                    self.registry.lookup(&job_id),
                )))
            }
            None => {
                error!(id = %id, "Orchestrator message carries no recognized request");
                None
            }
        };

        Ok(proto::ProverMessage { id, response })
    }

    fn get_status(&self) -> proto::GetStatusResponse {
        let snapshot = self.registry.snapshot();
        let cores = self.host.core_count();
        let memory = self.host.memory();
        assemble::status(snapshot, &self.prover_id, cores, memory)
    }

    /// Translate and submit a single- or batch-proof payload.
    ///
    /// A validation failure is reported in the response with no id and no
    /// job created; registry exhaustion propagates to the caller.
    fn admit_batch(
        &self,
        input: Option<proto::InputData>,
        descriptor: fn(proverd_core_types::BatchInput) -> JobDescriptor,
    ) -> Result<(i32, String), SubmitError> {
        match translate::batch_input(input) {
            Ok(batch) => {
                let id = self.registry.submit(descriptor(batch))?;
                Ok((proto::SubmitResult::Ok as i32, id.to_string()))
            }
            Err(error) => {
                warn!(%error, "Rejecting proof submission");
                Ok((proto::SubmitResult::Error as i32, String::new()))
            }
        }
    }

    fn cancel(&self, request: proto::CancelRequest) -> proto::CancelResponse {
        let id = JobId::new(request.id);

        let result = match self.registry.set_cancelling(&id) {
            CancelOutcome::Cancelling => proto::SubmitResult::Ok,
            CancelOutcome::NotFound => {
                warn!(id = %id, "Cancel requested for unknown job");
                proto::SubmitResult::Error
            }
            CancelOutcome::AlreadyCompleted => {
                warn!(id = %id, "Cancel requested for completed job");
                proto::SubmitResult::Error
            }
        };

        proto::CancelResponse {
            result: result as i32,
        }
    }
}
