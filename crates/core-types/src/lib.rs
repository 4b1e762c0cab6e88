//! Core type definitions for the proverd proof-computation worker.
//!
//! This crate holds the pure data model shared between the session protocol
//! engine, the job registry and the executor: job descriptors and their
//! lifecycle, validated batch inputs, field elements and proof outputs.
//! It performs no I/O and knows nothing about the wire format.

mod field;
mod input;
mod job;
mod proof;

pub use field::{FieldElement, FieldElementError, FIELD_ELEMENT_HEX_LEN};
pub use input::{ensure_0x_prefix, BatchInput, JobInput, PublicInputs};
pub use job::{JobDescriptor, JobId, JobKind, JobOutput, JobResult, JobStatus, ProofJob};
pub use proof::{ProofBundle, ProofRow, PublicInputsExtended};
