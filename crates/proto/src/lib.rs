//! Protobuf wire messages for the proverd orchestrator protocol.
//!
//! The message set is generated by `prost` from `src/orchestrator.proto`.
//! Conversions from the domain types in `proverd-core-types` to their wire
//! counterparts are provided alongside the generated types.

pub use prost;

include!(concat!(env!("OUT_DIR"), "/orchestrator.v1.rs"));

mod impls;
