use std::collections::BTreeMap;

use crate::FieldElement;

/// Public inputs of a batch to be proven.
///
/// Hex-string fields are stored with a normalized `0x` prefix; the session
/// layer enforces the length ceilings before an input ever reaches this type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PublicInputs {
    pub old_state_root: String,
    pub old_local_exit_root: String,
    pub new_state_root: String,
    pub new_local_exit_root: String,
    pub sequencer_addr: String,
    pub batch_hash_data: String,
    pub aggregator_addr: String,
    pub batch_num: u64,
    pub eth_timestamp: u64,
    pub chain_id: u64,
}

/// The validated payload of a single- or batch-proof job.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchInput {
    pub public_inputs: PublicInputs,
    pub global_exit_root: String,
    /// Raw batch payload, `0x`-normalized, with no length ceiling.
    pub batch_payload: String,
    /// State entries keyed by a bounded hex key, each value a sequence of
    /// field elements decoded from 16-character chunks.
    pub db: BTreeMap<String, Vec<FieldElement>>,
    /// Contract bytecode keyed by hash, hex-decoded as-is.
    pub contracts_bytecode: BTreeMap<String, Vec<u8>>,
}

/// Kind-specific input of a job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JobInput {
    /// Validated inputs for a single or batch proof.
    Batch(Box<BatchInput>),

    /// Two opaque sub-proofs to be aggregated, passed through unvalidated.
    Aggregated { input_1: String, input_2: String },

    /// One opaque aggregated proof to be wrapped into the final proof.
    Final { input: String },
}

/// Return the value with a `0x` prefix, adding it if missing.
pub fn ensure_0x_prefix(value: &str) -> String {
    if value.starts_with("0x") {
        value.to_string()
    } else {
        format!("0x{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_added_when_missing() {
        assert_eq!(ensure_0x_prefix("1234"), "0x1234");
    }

    #[test]
    fn prefix_is_kept_when_present() {
        assert_eq!(ensure_0x_prefix("0x1234"), "0x1234");
    }

    #[test]
    fn prefix_on_empty_input() {
        assert_eq!(ensure_0x_prefix(""), "0x");
    }
}
