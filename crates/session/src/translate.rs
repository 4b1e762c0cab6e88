//! Validation and translation of untrusted submission payloads.
//!
//! Every field of an inbound proof request is checked against a hard bound
//! before a job descriptor is built. Validation is fail-fast: the first
//! violation aborts the translation and no job is ever created from a
//! partially valid payload.

use std::collections::BTreeMap;

use thiserror::Error;

use proverd_core_types::{
    ensure_0x_prefix, BatchInput, FieldElement, FieldElementError, PublicInputs,
};
use proverd_proto as proto;

/// Ceiling for hex root and hash fields, including the `0x` prefix.
const ROOT_MAX_LEN: usize = 2 + 64;

/// Ceiling for address fields, including the `0x` prefix.
const ADDRESS_MAX_LEN: usize = 2 + 40;

/// Ceiling for db entry keys.
const DB_KEY_MAX_LEN: usize = 64;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is too long ({len} > {max} characters)")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("field `{0}` must be non-zero")]
    Zero(&'static str),

    #[error("db key is too long ({len} > {max} characters)")]
    DbKeyTooLong { len: usize, max: usize },

    #[error("db value for key `{key}` is invalid: {source}")]
    DbValue {
        key: String,
        source: FieldElementError,
    },

    #[error("contract bytecode for key `{key}` is not valid hex")]
    BytecodeNotHex { key: String },
}

/// Validate and normalize the payload of a single- or batch-proof command.
pub fn batch_input(input: Option<proto::InputData>) -> Result<BatchInput, TranslateError> {
    let input = input.ok_or(TranslateError::MissingField("input"))?;
    let public = input
        .public_inputs
        .ok_or(TranslateError::MissingField("public_inputs"))?;

    let old_state_root = root_field("old_state_root", public.old_state_root)?;
    let old_local_exit_root = root_field("old_local_exit_root", public.old_local_exit_root)?;
    let new_state_root = root_field("new_state_root", public.new_state_root)?;
    let new_local_exit_root = root_field("new_local_exit_root", public.new_local_exit_root)?;

    check_len("sequencer_addr", &public.sequencer_addr, ADDRESS_MAX_LEN)?;
    let sequencer_addr = ensure_0x_prefix(&public.sequencer_addr);

    let batch_hash_data = root_field("batch_hash_data", public.batch_hash_data)?;

    if public.batch_num == 0 {
        return Err(TranslateError::Zero("batch_num"));
    }
    if public.chain_id == 0 {
        return Err(TranslateError::Zero("chain_id"));
    }

    // The aggregator address is normalized before its bound is checked.
    let aggregator_addr = ensure_0x_prefix(&public.aggregator_addr);
    check_len("aggregator_addr", &aggregator_addr, ADDRESS_MAX_LEN)?;

    let global_exit_root = root_field("global_exit_root", input.global_exit_root)?;
    let batch_payload = ensure_0x_prefix(&input.batch_payload);

    let mut db = BTreeMap::new();
    for (key, value) in input.db {
        if key.len() > DB_KEY_MAX_LEN {
            return Err(TranslateError::DbKeyTooLong {
                len: key.len(),
                max: DB_KEY_MAX_LEN,
            });
        }

        let elements = FieldElement::split_concatenated(&value)
            .map_err(|source| TranslateError::DbValue {
                key: key.clone(),
                source,
            })?;
        db.insert(key, elements);
    }

    let mut contracts_bytecode = BTreeMap::new();
    for (key, value) in input.contracts_bytecode {
        let bytes = decode_hex_bytes(&value)
            .map_err(|_| TranslateError::BytecodeNotHex { key: key.clone() })?;
        contracts_bytecode.insert(key, bytes);
    }

    Ok(BatchInput {
        public_inputs: PublicInputs {
            old_state_root,
            old_local_exit_root,
            new_state_root,
            new_local_exit_root,
            sequencer_addr,
            batch_hash_data,
            aggregator_addr,
            batch_num: public.batch_num,
            eth_timestamp: public.eth_timestamp,
            chain_id: public.chain_id,
        },
        global_exit_root,
        batch_payload,
        db,
        contracts_bytecode,
    })
}

/// Check a hex root/hash field against its ceiling and normalize its prefix.
fn root_field(field: &'static str, value: String) -> Result<String, TranslateError> {
    check_len(field, &value, ROOT_MAX_LEN)?;
    Ok(ensure_0x_prefix(&value))
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), TranslateError> {
    if value.len() > max {
        return Err(TranslateError::TooLong {
            field,
            len: value.len(),
            max,
        });
    }
    Ok(())
}

/// Decode a hex string into bytes, tolerating a `0x` prefix and an odd
/// number of digits (an implicit leading zero is assumed).
fn decode_hex_bytes(value: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    if digits.len() % 2 == 0 {
        hex::decode(digits)
    } else {
        hex::decode(format!("0{digits}"))
    }
}
