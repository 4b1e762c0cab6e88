use proverd_core_types::{ProofBundle, ProofRow, PublicInputs, PublicInputsExtended};

use crate::{self as proto};

impl From<PublicInputs> for proto::PublicInputs {
    fn from(inputs: PublicInputs) -> proto::PublicInputs {
        proto::PublicInputs {
            old_state_root: inputs.old_state_root,
            old_local_exit_root: inputs.old_local_exit_root,
            new_state_root: inputs.new_state_root,
            new_local_exit_root: inputs.new_local_exit_root,
            sequencer_addr: inputs.sequencer_addr,
            batch_hash_data: inputs.batch_hash_data,
            aggregator_addr: inputs.aggregator_addr,
            batch_num: inputs.batch_num,
            eth_timestamp: inputs.eth_timestamp,
            chain_id: inputs.chain_id,
        }
    }
}

impl From<ProofRow> for proto::ProofRow {
    fn from(row: ProofRow) -> proto::ProofRow {
        proto::ProofRow { values: row.0 }
    }
}

impl From<ProofBundle> for proto::Proof {
    fn from(bundle: ProofBundle) -> proto::Proof {
        proto::Proof {
            proof_a: bundle.proof_a,
            proof_b: bundle.proof_b.into_iter().map(Into::into).collect(),
            proof_c: bundle.proof_c,
        }
    }
}

impl From<PublicInputsExtended> for proto::PublicInputsExtended {
    fn from(public: PublicInputsExtended) -> proto::PublicInputsExtended {
        proto::PublicInputsExtended {
            input_hash: public.input_hash,
            public_inputs: Some(public.public_inputs.into()),
        }
    }
}
