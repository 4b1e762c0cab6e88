use crate::PublicInputs;

/// One row of the nested `proof_b` sequence.
///
/// Element order within a row is preserved exactly as produced by the
/// executor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProofRow(pub Vec<String>);

/// The three-part proof produced for single- and final-proof jobs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProofBundle {
    pub proof_a: Vec<String>,
    pub proof_b: Vec<ProofRow>,
    pub proof_c: Vec<String>,
}

/// Extended public-inputs block returned alongside a completed proof.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PublicInputsExtended {
    pub input_hash: String,
    pub public_inputs: PublicInputs,
}
