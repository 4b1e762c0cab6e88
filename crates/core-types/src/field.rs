use core::fmt;

use thiserror::Error;

/// Number of hex characters that encode one field element.
pub const FIELD_ELEMENT_HEX_LEN: usize = 16;

/// A single fixed-width field element, carried on the wire as a 16-character
/// hex chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldElement(u64);

impl FieldElement {
    /// Create a field element from its raw value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw value of this field element.
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Parse a field element from exactly [`FIELD_ELEMENT_HEX_LEN`] hex characters.
    pub fn from_hex_chunk(chunk: &str) -> Result<Self, FieldElementError> {
        if chunk.len() != FIELD_ELEMENT_HEX_LEN {
            return Err(FieldElementError::ChunkLength(chunk.len()));
        }

        u64::from_str_radix(chunk, 16)
            .map(Self)
            .map_err(|_| FieldElementError::InvalidHex(chunk.to_string()))
    }

    /// Split a concatenated hex string into its field elements.
    ///
    /// The input length must be an exact multiple of [`FIELD_ELEMENT_HEX_LEN`].
    pub fn split_concatenated(concatenated: &str) -> Result<Vec<Self>, FieldElementError> {
        let bytes = concatenated.as_bytes();
        if bytes.len() % FIELD_ELEMENT_HEX_LEN != 0 {
            return Err(FieldElementError::UnalignedInput(bytes.len()));
        }

        // Chunk by bytes, not chars: the input is untrusted and need not be
        // ASCII, and a non-hex chunk is rejected either way.
        bytes
            .chunks(FIELD_ELEMENT_HEX_LEN)
            .map(|chunk| match core::str::from_utf8(chunk) {
                Ok(chunk) => Self::from_hex_chunk(chunk),
                Err(_) => Err(FieldElementError::InvalidHex(
                    String::from_utf8_lossy(chunk).into_owned(),
                )),
            })
            .collect()
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FieldElementError {
    #[error("field element chunk must be {FIELD_ELEMENT_HEX_LEN} characters, got {0}")]
    ChunkLength(usize),

    #[error("field element input length {0} is not a multiple of {FIELD_ELEMENT_HEX_LEN}")]
    UnalignedInput(usize),

    #[error("field element chunk is not valid hex: `{0}`")]
    InvalidHex(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_one_chunk() {
        let fe = FieldElement::from_hex_chunk("00000000000000ff").unwrap();
        assert_eq!(fe.value(), 0xff);
    }

    #[test]
    fn rejects_short_chunk() {
        assert_eq!(
            FieldElement::from_hex_chunk("ff"),
            Err(FieldElementError::ChunkLength(2))
        );
    }

    #[test]
    fn rejects_non_hex_chunk() {
        assert!(matches!(
            FieldElement::from_hex_chunk("zzzzzzzzzzzzzzzz"),
            Err(FieldElementError::InvalidHex(_))
        ));
    }

    #[test]
    fn splits_concatenated_chunks() {
        let elements =
            FieldElement::split_concatenated("00000000000000010000000000000002").unwrap();
        assert_eq!(
            elements,
            vec![FieldElement::new(1), FieldElement::new(2)]
        );
    }

    #[test]
    fn split_rejects_unaligned_input() {
        assert_eq!(
            FieldElement::split_concatenated("0000000000000001ff"),
            Err(FieldElementError::UnalignedInput(18))
        );
    }

    #[test]
    fn split_of_empty_input_is_empty() {
        assert_eq!(FieldElement::split_concatenated(""), Ok(vec![]));
    }
}
