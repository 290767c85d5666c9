//! Error types for block, transaction and address-script parsing.

/// Parser Error Type.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Consensus decode error from the underlying Bitcoin wire decoder.
    #[error("Consensus Decode Error: {0}")]
    Consensus(#[from] bitcoin::consensus::encode::Error),

    /// Not enough bytes left in the buffer for a declared field length.
    #[error("Unexpected end of data: field {field} needs {expected} bytes, {actual} remain")]
    UnexpectedEof {
        /// Field being read when the buffer ran out.
        field: &'static str,
        /// Bytes the field required.
        expected: usize,
        /// Bytes that were left.
        actual: usize,
    },

    /// The input is not valid JSON or does not match the transaction shape.
    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),

    /// A decimal amount could not be converted to integer satoshis.
    #[error("Amount Error: {0}")]
    Amount(#[from] bitcoin::amount::ParseAmountError),
}
