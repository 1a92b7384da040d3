#[derive(thiserror::Error, Debug)]
pub enum IKKCryptoError {
    /// Operand shapes are incompatible (multiply, add, submatrix, ragged rows).
    #[error("DimensionMismatch: {0}")]
    DimensionMismatch(String),
    /// Inversion requested on a matrix whose rank is below its size.
    #[error("Singular: {0}")]
    Singular(String),
    /// Rejection sampling of a full-rank matrix ran out of attempts.
    #[error("GenerationFailed: no full-rank {rows}x{cols} matrix after {attempts} attempts")]
    GenerationFailed {
        rows: usize,
        cols: usize,
        attempts: usize,
    },
    /// A linear system has no solution in the expected block of unknowns.
    #[error("Inconsistent: {0}")]
    Inconsistent(String),

    /// Error when creating a field with a modulus that is not a prime.
    #[error("InvalidModulus: {0}")]
    InvalidModulus(String),
    /// Error when inverting the zero element.
    #[error("NoInverse: {0}")]
    NoInverse(String),

    #[error("InvalidParameters: {0}")]
    InvalidParameters(String),

    #[error("Data serialization: {0}")]
    SerializationError(#[from] serde_json::Error),
}
