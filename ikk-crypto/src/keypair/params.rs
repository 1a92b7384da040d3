use crate::errors::IKKCryptoError;
use crate::field::Field;

use serde::{Deserialize, Serialize};

/// Default bound on rejection-sampling rounds for full-rank matrices.
pub const DEFAULT_MAX_SAMPLING_ATTEMPTS: usize = 1000;

/// Parameters of one IKK session. Immutable for the lifetime of a key pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IKKParams {
    /// Order q of the prime field.
    pub modulus: u64,
    /// Code length n.
    pub code_length: usize,
    /// Code dimension k, also the plaintext length.
    pub dimension: usize,
    /// Upper bound on rejection-sampling rounds per full-rank matrix.
    pub max_sampling_attempts: usize,
}

impl IKKParams {
    /// Creates a new parameter set for GF(`modulus`), length `code_length`
    /// and dimension `dimension`.
    ///
    /// # Errors
    ///
    /// * `InvalidModulus` if `modulus` is not a prime.
    /// * `InvalidParameters` unless `0 < dimension < code_length`.
    pub fn try_with(
        modulus: u64,
        code_length: usize,
        dimension: usize,
    ) -> Result<Self, IKKCryptoError> {
        Field::try_with(modulus)?;

        if dimension == 0 {
            return Err(IKKCryptoError::InvalidParameters(
                "Dimension k must be > 0".to_string(),
            ));
        }

        if dimension >= code_length {
            return Err(IKKCryptoError::InvalidParameters(format!(
                "Dimension k ({}) must be < code length n ({})",
                dimension, code_length
            )));
        }

        Ok(Self {
            modulus,
            code_length,
            dimension,
            max_sampling_attempts: DEFAULT_MAX_SAMPLING_ATTEMPTS,
        })
    }

    /// Overrides the rejection-sampling bound.
    pub fn with_max_sampling_attempts(mut self, attempts: usize) -> Result<Self, IKKCryptoError> {
        if attempts == 0 {
            return Err(IKKCryptoError::InvalidParameters(
                "max_sampling_attempts must be > 0".to_string(),
            ));
        }
        self.max_sampling_attempts = attempts;
        Ok(self)
    }

    pub fn field(&self) -> Result<Field, IKKCryptoError> {
        Field::try_with(self.modulus)
    }

    /// Number of redundancy rows `n − k`.
    pub fn redundancy(&self) -> usize {
        self.code_length - self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_params() {
        let params = IKKParams::try_with(2, 20, 10).unwrap();
        assert_eq!(params.redundancy(), 10);
        assert_eq!(params.max_sampling_attempts, DEFAULT_MAX_SAMPLING_ATTEMPTS);
        assert_eq!(params.field().unwrap().modulus(), 2);
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        assert!(matches!(
            IKKParams::try_with(2, 10, 0),
            Err(IKKCryptoError::InvalidParameters(_))
        ));
        assert!(matches!(
            IKKParams::try_with(2, 10, 10),
            Err(IKKCryptoError::InvalidParameters(_))
        ));
        assert!(IKKParams::try_with(2, 10, 11).is_err());
    }

    #[test]
    fn test_rejects_non_prime_order() {
        assert!(matches!(
            IKKParams::try_with(4, 10, 5),
            Err(IKKCryptoError::InvalidModulus(_))
        ));
    }

    #[test]
    fn test_sampling_bound_override() {
        let params = IKKParams::try_with(3, 6, 3).unwrap();
        assert_eq!(
            params.with_max_sampling_attempts(5).unwrap().max_sampling_attempts,
            5
        );
        assert!(params.with_max_sampling_attempts(0).is_err());
    }

    #[test]
    fn test_params_serde() {
        let params = IKKParams::try_with(5, 8, 3).unwrap();
        let json = serde_json::to_string(&params).unwrap();
        let back: IKKParams = serde_json::from_str(&json).unwrap();
        assert_eq!(params, back);
    }
}
