use crate::errors::IKKCryptoError;
use crate::field::matrix_ops::{matrix_rank, vector_matrix_mul};
use crate::field::{Field, Matrix, Vector};

use rand::Rng;
use tracing::{debug, warn};

/// Samples a uniform element of the field.
pub fn random_element<R: Rng + ?Sized>(field: &Field, rng: &mut R) -> i64 {
    rng.random_range(0..field.modulus()) as i64
}

/// Samples a uniform vector of length `len`.
pub fn random_vector<R: Rng + ?Sized>(len: usize, field: &Field, rng: &mut R) -> Vector {
    (0..len).map(|_| random_element(field, rng)).collect()
}

/// Samples a uniform `rows × cols` matrix.
pub fn random_matrix<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    field: &Field,
    rng: &mut R,
) -> Matrix {
    (0..rows).map(|_| random_vector(cols, field, rng)).collect()
}

/// Samples a uniform codeword of the code generated by the rows of `g`,
/// i.e. `v·G` for a uniform `v`.
pub fn random_codeword<R: Rng + ?Sized>(
    g: &Matrix,
    field: &Field,
    rng: &mut R,
) -> Result<Vector, IKKCryptoError> {
    let coefficients = random_vector(g.len(), field, rng);
    vector_matrix_mul(&coefficients, g, field)
}

/// Rejection-samples a `rows × cols` matrix of rank `min(rows, cols)`.
///
/// # Errors
///
/// Returns `IKKCryptoError::GenerationFailed` once `max_attempts` samples have
/// all been rank deficient.
pub fn random_nonsingular<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    field: &Field,
    max_attempts: usize,
    rng: &mut R,
) -> Result<Matrix, IKKCryptoError> {
    let target = rows.min(cols);

    for attempt in 1..=max_attempts {
        let candidate = random_matrix(rows, cols, field, rng);
        if matrix_rank(&candidate, field)? == target {
            debug!(rows, cols, attempt, "sampled full-rank matrix");
            return Ok(candidate);
        }
    }

    warn!(rows, cols, max_attempts, "rejection sampling exhausted");
    Err(IKKCryptoError::GenerationFailed {
        rows,
        cols,
        attempts: max_attempts,
    })
}
