//! Ciphertext-only recovery of IKK plaintexts.
//!
//! `ct = u·G1 + e·G2` is linear in `(u, e)`, and the row space of `G2` is
//! spanned by the nonzero rows of `rref(G2)`. Solving
//! `[G1ᵀ | G2redᵀ]·z = ctᵀ` therefore yields `u` in the first k unknowns of
//! `z` without touching the secret key.
use crate::errors::IKKCryptoError;
use crate::field::matrix_ops::{stack_rows, transpose, vector_add, vector_matrix_mul};
use crate::field::{Field, Matrix, Vector};
use crate::keypair::keys::{Ciphertext, PublicKey};
use crate::sle::{rref, solve_augmented};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Result of [`attack`].
///
/// Every plaintext consistent with the public data is
/// `u_fixed + x·plaintext_kernel` for some `x ∈ F_q^{free_dimension}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackOutcome {
    pub u_fixed: Vector,
    /// k×(n' − rank) block of the reduced system, n' being the number of unknowns.
    pub ambiguity_basis: Matrix,
    /// Rank of the combined public matrix.
    pub rank: usize,
    /// Number of unknowns `k + rank(G2)`.
    pub unknowns: usize,
    /// Null space of the combined system projected onto the k plaintext
    /// coordinates, one row per free unknown.
    pub plaintext_kernel: Matrix,
}

impl AttackOutcome {
    pub fn free_dimension(&self) -> usize {
        self.unknowns - self.rank
    }

    pub fn is_unique(&self) -> bool {
        self.free_dimension() == 0
    }

    /// The candidate plaintext selected by `x`.
    pub fn candidate(&self, field: &Field, x: &Vector) -> Result<Vector, IKKCryptoError> {
        if x.len() != self.free_dimension() {
            return Err(IKKCryptoError::DimensionMismatch(format!(
                "Expected {} free coordinates, got {}",
                self.free_dimension(),
                x.len()
            )));
        }
        if self.is_unique() {
            return Ok(self.u_fixed.clone());
        }
        let shift = vector_matrix_mul(x, &self.plaintext_kernel, field)?;
        vector_add(&self.u_fixed, &shift, field)
    }
}

/// Recovers the plaintext of `ct` from the public key alone.
///
/// # Errors
///
/// * `DimensionMismatch` if `ct` is not of length n, or `G1` is not k×n, or
///   `G2` is not n×n.
/// * `Inconsistent` if `ct` is not in the span of the public matrices.
pub fn attack(pk: &PublicKey, ct: &Ciphertext) -> Result<AttackOutcome, IKKCryptoError> {
    let field = pk.params.field()?;
    let n = pk.params.code_length;
    let k = pk.params.dimension;

    if ct.body.len() != n {
        return Err(IKKCryptoError::DimensionMismatch(format!(
            "Ciphertext length ({}) must match code length n ({})",
            ct.body.len(),
            n
        )));
    }
    pk.validate()?;

    let (reduced, pivots) = rref(&pk.G2, &field)?;
    let g2_rank = pivots.len();
    let g2_reduced: Matrix = reduced.into_iter().take(g2_rank).collect();

    // [G1ᵀ | G2redᵀ] == (G1 stacked over G2red)ᵀ
    let combined = transpose(&stack_rows(&pk.G1, &g2_reduced)?)?;
    let solved = solve_augmented(&combined, &ct.body, &field)?;
    debug!(g2_rank, rank = solved.rank, unknowns = solved.unknowns, "attack system reduced");

    let outcome = AttackOutcome {
        u_fixed: solved.solution[..k].to_vec(),
        ambiguity_basis: solved.free_block(k),
        rank: solved.rank,
        unknowns: solved.unknowns,
        plaintext_kernel: solved
            .null_space(&field)
            .into_iter()
            .map(|row| row[..k].to_vec())
            .collect(),
    };

    if !outcome.is_unique() {
        warn!(
            free_dimension = outcome.free_dimension(),
            "attack left plaintext ambiguous"
        );
    }

    Ok(outcome)
}
