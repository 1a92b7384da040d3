use crate::errors::IKKCryptoError;
use crate::field::matrix_ops::{
    dimensions, matrix_add, matrix_inverse, matrix_mul, select_entries, submatrix_by_columns,
    transpose, vector_add, vector_matrix_mul, vector_sub,
};
use crate::field::{Matrix, Vector};
use crate::keypair::helper::{random_codeword, random_nonsingular, random_vector};
use crate::keypair::params::IKKParams;
use crate::sle::{right_kernel_basis, rref, solve_augmented};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Public half of an IKK key pair: `G1 = G·M` and `G2 = Q·(G0 + T)·M`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    pub params: IKKParams,
    pub G1: Matrix, // k×n
    pub G2: Matrix, // n×n
}

/// The trapdoor. Produced together with its [`PublicKey`] and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretKey {
    pub params: IKKParams,
    pub G: Matrix,      // k×n generator, full row rank
    pub M: Matrix,      // n×n invertible
    pub T: Matrix,      // n×n invertible
    pub Q: Matrix,      // n×n, rank n−k
    pub G0: Matrix,     // n×n, every row a codeword of G
    pub J: Vec<usize>,  // pivot columns of G, |J| = k
}

/// An encrypted length-n vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext {
    pub body: Vector,
}

/// The random matrices a key pair is derived from.
///
/// `generate_keypair` samples these; tests build them by hand and feed them to
/// [`assemble_keypair`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMaterial {
    pub G: Matrix,  // k×n, full row rank
    pub G0: Matrix, // n×n, rows are codewords of G
    pub T: Matrix,  // n×n invertible
    pub L: Matrix,  // n×(n−k), full column rank
    pub M: Matrix,  // n×n invertible
}

fn check_shapes(expected: &[(&str, &Matrix, (usize, usize))]) -> Result<(), IKKCryptoError> {
    for &(name, matrix, (rows, cols)) in expected {
        let actual = dimensions(matrix)?;
        if actual != (rows, cols) {
            return Err(IKKCryptoError::DimensionMismatch(format!(
                "{} must be {}x{}, got {}x{}",
                name, rows, cols, actual.0, actual.1
            )));
        }
    }
    Ok(())
}

/// Samples fresh [`KeyMaterial`] for `params`.
pub fn sample_key_material<R: Rng + ?Sized>(
    params: &IKKParams,
    rng: &mut R,
) -> Result<KeyMaterial, IKKCryptoError> {
    let field = params.field()?;
    let n = params.code_length;
    let k = params.dimension;
    let attempts = params.max_sampling_attempts;

    let G = random_nonsingular(k, n, &field, attempts, rng)?;

    let mut G0 = Vec::with_capacity(n);
    for _ in 0..n {
        G0.push(random_codeword(&G, &field, rng)?);
    }

    let T = random_nonsingular(n, n, &field, attempts, rng)?;
    let L = random_nonsingular(n, n - k, &field, attempts, rng)?;
    let M = random_nonsingular(n, n, &field, attempts, rng)?;

    Ok(KeyMaterial { G, G0, T, L, M })
}

/// Derives the key pair from given material.
///
/// # Errors
///
/// * `DimensionMismatch` if any matrix has the wrong shape for `params`.
/// * `Singular` if `G` is not of full row rank or `T` is singular on the
///   pivot columns of `G`.
pub fn assemble_keypair(
    params: &IKKParams,
    material: KeyMaterial,
) -> Result<(PublicKey, SecretKey), IKKCryptoError> {
    let field = params.field()?;
    let n = params.code_length;
    let k = params.dimension;
    let KeyMaterial { G, G0, T, L, M } = material;

    check_shapes(&[
        ("G", &G, (k, n)),
        ("G0", &G0, (n, n)),
        ("T", &T, (n, n)),
        ("L", &L, (n, n - k)),
        ("M", &M, (n, n)),
    ])?;

    let (_, J) = rref(&G, &field)?;
    if J.len() != k {
        return Err(IKKCryptoError::Singular(format!(
            "G has rank {} but dimension is {}",
            J.len(),
            k
        )));
    }
    debug!(pivots = ?J, "pivot columns of G");

    let TJ = submatrix_by_columns(&T, &J)?;
    let HJ = right_kernel_basis(&transpose(&TJ)?, &field)?;
    if HJ.len() != n - k {
        return Err(IKKCryptoError::Singular(format!(
            "T restricted to the pivot columns has rank {} (expected {})",
            n - HJ.len(),
            k
        )));
    }

    let Q = matrix_mul(&L, &HJ, &field)?;

    let G1 = matrix_mul(&G, &M, &field)?;
    let masked = matrix_mul(&matrix_add(&G0, &T, &field)?, &M, &field)?;
    let G2 = matrix_mul(&Q, &masked, &field)?;

    let public_key = PublicKey {
        params: *params,
        G1,
        G2,
    };
    let secret_key = SecretKey {
        params: *params,
        G,
        M,
        T,
        Q,
        G0,
        J,
    };

    Ok((public_key, secret_key))
}

/// Generates a fresh IKK key pair.
///
/// # Errors
///
/// Returns `GenerationFailed` if any full-rank matrix could not be sampled
/// within `params.max_sampling_attempts` rounds.
pub fn generate_keypair<R: Rng + ?Sized>(
    params: &IKKParams,
    rng: &mut R,
) -> Result<(PublicKey, SecretKey), IKKCryptoError> {
    let material = sample_key_material(params, rng)?;
    assemble_keypair(params, material)
}

impl PublicKey {
    /// Checks that `G1` is k×n and `G2` is n×n for the stored parameters.
    pub fn validate(&self) -> Result<(), IKKCryptoError> {
        let n = self.params.code_length;
        let k = self.params.dimension;
        check_shapes(&[("G1", &self.G1, (k, n)), ("G2", &self.G2, (n, n))])
    }

    /// Encrypts the length-k plaintext `u` as `u·G1 + e·G2` for a fresh
    /// uniform error vector `e`.
    pub fn encrypt<R: Rng + ?Sized>(
        &self,
        u: &Vector,
        rng: &mut R,
    ) -> Result<Ciphertext, IKKCryptoError> {
        let field = self.params.field()?;
        let e = random_vector(self.params.code_length, &field, rng);
        self.encrypt_with_error(u, &e)
    }

    /// Deterministic core of [`PublicKey::encrypt`] with a caller-chosen `e`.
    pub fn encrypt_with_error(&self, u: &Vector, e: &Vector) -> Result<Ciphertext, IKKCryptoError> {
        let field = self.params.field()?;
        self.validate()?;

        if u.len() != self.params.dimension {
            return Err(IKKCryptoError::DimensionMismatch(format!(
                "Plaintext length ({}) must match dimension k ({})",
                u.len(),
                self.params.dimension
            )));
        }
        if e.len() != self.params.code_length {
            return Err(IKKCryptoError::DimensionMismatch(format!(
                "Error vector length ({}) must match code length n ({})",
                e.len(),
                self.params.code_length
            )));
        }

        let body = vector_add(
            &vector_matrix_mul(u, &self.G1, &field)?,
            &vector_matrix_mul(e, &self.G2, &field)?,
            &field,
        )?;

        Ok(Ciphertext { body })
    }

    pub fn to_json(&self) -> Result<String, IKKCryptoError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(data: &str) -> Result<Self, IKKCryptoError> {
        Ok(serde_json::from_str(data)?)
    }
}

impl SecretKey {
    /// Checks every component against the stored parameters: `G` is k×n,
    /// `M`, `T`, `Q` and `G0` are n×n and `J` holds k increasing columns below n.
    pub fn validate(&self) -> Result<(), IKKCryptoError> {
        let n = self.params.code_length;
        let k = self.params.dimension;
        check_shapes(&[
            ("G", &self.G, (k, n)),
            ("M", &self.M, (n, n)),
            ("T", &self.T, (n, n)),
            ("Q", &self.Q, (n, n)),
            ("G0", &self.G0, (n, n)),
        ])?;
        let increasing = self.J.windows(2).all(|w| w[0] < w[1]);
        if self.J.len() != k || !increasing || self.J.iter().any(|&j| j >= n) {
            return Err(IKKCryptoError::DimensionMismatch(format!(
                "J must list {} increasing columns below {}, got {:?}",
                k, n, self.J
            )));
        }
        Ok(())
    }

    /// Recovers the plaintext using the trapdoor.
    ///
    /// With `y = ct·M⁻¹ = (u + w)·G + e·Q·T` (where `e·Q·G0 = w·G`), the
    /// `e·Q·T` part vanishes on the pivot columns J, so
    /// `yJ·GJ⁻¹·G = (u + w)·G` isolates it.
    ///
    /// # Errors
    ///
    /// * `DimensionMismatch` if the ciphertext is not of length n or a key
    ///   component does not fit the stored parameters.
    /// * `Singular` if a key component that must be invertible is not.
    /// * `Inconsistent` if `u·G` is not a codeword (key/ciphertext mismatch).
    pub fn decrypt(&self, ct: &Ciphertext) -> Result<Vector, IKKCryptoError> {
        let field = self.params.field()?;
        let k = self.params.dimension;

        if ct.body.len() != self.params.code_length {
            return Err(IKKCryptoError::DimensionMismatch(format!(
                "Ciphertext length ({}) must match code length n ({})",
                ct.body.len(),
                self.params.code_length
            )));
        }
        self.validate()?;

        let y = vector_matrix_mul(&ct.body, &matrix_inverse(&self.M, &field)?, &field)?;

        let GJ = submatrix_by_columns(&self.G, &self.J)?;
        let yJ = select_entries(&y, &self.J)?;
        let coefficients = vector_matrix_mul(&yJ, &matrix_inverse(&GJ, &field)?, &field)?;
        let eQT = vector_sub(&y, &vector_matrix_mul(&coefficients, &self.G, &field)?, &field)?;

        let eQ = vector_matrix_mul(&eQT, &matrix_inverse(&self.T, &field)?, &field)?;
        let eQG0 = vector_matrix_mul(&eQ, &self.G0, &field)?;

        let uG = vector_sub(&vector_sub(&y, &eQG0, &field)?, &eQT, &field)?;

        let solved = solve_augmented(&transpose(&self.G)?, &uG, &field)?;
        Ok(solved.solution[..k].to_vec())
    }
}

impl Ciphertext {
    pub fn to_json(&self) -> Result<String, IKKCryptoError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(data: &str) -> Result<Self, IKKCryptoError> {
        Ok(serde_json::from_str(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::matrix_ops::{identity_matrix, matrix_rank};

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn keypair(q: u64, n: usize, k: usize, seed: u64) -> (PublicKey, SecretKey) {
        let params = IKKParams::try_with(q, n, k).unwrap();
        generate_keypair(&params, &mut StdRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn test_key_shapes() {
        let (pk, sk) = keypair(2, 12, 5, 11);
        assert_eq!(dimensions(&pk.G1).unwrap(), (5, 12));
        assert_eq!(dimensions(&pk.G2).unwrap(), (12, 12));
        assert_eq!(dimensions(&sk.Q).unwrap(), (12, 12));
        assert_eq!(sk.J.len(), 5);
        assert!(sk.J.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_secret_q_has_rank_n_minus_k() {
        let (_, sk) = keypair(3, 9, 4, 5);
        let field = sk.params.field().unwrap();
        assert_eq!(matrix_rank(&sk.Q, &field).unwrap(), 5);
    }

    #[test]
    fn test_encrypt_decrypt_block() -> Result<(), IKKCryptoError> {
        let (pk, sk) = keypair(7, 10, 4, 42);
        let mut rng = StdRng::seed_from_u64(123);
        let u = vec![6, 0, 3, 1];
        let ct = pk.encrypt(&u, &mut rng)?;
        assert_eq!(ct.body.len(), 10);
        assert_eq!(sk.decrypt(&ct)?, u);
        Ok(())
    }

    #[test]
    fn test_encrypt_rejects_wrong_lengths() {
        let (pk, _) = keypair(2, 8, 3, 1);
        assert!(matches!(
            pk.encrypt_with_error(&vec![1, 0], &vec![0; 8]),
            Err(IKKCryptoError::DimensionMismatch(_))
        ));
        assert!(matches!(
            pk.encrypt_with_error(&vec![1, 0, 1], &vec![0; 7]),
            Err(IKKCryptoError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_decrypt_rejects_wrong_length() {
        let (_, sk) = keypair(2, 8, 3, 1);
        let ct = Ciphertext { body: vec![0; 5] };
        assert!(matches!(
            sk.decrypt(&ct),
            Err(IKKCryptoError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_decrypt_with_singular_m_fails() {
        let (pk, mut sk) = keypair(2, 6, 2, 9);
        sk.M = vec![vec![0; 6]; 6];
        let ct = pk.encrypt_with_error(&vec![1, 1], &vec![0; 6]).unwrap();
        assert!(matches!(sk.decrypt(&ct), Err(IKKCryptoError::Singular(_))));
    }

    #[test]
    fn test_assemble_rejects_rank_deficient_generator() {
        let params = IKKParams::try_with(2, 4, 2).unwrap();
        let material = KeyMaterial {
            G: vec![vec![1, 1, 0, 0], vec![1, 1, 0, 0]],
            G0: vec![vec![0; 4]; 4],
            T: identity_matrix(4),
            L: vec![vec![1, 0], vec![0, 1], vec![0, 0], vec![0, 0]],
            M: identity_matrix(4),
        };
        assert!(matches!(
            assemble_keypair(&params, material),
            Err(IKKCryptoError::Singular(_))
        ));
    }

    #[test]
    fn test_assemble_rejects_wrong_shape() {
        let params = IKKParams::try_with(2, 4, 2).unwrap();
        let material = KeyMaterial {
            G: vec![vec![1, 0, 0, 0], vec![0, 1, 0, 0]],
            G0: vec![vec![0; 4]; 4],
            T: identity_matrix(4),
            L: identity_matrix(4),
            M: identity_matrix(4),
        };
        assert!(matches!(
            assemble_keypair(&params, material),
            Err(IKKCryptoError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_decrypt_rejects_key_inconsistent_with_params() {
        let (pk, sk) = keypair(2, 6, 3, 4);
        let ct = pk.encrypt(&vec![1, 0, 1], &mut StdRng::seed_from_u64(2)).unwrap();

        let mut wider = sk.clone();
        wider.params.dimension = 4;
        assert!(matches!(
            wider.decrypt(&ct),
            Err(IKKCryptoError::DimensionMismatch(_))
        ));

        let mut short_q = sk.clone();
        short_q.Q.pop();
        assert!(matches!(
            short_q.decrypt(&ct),
            Err(IKKCryptoError::DimensionMismatch(_))
        ));

        let mut bad_pivots = sk.clone();
        bad_pivots.J = vec![0, 1, 6];
        assert!(matches!(
            bad_pivots.decrypt(&ct),
            Err(IKKCryptoError::DimensionMismatch(_))
        ));

        assert!(sk.validate().is_ok());
    }

    #[test]
    fn test_encrypt_rejects_malformed_public_key() {
        let (mut pk, _) = keypair(3, 5, 2, 6);
        pk.G1.pop();
        assert!(matches!(
            pk.encrypt_with_error(&vec![1, 2], &vec![0; 5]),
            Err(IKKCryptoError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_json_round_trip() -> Result<(), IKKCryptoError> {
        let (pk, _) = keypair(5, 6, 2, 77);
        let restored = PublicKey::from_json(&pk.to_json()?)?;
        assert_eq!(restored, pk);

        let ct = pk.encrypt(&vec![1, 4], &mut StdRng::seed_from_u64(1))?;
        assert_eq!(Ciphertext::from_json(&ct.to_json()?)?, ct);

        assert!(matches!(
            PublicKey::from_json("{not json"),
            Err(IKKCryptoError::SerializationError(_))
        ));
        Ok(())
    }
}
