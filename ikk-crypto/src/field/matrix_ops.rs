use crate::errors::IKKCryptoError;
use crate::field::{Field, Matrix, Vector};
use crate::sle::rref;

use itertools::Itertools;

/// Returns `(rows, cols)` of `a`, rejecting ragged matrices.
///
/// An empty matrix is reported as `0×0`.
pub fn dimensions(a: &Matrix) -> Result<(usize, usize), IKKCryptoError> {
    let rows = a.len();
    if rows == 0 {
        return Ok((0, 0));
    }
    let cols = a[0].len();
    for (i, row) in a.iter().enumerate() {
        if row.len() != cols {
            return Err(IKKCryptoError::DimensionMismatch(format!(
                "Row {} has length {} but expected {}",
                i,
                row.len(),
                cols
            )));
        }
    }
    Ok((rows, cols))
}

/// Creates a `rows × cols` matrix of zeros.
pub fn zero_matrix(rows: usize, cols: usize) -> Matrix {
    vec![vec![0; cols]; rows]
}

/// Creates an identity matrix of size `n`.
pub fn identity_matrix(n: usize) -> Matrix {
    let mut identity = zero_matrix(n, n);
    #[allow(clippy::needless_range_loop)]
    for i in 0..n {
        identity[i][i] = 1;
    }
    identity
}

/// A·x where A is an m×n matrix and x is a length–n vector.
/// Returns an m‐vector.
pub fn matrix_vector_mul(a: &Matrix, x: &Vector, field: &Field) -> Result<Vector, IKKCryptoError> {
    let (m, n) = dimensions(a)?;
    if m == 0 {
        return Ok(Vec::new());
    }
    if x.len() != n {
        return Err(IKKCryptoError::DimensionMismatch(format!(
            "Matrix columns ({}) must match vector length ({})",
            n,
            x.len()
        )));
    }

    let product: Vector = a
        .iter()
        .map(|row| {
            row.iter()
                .zip(x.iter())
                .fold(0i64, |acc, (&aij, &xj)| field.add(acc, field.mul(aij, xj)))
        })
        .collect();
    Ok(product)
}

/// x·A where x is a length–m row‐vector and A is m×n.
/// Returns a length–n row‐vector.
pub fn vector_matrix_mul(x: &Vector, a: &Matrix, field: &Field) -> Result<Vector, IKKCryptoError> {
    let m = x.len();
    if a.len() != m {
        return Err(IKKCryptoError::DimensionMismatch(format!(
            "Vector length ({}) must match matrix rows ({})",
            m,
            a.len()
        )));
    }
    if m == 0 {
        return Ok(Vec::new());
    }
    let (_, n) = dimensions(a)?;

    let mut y = vec![0i64; n];
    for (i, row) in a.iter().enumerate() {
        if x[i] == 0 {
            continue;
        }
        for (yj, &aij) in y.iter_mut().zip(row.iter()) {
            *yj = field.add(*yj, field.mul(x[i], aij));
        }
    }
    Ok(y)
}

/// Computes the vector sum `c = a + b` over the field.
///
/// # Errors
///
/// Returns `IKKCryptoError::DimensionMismatch` if the vectors have different lengths.
pub fn vector_add(a: &Vector, b: &Vector, field: &Field) -> Result<Vector, IKKCryptoError> {
    if a.len() != b.len() {
        return Err(IKKCryptoError::DimensionMismatch(format!(
            "Vector lengths must match for addition ({} vs {})",
            a.len(),
            b.len()
        )));
    }
    Ok(a.iter().zip(b).map(|(&x, &y)| field.add(x, y)).collect())
}

/// Computes the vector difference `c = a - b` over the field.
///
/// # Errors
///
/// Returns `IKKCryptoError::DimensionMismatch` if the vectors have different lengths.
pub fn vector_sub(a: &Vector, b: &Vector, field: &Field) -> Result<Vector, IKKCryptoError> {
    if a.len() != b.len() {
        return Err(IKKCryptoError::DimensionMismatch(format!(
            "Vector lengths must match for subtraction ({} vs {})",
            a.len(),
            b.len()
        )));
    }
    Ok(a.iter().zip(b).map(|(&x, &y)| field.sub(x, y)).collect())
}

/// Computes the entrywise matrix sum `C = A + B`.
pub fn matrix_add(a: &Matrix, b: &Matrix, field: &Field) -> Result<Matrix, IKKCryptoError> {
    let dim_a = dimensions(a)?;
    let dim_b = dimensions(b)?;
    if dim_a != dim_b {
        return Err(IKKCryptoError::DimensionMismatch(format!(
            "Matrix shapes must match for addition ({}x{} vs {}x{})",
            dim_a.0, dim_a.1, dim_b.0, dim_b.1
        )));
    }
    a.iter()
        .zip(b.iter())
        .map(|(ra, rb)| vector_add(ra, rb, field))
        .collect()
}

/// Computes the matrix product `C = AB` over the field.
///
/// # Errors
///
/// Returns `IKKCryptoError::DimensionMismatch` if the inner dimensions of the matrices do not match
/// or if rows within the matrices have inconsistent lengths.
pub fn matrix_mul(a: &Matrix, b: &Matrix, field: &Field) -> Result<Matrix, IKKCryptoError> {
    let (n, m_common) = dimensions(a)?; // rows in A, cols in A
    if n == 0 {
        return Ok(Matrix::new());
    }

    if b.len() != m_common {
        return Err(IKKCryptoError::DimensionMismatch(format!(
            "Inner dimensions must match for matrix multiplication ({} vs {})",
            m_common,
            b.len()
        )));
    }
    dimensions(b)?;

    a.iter().map(|row| vector_matrix_mul(row, b, field)).collect()
}

/// Returns the transpose of `a`.
pub fn transpose(a: &Matrix) -> Result<Matrix, IKKCryptoError> {
    let (_, cols) = dimensions(a)?;
    Ok((0..cols)
        .map(|j| a.iter().map(|row| row[j]).collect())
        .collect_vec())
}

/// Picks the entries of `v` at `indices`, in the given order.
pub fn select_entries(v: &Vector, indices: &[usize]) -> Result<Vector, IKKCryptoError> {
    indices
        .iter()
        .map(|&i| {
            v.get(i).copied().ok_or_else(|| {
                IKKCryptoError::DimensionMismatch(format!(
                    "Index {} out of range for vector of length {}",
                    i,
                    v.len()
                ))
            })
        })
        .collect()
}

/// Builds the submatrix made of the columns of `a` listed in `indices`.
pub fn submatrix_by_columns(a: &Matrix, indices: &[usize]) -> Result<Matrix, IKKCryptoError> {
    dimensions(a)?;
    a.iter().map(|row| select_entries(row, indices)).collect()
}

/// Builds the submatrix made of the rows of `a` listed in `indices`.
pub fn submatrix_by_rows(a: &Matrix, indices: &[usize]) -> Result<Matrix, IKKCryptoError> {
    dimensions(a)?;
    indices
        .iter()
        .map(|&i| {
            a.get(i).cloned().ok_or_else(|| {
                IKKCryptoError::DimensionMismatch(format!(
                    "Row index {} out of range for matrix with {} rows",
                    i,
                    a.len()
                ))
            })
        })
        .collect()
}

/// Places the rows of `b` below the rows of `a`.
pub fn stack_rows(a: &Matrix, b: &Matrix) -> Result<Matrix, IKKCryptoError> {
    let (rows_a, cols_a) = dimensions(a)?;
    let (rows_b, cols_b) = dimensions(b)?;
    if rows_a > 0 && rows_b > 0 && cols_a != cols_b {
        return Err(IKKCryptoError::DimensionMismatch(format!(
            "Column counts must match for vertical concatenation ({} vs {})",
            cols_a, cols_b
        )));
    }
    Ok(a.iter().chain(b.iter()).cloned().collect())
}

/// Places the columns of `b` to the right of the columns of `a`.
pub fn augment(a: &Matrix, b: &Matrix) -> Result<Matrix, IKKCryptoError> {
    dimensions(a)?;
    dimensions(b)?;
    if a.len() != b.len() {
        return Err(IKKCryptoError::DimensionMismatch(format!(
            "Row counts must match for horizontal concatenation ({} vs {})",
            a.len(),
            b.len()
        )));
    }
    let joined: Matrix = a
        .iter()
        .zip(b.iter())
        .map(|(ra, rb)| ra.iter().chain(rb.iter()).copied().collect())
        .collect();
    Ok(joined)
}

/// Calculates the rank of a matrix over the field: the number of pivots in
/// its reduced row-echelon form.
///
/// # Errors
///
/// Returns `IKKCryptoError::DimensionMismatch` if the matrix rows have inconsistent lengths.
pub fn matrix_rank(matrix: &Matrix, field: &Field) -> Result<usize, IKKCryptoError> {
    let (_, pivots) = rref(matrix, field)?;
    Ok(pivots.len())
}

/// Inverts a square matrix by Gauss–Jordan elimination of `[A | I]`.
///
/// # Errors
///
/// Returns `IKKCryptoError::DimensionMismatch` for non-square input and
/// `IKKCryptoError::Singular` if the rank is below the size.
pub fn matrix_inverse(matrix: &Matrix, field: &Field) -> Result<Matrix, IKKCryptoError> {
    let (rows, cols) = dimensions(matrix)?;
    if rows != cols {
        return Err(IKKCryptoError::DimensionMismatch(format!(
            "matrix_inverse: matrix must be square, got {}x{}",
            rows, cols
        )));
    }
    let n = rows;
    if n == 0 {
        return Ok(Matrix::new());
    }

    let joined = augment(matrix, &identity_matrix(n))?;
    let (reduced, pivots) = rref(&joined, field)?;

    // Full rank iff the first n pivots are exactly the left block.
    let left_pivots = pivots.iter().take_while(|&&p| p < n).count();
    if left_pivots < n {
        return Err(IKKCryptoError::Singular(format!(
            "matrix_inverse: rank {} < size {}",
            left_pivots, n
        )));
    }

    Ok(reduced.into_iter().map(|row| row[n..].to_vec()).collect())
}
