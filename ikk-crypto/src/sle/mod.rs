//! Row reduction over GF(q): reduced row-echelon form, right kernels and
//! augmented linear systems `A·x = b`.
//!
//! Everything here is exact and deterministic; pivots are chosen by scanning
//! columns left to right and, within a column, rows top to bottom.
use crate::errors::IKKCryptoError;
use crate::field::matrix_ops::dimensions;
use crate::field::{Field, Matrix, Vector};

use serde::{Deserialize, Serialize};

/// Computes the reduced row-echelon form of `a` together with the ordered
/// list of pivot columns.
///
/// The first `pivots.len()` rows of the result are the nonzero rows; each has
/// a leading 1 at its pivot column and that column is zero everywhere else.
pub fn rref(a: &Matrix, field: &Field) -> Result<(Matrix, Vec<usize>), IKKCryptoError> {
    let (rows, cols) = dimensions(a)?;

    let mut mat: Matrix = a
        .iter()
        .map(|row| row.iter().map(|&v| field.normalize(v)).collect())
        .collect();
    let mut pivots = Vec::with_capacity(rows.min(cols));
    let mut pivot_row = 0;

    for col in 0..cols {
        if pivot_row >= rows {
            break;
        }

        let Some(found) = (pivot_row..rows).find(|&r| mat[r][col] != 0) else {
            continue;
        };
        mat.swap(pivot_row, found);

        let inv = field.inv(mat[pivot_row][col])?;
        for v in mat[pivot_row][col..].iter_mut() {
            *v = field.mul(*v, inv);
        }

        let pivot = mat[pivot_row].clone();
        for (r, row) in mat.iter_mut().enumerate() {
            if r == pivot_row {
                continue;
            }
            let factor = row[col];
            if factor == 0 {
                continue;
            }
            for (x, &p) in row[col..].iter_mut().zip(pivot[col..].iter()) {
                *x = field.sub(*x, field.mul(factor, p));
            }
        }

        pivots.push(col);
        pivot_row += 1;
    }

    Ok((mat, pivots))
}

/// Returns a basis of `{x : A·x = 0}` as the rows of a `(n − rank) × n` matrix.
///
/// One basis vector per free column `f` of `rref(A)`, in increasing order of
/// `f`: it has a 1 at `f` and `-R[i][f]` at the pivot column of row `i`.
/// A matrix with no rows has no known width and yields an empty basis.
pub fn right_kernel_basis(a: &Matrix, field: &Field) -> Result<Matrix, IKKCryptoError> {
    let (_, cols) = dimensions(a)?;
    let (reduced, pivots) = rref(a, field)?;
    Ok(kernel_from_reduced(&reduced, &pivots, cols, field))
}

/// Kernel basis of the first `cols` columns of an already reduced matrix.
fn kernel_from_reduced(reduced: &Matrix, pivots: &[usize], cols: usize, field: &Field) -> Matrix {
    let mut is_pivot = vec![false; cols];
    for &p in pivots.iter().filter(|&&p| p < cols) {
        is_pivot[p] = true;
    }

    (0..cols)
        .filter(|&f| !is_pivot[f])
        .map(|f| {
            let mut x = vec![0i64; cols];
            x[f] = 1;
            for (i, &p) in pivots.iter().enumerate() {
                x[p] = field.neg(reduced[i][f]);
            }
            x
        })
        .collect()
}

/// Outcome of reducing an augmented system `[A | b]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolvedSystem {
    /// `rref([A | b])`; the last column holds the reduced right-hand side.
    pub reduced: Matrix,
    /// Pivot columns of the coefficient block.
    pub pivots: Vec<usize>,
    /// Rank of `A`.
    pub rank: usize,
    /// Number of unknowns (columns of `A`).
    pub unknowns: usize,
    /// Particular solution with every free variable set to zero.
    pub solution: Vector,
}

impl SolvedSystem {
    pub fn is_unique(&self) -> bool {
        self.rank == self.unknowns
    }

    /// The block of the reduced system lying in columns `rank..unknowns`,
    /// restricted to its first `rows` rows.
    ///
    /// This is a `rows × (unknowns − rank)` matrix; when the system is
    /// uniquely solvable every row is empty.
    pub fn free_block(&self, rows: usize) -> Matrix {
        self.reduced
            .iter()
            .take(rows)
            .map(|row| row[self.rank..self.unknowns].to_vec())
            .collect()
    }

    /// Basis of the homogeneous solutions `{x : A·x = 0}`, one row per free
    /// unknown. Every solution is `solution + Σ tᵢ·basisᵢ`.
    pub fn null_space(&self, field: &Field) -> Matrix {
        kernel_from_reduced(&self.reduced, &self.pivots, self.unknowns, field)
    }
}

/// Solves `A·x = b` by reducing `[A | b]`.
///
/// # Errors
///
/// * `DimensionMismatch` if `b.len()` differs from the number of rows of `A`.
/// * `Inconsistent` if the right-hand side column becomes a pivot, i.e. the
///   system has no solution.
pub fn solve_augmented(
    a: &Matrix,
    b: &Vector,
    field: &Field,
) -> Result<SolvedSystem, IKKCryptoError> {
    let (rows, cols) = dimensions(a)?;
    if b.len() != rows {
        return Err(IKKCryptoError::DimensionMismatch(format!(
            "Right-hand side length ({}) must match matrix rows ({})",
            b.len(),
            rows
        )));
    }

    let joined: Matrix = a
        .iter()
        .zip(b.iter())
        .map(|(row, &bi)| {
            let mut r = Vec::with_capacity(cols + 1);
            r.extend_from_slice(row);
            r.push(bi);
            r
        })
        .collect();

    let (reduced, pivots) = rref(&joined, field)?;
    if pivots.last() == Some(&cols) {
        return Err(IKKCryptoError::Inconsistent(format!(
            "{}x{} system has no solution",
            rows, cols
        )));
    }

    let mut solution = vec![0i64; cols];
    for (i, &p) in pivots.iter().enumerate() {
        solution[p] = reduced[i][cols];
    }

    Ok(SolvedSystem {
        rank: pivots.len(),
        unknowns: cols,
        reduced,
        pivots,
        solution,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::matrix_ops::{identity_matrix, matrix_vector_mul};

    fn gf(q: u64) -> Field {
        Field::try_with(q).unwrap()
    }

    #[test]
    fn test_rref_known_matrix() {
        let field = gf(7);
        let a = vec![vec![2, 4, 6], vec![1, 3, 5]];
        // R1 / 2 = [1, 2, 3]; R2 - R1 = [0, 1, 2]; R1 - 2 R2 = [1, 0, 6]
        let (reduced, pivots) = rref(&a, &field).unwrap();
        assert_eq!(reduced, vec![vec![1, 0, 6], vec![0, 1, 2]]);
        assert_eq!(pivots, vec![0, 1]);
    }

    #[test]
    fn test_rref_skips_zero_columns() {
        let field = gf(2);
        let a = vec![vec![0, 1, 1, 0], vec![0, 1, 0, 1], vec![0, 0, 1, 1]];
        let (reduced, pivots) = rref(&a, &field).unwrap();
        assert_eq!(pivots, vec![1, 2]);
        assert_eq!(
            reduced,
            vec![vec![0, 1, 0, 1], vec![0, 0, 1, 1], vec![0, 0, 0, 0]]
        );
    }

    #[test]
    fn test_rref_is_deterministic() {
        let field = gf(5);
        let a = vec![vec![3, 1, 4, 1], vec![0, 2, 2, 3], vec![3, 3, 1, 4]];
        assert_eq!(rref(&a, &field).unwrap(), rref(&a, &field).unwrap());
    }

    #[test]
    fn test_kernel_of_known_matrix() {
        let field = gf(7);
        let a = vec![vec![2, 4, 6], vec![1, 3, 5]];
        // rref = [[1, 0, 6], [0, 1, 2]] => x = (-6, -2, 1) = (1, 5, 1)
        let basis = right_kernel_basis(&a, &field).unwrap();
        assert_eq!(basis, vec![vec![1, 5, 1]]);
        assert_eq!(matrix_vector_mul(&a, &basis[0], &field).unwrap(), vec![0, 0]);
    }

    #[test]
    fn test_kernel_of_full_rank_square_is_empty() {
        let field = gf(3);
        assert!(right_kernel_basis(&identity_matrix(4), &field)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_kernel_of_zero_matrix_is_standard_basis() {
        let field = gf(3);
        let basis = right_kernel_basis(&vec![vec![0, 0, 0]], &field).unwrap();
        assert_eq!(basis, identity_matrix(3));
    }

    #[test]
    fn test_solve_unique() {
        let field = gf(11);
        let a = vec![vec![1, 2], vec![3, 4]];
        let x = vec![7, 9];
        let b = matrix_vector_mul(&a, &x, &field).unwrap();
        let solved = solve_augmented(&a, &b, &field).unwrap();
        assert!(solved.is_unique());
        assert_eq!(solved.solution, x);
        assert_eq!(solved.free_block(2), vec![Vec::<i64>::new(), Vec::new()]);
    }

    #[test]
    fn test_solve_underdetermined_reports_rank() {
        let field = gf(5);
        let a = vec![vec![1, 1, 0], vec![0, 0, 1]];
        let b = vec![3, 2];
        let solved = solve_augmented(&a, &b, &field).unwrap();
        assert_eq!(solved.rank, 2);
        assert!(!solved.is_unique());
        assert_eq!(solved.pivots, vec![0, 2]);
        assert_eq!(solved.solution, vec![3, 0, 2]);
        assert_eq!(matrix_vector_mul(&a, &solved.solution, &field).unwrap(), b);
        // columns rank..unknowns = [2..3]
        assert_eq!(solved.free_block(1), vec![vec![0]]);
        // free unknown x1: x0 = 3 - x1
        assert_eq!(solved.null_space(&field), vec![vec![4, 1, 0]]);
    }

    #[test]
    fn test_solve_inconsistent() {
        let field = gf(5);
        let a = vec![vec![1, 2], vec![2, 4]];
        let b = vec![1, 1];
        assert!(matches!(
            solve_augmented(&a, &b, &field),
            Err(IKKCryptoError::Inconsistent(_))
        ));
    }

    #[test]
    fn test_solve_rhs_length_mismatch() {
        let field = gf(5);
        let a = vec![vec![1, 2], vec![2, 4]];
        assert!(matches!(
            solve_augmented(&a, &vec![1, 2, 3], &field),
            Err(IKKCryptoError::DimensionMismatch(_))
        ));
    }
}
