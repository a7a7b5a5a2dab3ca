use crate::Matrix;
use crate::error::{NumericalError, SysResult};
use crate::linalg::faer_ndarray::thin_svd;

#[derive(Clone, Debug)]
pub struct PseudoInverse {
    pub matrix: Matrix,
    pub rank: usize,
    pub condition_number: f64,
}

impl PseudoInverse {
    pub fn is_full_rank(&self) -> bool {
        self.rank == self.matrix.nrows().min(self.matrix.ncols())
    }
}

/// Pseudo-inverse through the SVD, discarding singular values at or below
/// `rcond · s_max`.
///
/// Rank deficiency is not an error; the result is the minimum-norm
/// least-squares inverse. An input with no singular value above the cutoff
/// is reported as unreliable.
pub fn pinv(a: &Matrix, rcond: f64, what: &'static str) -> SysResult<PseudoInverse> {
    let decomposition = thin_svd(a)?;
    let s = &decomposition.singular_values;
    let s_max = decomposition.max_singular_value();

    let cutoff = rcond * s_max;
    let mut rank = 0;
    let mut s_min_kept = s_max;
    let mut vt_scaled = decomposition.vt;
    for (i, mut row) in vt_scaled.rows_mut().into_iter().enumerate() {
        if s[i] > cutoff && s[i] > 0.0 {
            row /= s[i];
            rank += 1;
            s_min_kept = s_min_kept.min(s[i]);
        } else {
            row.fill(0.0);
        }
    }

    if rank == 0 || !s_max.is_finite() {
        return Err(NumericalError::UnreliablePseudoInverse {
            what,
            rank,
            condition_number: f64::INFINITY,
        }
        .into());
    }

    let matrix = vt_scaled.t().dot(&decomposition.u.t());
    if matrix.iter().any(|x| !x.is_finite()) {
        return Err(NumericalError::NonFiniteResult { what }.into());
    }

    Ok(PseudoInverse {
        matrix,
        rank,
        condition_number: s_max / s_min_kept,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_pinv_of_invertible_matrix_is_inverse() {
        let a = array![[4.0, 1.0], [2.0, 3.0]];
        let p = pinv(&a, 1e-12, "test").unwrap();

        assert_eq!(p.rank, 2);
        assert!(p.is_full_rank());
        let identity = a.dot(&p.matrix);
        for ((i, j), x) in identity.indexed_iter() {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert_abs_diff_eq!(*x, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_pinv_rank_deficient() {
        // duplicated column
        let a = array![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
        let p = pinv(&a, 1e-12, "test").unwrap();

        assert_eq!(p.rank, 1);
        assert!(!p.is_full_rank());
        // A · A⁺ · A = A
        let back = a.dot(&p.matrix).dot(&a);
        for (x, y) in back.iter().zip(a.iter()) {
            assert_abs_diff_eq!(x, y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_pinv_of_wide_matrix() {
        let a = array![[1.0, 0.0, 2.0], [0.0, 1.0, 1.0]];
        let p = pinv(&a, 1e-12, "test").unwrap();

        assert_eq!(p.matrix.shape(), &[3, 2]);
        let identity = a.dot(&p.matrix);
        for ((i, j), x) in identity.indexed_iter() {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert_abs_diff_eq!(*x, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_pinv_of_zero_matrix_is_unreliable() {
        let a = Matrix::zeros((3, 2));
        let err = pinv(&a, 1e-12, "zeros").unwrap_err();

        assert!(matches!(
            err,
            crate::SysRegError::Numerical(NumericalError::UnreliablePseudoInverse { rank: 0, .. })
        ));
    }

    #[test]
    fn test_cutoff_at_or_above_one_is_unreliable() {
        let a = array![[2.0, 0.0], [0.0, 1.0]];
        assert!(pinv(&a, 1.0, "test").unwrap_err().is_numerical());
    }

    #[test]
    fn test_condition_number() {
        let a = array![[10.0, 0.0], [0.0, 0.1]];
        let p = pinv(&a, 1e-12, "test").unwrap();
        assert_abs_diff_eq!(p.condition_number, 100.0, epsilon = 1e-9);
    }
}
