use crate::Matrix;
use crate::error::{NumericalError, SysResult};
use crate::linalg::faer_ndarray::llt_lower;

/// Lower-triangular `L` with `L · Lᵀ = A` for a symmetric positive
/// semi-definite `A`.
///
/// Only the lower triangle of `a` is read. Positive definite input goes
/// straight through faer's LLT. When that rejects a pivot the factorization
/// is redone allowing pivots within `tolerance` (relative to the largest
/// diagonal entry) of zero, which yields a zero column. A negative pivot, or
/// a zero pivot whose column still carries weight below the diagonal, means
/// the input is not semi-definite.
pub fn cholesky_psd(a: &Matrix, tolerance: f64) -> SysResult<Matrix> {
    if let Some(lower) = llt_lower(a) {
        return Ok(lower);
    }
    log::debug!("LLT rejected a pivot, retrying as semi-definite");

    let n = a.nrows();
    let scale = a.diag().iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));
    let tol = tolerance * scale.max(f64::MIN_POSITIVE);

    let mut l = Matrix::zeros((n, n));
    for j in 0..n {
        let mut pivot = a[(j, j)];
        for k in 0..j {
            pivot -= l[(j, k)] * l[(j, k)];
        }

        if pivot < -tol || !pivot.is_finite() {
            return Err(NumericalError::NotPositiveSemiDefinite { index: j, pivot }.into());
        }

        if pivot <= tol {
            for i in (j + 1)..n {
                let mut remainder = a[(i, j)];
                for k in 0..j {
                    remainder -= l[(i, k)] * l[(j, k)];
                }
                if remainder.abs() > tol {
                    return Err(NumericalError::NotPositiveSemiDefinite { index: j, pivot }.into());
                }
            }
            continue;
        }

        let diag = pivot.sqrt();
        l[(j, j)] = diag;
        for i in (j + 1)..n {
            let mut sum = a[(i, j)];
            for k in 0..j {
                sum -= l[(i, k)] * l[(j, k)];
            }
            l[(i, j)] = sum / diag;
        }
    }

    Ok(l)
}
