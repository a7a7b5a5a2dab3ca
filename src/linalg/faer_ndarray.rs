use dyn_stack::{MemBuffer, MemStack};
use faer::diag::{Diag, DiagRef};
use faer::linalg::svd::{self, ComputeSvdVectors};
use faer::{Mat, MatRef, Par, Side, get_global_parallelism};
use ndarray::{ArrayBase, Data, Ix2};

use crate::error::{NumericalError, SysResult};
use crate::{Matrix, Vector};

/// Thin singular value decomposition `A = U · diag(S) · Vᵀ`.
///
/// For an `m × n` input, `u` is `m × k`, `singular_values` has length `k`
/// and `vt` is `k × n`, with `k = min(m, n)`. Singular values are sorted in
/// non-increasing order.
#[derive(Clone, Debug)]
pub struct Svd {
    pub u: Matrix,
    pub singular_values: Vector,
    pub vt: Matrix,
}

impl Svd {
    pub fn max_singular_value(&self) -> f64 {
        self.singular_values.iter().cloned().fold(0.0, f64::max)
    }
}

#[inline]
fn parallelism(rows: usize, cols: usize) -> Par {
    if rows < 128 || cols < 128 {
        Par::Seq
    } else {
        get_global_parallelism()
    }
}

fn array_to_mat<S: Data<Elem = f64>>(array: &ArrayBase<S, Ix2>) -> Mat<f64> {
    Mat::from_fn(array.nrows(), array.ncols(), |i, j| array[(i, j)])
}

fn mat_to_array(mat: MatRef<'_, f64>) -> Matrix {
    let mut out = Matrix::zeros((mat.nrows(), mat.ncols()));
    for j in 0..mat.ncols() {
        for i in 0..mat.nrows() {
            out[(i, j)] = mat[(i, j)];
        }
    }
    out
}

fn diag_to_array(diag: DiagRef<'_, f64>) -> Vector {
    let mat = diag.column_vector().as_mat();
    let mut out = Vector::zeros(mat.nrows());
    for i in 0..mat.nrows() {
        out[i] = mat[(i, 0)];
    }
    out
}

pub fn thin_svd<S: Data<Elem = f64>>(a: &ArrayBase<S, Ix2>) -> SysResult<Svd> {
    if a.iter().any(|x| !x.is_finite()) {
        return Err(NumericalError::NonFiniteResult { what: "SVD input" }.into());
    }

    let (rows, cols) = a.dim();
    let k = rows.min(cols);
    let mat = array_to_mat(a);

    let mut singular = Diag::<f64>::zeros(k);
    let mut u = Mat::<f64>::zeros(rows, k);
    let mut v = Mat::<f64>::zeros(cols, k);

    let par = parallelism(rows, cols);
    let mut mem = MemBuffer::new(svd::svd_scratch::<f64>(
        rows,
        cols,
        ComputeSvdVectors::Thin,
        ComputeSvdVectors::Thin,
        par,
        Default::default(),
    ));
    let stack = MemStack::new(&mut mem);

    svd::svd(
        mat.as_ref(),
        singular.as_mut(),
        Some(u.as_mut()),
        Some(v.as_mut()),
        par,
        stack,
        Default::default(),
    )
    .map_err(|_| NumericalError::SvdNoConvergence)?;

    Ok(Svd {
        u: mat_to_array(u.as_ref()),
        singular_values: diag_to_array(singular.as_ref()),
        vt: mat_to_array(v.as_ref().transpose()),
    })
}

/// Lower Cholesky factor of a symmetric positive definite matrix, or `None`
/// when faer rejects a pivot. Only the lower triangle is read.
pub fn llt_lower<S: Data<Elem = f64>>(a: &ArrayBase<S, Ix2>) -> Option<Matrix> {
    let mat = array_to_mat(a);
    let factor = mat.as_ref().llt(Side::Lower).ok()?;
    let lower = mat_to_array(factor.L());
    lower.iter().all(|x| x.is_finite()).then_some(lower)
}
