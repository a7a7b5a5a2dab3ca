use ndarray::s;

use crate::error::{ConfigurationError, NumericalError, SysResult};
use crate::linalg::{cholesky_psd, pinv};
use crate::system::covariance::CovarianceMatrix;
use crate::system::options::SolverOptions;
use crate::{Matrix, Vector};

/// Whitening transform `Lᵀ ⊗ I_N`, where `L · Lᵀ = pinv(Σ)`.
///
/// Stacked data is laid out equation by equation, `N` rows each. The
/// operator combines rows of different equations that share an observation
/// index and never mixes observation indices.
#[derive(Clone, Debug)]
pub struct WhiteningOperator {
    factor: Matrix,
    nobs: usize,
    sigma_rank: usize,
}

impl WhiteningOperator {
    pub fn new(sigma: &CovarianceMatrix, nobs: usize, options: &SolverOptions) -> SysResult<Self> {
        let inverse = pinv(sigma.matrix(), options.get_rcond(), "sigma")?;
        let asymmetry = relative_asymmetry(&inverse.matrix);
        if asymmetry > options.get_symmetry_tolerance() {
            return Err(NumericalError::AsymmetricInverse { asymmetry }.into());
        }
        if !inverse.is_full_rank() {
            log::warn!(
                "sigma is singular (rank {} of {}), whitening onto its range",
                inverse.rank,
                sigma.neqs()
            );
        }

        let lower = cholesky_psd(&inverse.matrix, options.get_psd_tolerance())?;
        log::debug!(
            "built whitening operator for {} equations x {} observations",
            sigma.neqs(),
            nobs
        );

        Ok(Self {
            factor: lower.reversed_axes(),
            nobs,
            sigma_rank: inverse.rank,
        })
    }

    pub fn factor(&self) -> &Matrix {
        &self.factor
    }

    pub fn neqs(&self) -> usize {
        self.factor.nrows()
    }

    pub fn nobs(&self) -> usize {
        self.nobs
    }

    pub fn sigma_rank(&self) -> usize {
        self.sigma_rank
    }

    pub fn to_matrix(&self) -> Matrix {
        ndarray::linalg::kron(&self.factor, &Matrix::eye(self.nobs))
    }

    pub fn apply(&self, x: &Matrix) -> SysResult<Matrix> {
        self.check_rows(x.nrows())?;
        let n = self.nobs;

        let mut out = Matrix::zeros(x.raw_dim());
        for i in 0..self.neqs() {
            let mut block = out.slice_mut(s![i * n..(i + 1) * n, ..]);
            for j in 0..self.neqs() {
                let w = self.factor[(i, j)];
                if w != 0.0 {
                    block.scaled_add(w, &x.slice(s![j * n..(j + 1) * n, ..]));
                }
            }
        }
        Ok(out)
    }

    pub fn apply_vector(&self, y: &Vector) -> SysResult<Vector> {
        self.check_rows(y.len())?;
        let n = self.nobs;

        let mut out = Vector::zeros(y.len());
        for i in 0..self.neqs() {
            let mut block = out.slice_mut(s![i * n..(i + 1) * n]);
            for j in 0..self.neqs() {
                let w = self.factor[(i, j)];
                if w != 0.0 {
                    block.scaled_add(w, &y.slice(s![j * n..(j + 1) * n]));
                }
            }
        }
        Ok(out)
    }

    fn check_rows(&self, rows: usize) -> SysResult<()> {
        let expected = self.neqs() * self.nobs;
        if rows != expected {
            return Err(ConfigurationError::WhitenRowMismatch {
                expected,
                found: rows,
            }
            .into());
        }
        Ok(())
    }
}

fn relative_asymmetry(m: &Matrix) -> f64 {
    let scale = m.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));
    if scale == 0.0 {
        return 0.0;
    }
    let mut worst = 0.0_f64;
    for ((i, j), x) in m.indexed_iter() {
        if i < j {
            worst = worst.max((x - m[(j, i)]).abs());
        }
    }
    worst / scale
}
