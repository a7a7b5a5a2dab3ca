use std::ops::Range;

use ndarray::s;

use crate::error::{ConfigurationError, SysResult};
use crate::{Matrix, Vector};

#[derive(Clone, Debug, PartialEq)]
pub struct Equation {
    pub endog: Vector,
    pub exog: Matrix,
}

impl Equation {
    pub fn new(endog: Vector, exog: Matrix) -> Self {
        Self { endog, exog }
    }

    pub fn nobs(&self) -> usize {
        self.endog.len()
    }

    pub fn nregressors(&self) -> usize {
        self.exog.ncols()
    }
}

/// Pooled, immutable representation of a system of equations.
///
/// - `endog`: `G × N`, row `i` is equation `i`'s response.
/// - `exog`: `N × ΣK_i`, the regressor matrices side by side.
/// - `sp_exog`: `(G·N) × ΣK_i` block-diagonal design; equation `i` occupies
///   rows `[iN, (i+1)N)` and its own column block.
#[derive(Clone, Debug)]
pub struct EquationPool {
    equations: Vec<Equation>,
    offsets: Vec<usize>,
    nobs: usize,
    endog: Matrix,
    exog: Matrix,
    sp_exog: Matrix,
}

impl EquationPool {
    pub fn new(equations: Vec<Equation>) -> SysResult<Self> {
        let first = equations.first().ok_or(ConfigurationError::EmptySystem)?;
        let nobs = first.nobs();
        if nobs == 0 {
            return Err(ConfigurationError::NoObservations { equation: 0 }.into());
        }

        let mut offsets = Vec::with_capacity(equations.len() + 1);
        offsets.push(0);
        for (i, eq) in equations.iter().enumerate() {
            if eq.nobs() != nobs {
                return Err(ConfigurationError::ObservationMismatch {
                    equation: i,
                    expected: nobs,
                    found: eq.nobs(),
                }
                .into());
            }
            if eq.exog.nrows() != nobs {
                return Err(ConfigurationError::RegressorRowMismatch {
                    equation: i,
                    rows: eq.exog.nrows(),
                    nobs,
                }
                .into());
            }
            if eq.nregressors() == 0 {
                return Err(ConfigurationError::NoRegressors { equation: i }.into());
            }
            if eq.endog.iter().any(|x| !x.is_finite()) {
                return Err(ConfigurationError::NonFinite { what: "response" }.into());
            }
            if eq.exog.iter().any(|x| !x.is_finite()) {
                return Err(ConfigurationError::NonFinite { what: "regressors" }.into());
            }
            offsets.push(offsets[i] + eq.nregressors());
        }

        let neqs = equations.len();
        let total_cols = offsets[neqs];

        let mut endog = Matrix::zeros((neqs, nobs));
        let mut exog = Matrix::zeros((nobs, total_cols));
        for (i, eq) in equations.iter().enumerate() {
            endog.row_mut(i).assign(&eq.endog);
            exog.slice_mut(s![.., offsets[i]..offsets[i + 1]])
                .assign(&eq.exog);
        }

        let exogs: Vec<&Matrix> = equations.iter().map(|eq| &eq.exog).collect();
        let sp_exog = block_diag(&exogs, nobs, &offsets);

        log::debug!(
            "built equation pool: {} equations, {} observations, {} regressors",
            neqs,
            nobs,
            total_cols
        );

        Ok(Self {
            equations,
            offsets,
            nobs,
            endog,
            exog,
            sp_exog,
        })
    }

    pub fn neqs(&self) -> usize {
        self.equations.len()
    }

    pub fn nobs(&self) -> usize {
        self.nobs
    }

    pub fn ncols(&self) -> usize {
        self.offsets[self.neqs()]
    }

    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    pub fn endog(&self) -> &Matrix {
        &self.endog
    }

    pub fn exog(&self) -> &Matrix {
        &self.exog
    }

    pub fn sp_exog(&self) -> &Matrix {
        &self.sp_exog
    }

    pub fn column_range(&self, i: usize) -> Range<usize> {
        self.offsets[i]..self.offsets[i + 1]
    }

    pub fn stacked_endog(&self) -> Vector {
        self.endog.iter().cloned().collect()
    }

    /// Block-diagonal design for new regressors with this pool's column layout.
    ///
    /// Every matrix must have the same row count and match its equation's
    /// regressor count.
    pub fn block_design(&self, exogs: &[Matrix]) -> SysResult<Matrix> {
        if exogs.len() != self.neqs() {
            return Err(ConfigurationError::PredictEquationCount {
                expected: self.neqs(),
                found: exogs.len(),
            }
            .into());
        }

        let nobs = exogs[0].nrows();
        for (i, x) in exogs.iter().enumerate() {
            let expected = self.offsets[i + 1] - self.offsets[i];
            if x.ncols() != expected {
                return Err(ConfigurationError::PredictColumnMismatch {
                    equation: i,
                    expected,
                    found: x.ncols(),
                }
                .into());
            }
            if x.nrows() != nobs {
                return Err(ConfigurationError::ObservationMismatch {
                    equation: i,
                    expected: nobs,
                    found: x.nrows(),
                }
                .into());
            }
            if x.iter().any(|v| !v.is_finite()) {
                return Err(ConfigurationError::NonFinite { what: "regressors" }.into());
            }
        }

        let refs: Vec<&Matrix> = exogs.iter().collect();
        Ok(block_diag(&refs, nobs, &self.offsets))
    }
}

pub(crate) fn unstack(stacked: &Vector, neqs: usize, nobs: usize) -> Matrix {
    Matrix::from_shape_fn((neqs, nobs), |(i, t)| stacked[i * nobs + t])
}

fn block_diag(blocks: &[&Matrix], nobs: usize, offsets: &[usize]) -> Matrix {
    let neqs = blocks.len();
    let mut out = Matrix::zeros((neqs * nobs, offsets[neqs]));
    for (i, block) in blocks.iter().enumerate() {
        out.slice_mut(s![i * nobs..(i + 1) * nobs, offsets[i]..offsets[i + 1]])
            .assign(*block);
    }
    out
}
