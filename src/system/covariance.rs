use ndarray::{ArrayD, Ix1, Ix2};

use crate::error::{ConfigurationError, SysResult};
use crate::{Matrix, Vector};

#[derive(Clone, Debug, PartialEq, Default)]
pub enum SigmaSpec {
    /// No scaling; resolves to the identity (OLS).
    #[default]
    Absent,
    Scalar(f64),
    Vector(Vector),
    Matrix(Matrix),
}

impl SigmaSpec {
    pub fn from_array(array: ArrayD<f64>) -> SysResult<Self> {
        match array.ndim() {
            0 => Ok(SigmaSpec::Scalar(array.iter().next().copied().unwrap_or(0.0))),
            1 => array
                .into_dimensionality::<Ix1>()
                .map(SigmaSpec::Vector)
                .map_err(|_| ConfigurationError::SigmaDimensionality { ndim: 1 }.into()),
            2 => array
                .into_dimensionality::<Ix2>()
                .map(SigmaSpec::Matrix)
                .map_err(|_| ConfigurationError::SigmaDimensionality { ndim: 2 }.into()),
            ndim => Err(ConfigurationError::SigmaDimensionality { ndim }.into()),
        }
    }
}

impl From<f64> for SigmaSpec {
    fn from(s: f64) -> Self {
        SigmaSpec::Scalar(s)
    }
}

impl From<Vector> for SigmaSpec {
    fn from(v: Vector) -> Self {
        SigmaSpec::Vector(v)
    }
}

impl From<Matrix> for SigmaSpec {
    fn from(m: Matrix) -> Self {
        SigmaSpec::Matrix(m)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Weights {
    Scalar(f64),
    Vector(Vector),
}

impl Weights {
    pub fn from_array(array: ArrayD<f64>) -> SysResult<Self> {
        let ndim = array.ndim();
        match SigmaSpec::from_array(array) {
            Ok(SigmaSpec::Scalar(w)) => Ok(Weights::Scalar(w)),
            Ok(SigmaSpec::Vector(v)) => Ok(Weights::Vector(v)),
            _ => Err(ConfigurationError::WeightsDimensionality { ndim }.into()),
        }
    }

    pub fn to_sigma(&self, neqs: usize) -> SysResult<SigmaSpec> {
        match self {
            Weights::Scalar(w) => Ok(SigmaSpec::Scalar(*w)),
            Weights::Vector(v) if v.len() == neqs => Ok(SigmaSpec::Vector(v.clone())),
            Weights::Vector(v) => Err(ConfigurationError::WeightsLength {
                expected: neqs,
                found: v.len(),
            }
            .into()),
        }
    }
}

impl Default for Weights {
    fn default() -> Self {
        Weights::Scalar(1.0)
    }
}

impl From<f64> for Weights {
    fn from(w: f64) -> Self {
        Weights::Scalar(w)
    }
}

impl From<Vector> for Weights {
    fn from(v: Vector) -> Self {
        Weights::Vector(v)
    }
}

/// Canonical `G × G` contemporaneous covariance. Symmetry is checked on its
/// pseudo-inverse when the whitening operator is built.
#[derive(Clone, Debug, PartialEq)]
pub struct CovarianceMatrix {
    matrix: Matrix,
}

impl CovarianceMatrix {
    pub fn resolve(spec: &SigmaSpec, neqs: usize) -> SysResult<Self> {
        let matrix = match spec {
            SigmaSpec::Absent => Matrix::eye(neqs),
            SigmaSpec::Scalar(s) => Matrix::eye(neqs) * *s,
            SigmaSpec::Vector(v) => {
                if v.len() != neqs {
                    return Err(ConfigurationError::SigmaLength {
                        expected: neqs,
                        found: v.len(),
                    }
                    .into());
                }
                Matrix::from_diag(v)
            }
            SigmaSpec::Matrix(m) => {
                if m.dim() != (neqs, neqs) {
                    return Err(ConfigurationError::SigmaShape {
                        expected: neqs,
                        rows: m.nrows(),
                        cols: m.ncols(),
                    }
                    .into());
                }
                m.clone()
            }
        };

        if matrix.iter().any(|x| !x.is_finite()) {
            return Err(ConfigurationError::NonFinite { what: "sigma" }.into());
        }

        log::debug!("resolved {}x{} sigma from {} input", neqs, neqs, kind(spec));

        Ok(Self { matrix })
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn neqs(&self) -> usize {
        self.matrix.nrows()
    }
}

fn kind(spec: &SigmaSpec) -> &'static str {
    match spec {
        SigmaSpec::Absent => "absent",
        SigmaSpec::Scalar(_) => "scalar",
        SigmaSpec::Vector(_) => "vector",
        SigmaSpec::Matrix(_) => "matrix",
    }
}
