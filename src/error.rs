//! Error taxonomy for system estimation.
//!
//! Failures fall into two groups. `ConfigurationError` covers inputs that
//! are malformed before any arithmetic happens: an empty system, equations
//! with differing observation counts, sigma or weights of the wrong shape,
//! invalid solver options. `NumericalError` covers decompositions that
//! cannot be trusted: a pseudo-inverse of sigma that is not symmetric
//! positive semi-definite, a pseudo-inverse with no usable singular values,
//! or non-finite output.
//! `SysRegError` wraps both and `SysResult<T>` is the alias used across the
//! crate.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    // ---- Equation pool ----
    #[error("system must contain at least one equation")]
    EmptySystem,

    #[error("equation {equation} has no observations")]
    NoObservations { equation: usize },

    #[error("equation {equation} has no regressors")]
    NoRegressors { equation: usize },

    #[error("equation {equation} has {found} observations, expected {expected}")]
    ObservationMismatch {
        equation: usize,
        expected: usize,
        found: usize,
    },

    #[error("equation {equation}: regressors have {rows} rows but the response has {nobs} observations")]
    RegressorRowMismatch {
        equation: usize,
        rows: usize,
        nobs: usize,
    },

    #[error("{what} contains non-finite values")]
    NonFinite { what: &'static str },

    // ---- Sigma / weights ----
    #[error("sigma vector has length {found}, expected {expected}")]
    SigmaLength { expected: usize, found: usize },

    #[error("sigma matrix has shape ({rows}, {cols}), expected ({expected}, {expected})")]
    SigmaShape {
        expected: usize,
        rows: usize,
        cols: usize,
    },

    #[error("sigma has {ndim} dimensions, expected a scalar, vector or matrix")]
    SigmaDimensionality { ndim: usize },

    #[error("weights vector has length {found}, expected {expected}")]
    WeightsLength { expected: usize, found: usize },

    #[error("weights have {ndim} dimensions, expected a scalar or vector")]
    WeightsDimensionality { ndim: usize },

    // ---- Options ----
    #[error("solver option `{name}` is invalid: {value}")]
    InvalidOption { name: &'static str, value: f64 },

    // ---- Whitening ----
    #[error("whitening expects {expected} stacked rows, got {found}")]
    WhitenRowMismatch { expected: usize, found: usize },

    // ---- Metrics ----
    #[error("predictions have length {found}, expected {expected}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("cannot score an empty series")]
    EmptyInput,

    // ---- Prediction ----
    #[error("params has length {found}, expected {expected}")]
    ParamsLength { expected: usize, found: usize },

    #[error("prediction needs regressors for {expected} equations, got {found}")]
    PredictEquationCount { expected: usize, found: usize },

    #[error("equation {equation}: prediction regressors have {found} columns, expected {expected}")]
    PredictColumnMismatch {
        equation: usize,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumericalError {
    #[error("pseudo-inverse of sigma is not positive semi-definite (pivot {pivot:e} at index {index})")]
    NotPositiveSemiDefinite { index: usize, pivot: f64 },

    #[error("pseudo-inverse of sigma is not symmetric (max relative asymmetry {asymmetry:e})")]
    AsymmetricInverse { asymmetry: f64 },

    #[error("SVD did not converge")]
    SvdNoConvergence,

    #[error("pseudo-inverse of {what} is unreliable (rank {rank}, condition number {condition_number:e})")]
    UnreliablePseudoInverse {
        what: &'static str,
        rank: usize,
        condition_number: f64,
    },

    #[error("{what} produced non-finite values")]
    NonFiniteResult { what: &'static str },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SysRegError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("numerical error: {0}")]
    Numerical(#[from] NumericalError),
}

pub type SysResult<T> = Result<T, SysRegError>;

impl SysRegError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, SysRegError::Configuration(_))
    }

    pub fn is_numerical(&self) -> bool {
        matches!(self, SysRegError::Numerical(_))
    }
}
