//! Estimation of systems of linear regression equations.
//!
//! This module provides:
//! - `EquationPool`: stacks per-equation responses and regressors into a
//!   block-diagonal system design
//! - `CovarianceMatrix`: resolves an absent, scalar, vector or matrix sigma
//!   into a canonical contemporaneous covariance
//! - `WhiteningOperator`: the `Lᵀ ⊗ I_N` transform built from the
//!   pseudo-inverse of sigma
//! - `SysGls`: the GLS estimator, with `wls` and `ols` constructors
//! - `SysResults`: parameters, their normalized covariance and scale
//!
//! # Examples
//!
//! ## Generalized least squares
//! ```rust
//! use sysreg::{Equation, SysGls};
//! use ndarray::array;
//!
//! let eq1 = Equation::new(
//!     array![1.0, 3.0, 5.0, 7.0],
//!     array![[1.0, 0.0], [1.0, 1.0], [1.0, 2.0], [1.0, 3.0]],
//! );
//! let eq2 = Equation::new(array![2.0, 4.0, 6.0, 8.0], array![[1.0], [2.0], [3.0], [4.0]]);
//!
//! let sigma = array![[1.0, 0.3], [0.3, 2.0]];
//! let model = SysGls::new(vec![eq1, eq2], sigma).unwrap();
//! let results = model.fit().unwrap();
//!
//! // y1 = 1 + 2x, y2 = 2x
//! assert!((results.params()[0] - 1.0).abs() < 1e-8);
//! assert!((results.params()[1] - 2.0).abs() < 1e-8);
//! assert!((results.params()[2] - 2.0).abs() < 1e-8);
//! ```
//!
//! ## Weighted and ordinary least squares
//! ```rust
//! use sysreg::{Equation, SysGls};
//! use ndarray::array;
//!
//! let system = vec![
//!     Equation::new(array![1.1, 1.9, 3.2], array![[1.0], [2.0], [3.0]]),
//!     Equation::new(array![0.4, 1.1, 1.4], array![[1.0], [2.0], [3.0]]),
//! ];
//!
//! let wls = SysGls::wls(system.clone(), array![1.0, 4.0]).unwrap();
//! let ols = SysGls::ols(system).unwrap();
//!
//! let whitened = wls.whiten().unwrap();
//! assert_eq!(whitened.rank(), 2);
//! let wls_params = whitened.fit().params().clone();
//! let ols_params = ols.fit().unwrap().params().clone();
//!
//! // without cross-equation correlation the weights do not change the estimates
//! assert!((wls_params[0] - ols_params[0]).abs() < 1e-10);
//! ```

mod covariance;
mod equation;
mod model;
mod options;
mod results;
mod whitening;

pub use covariance::{CovarianceMatrix, SigmaSpec, Weights};
pub use equation::{Equation, EquationPool};
pub use model::{SysGls, WhitenedSystem};
pub use options::SolverOptions;
pub use results::SysResults;
pub use whitening::WhiteningOperator;
