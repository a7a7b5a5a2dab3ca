//! Dense numerical kernels behind the estimator.
//!
//! This module provides:
//! - `thin_svd`: singular value decomposition through faer
//! - `pinv`: Moore–Penrose pseudo-inverse with rank and condition diagnostics
//! - `cholesky_psd`: Cholesky factorization that tolerates semi-definite input
//!
//! # Examples
//!
//! ```rust
//! use sysreg::linalg::{cholesky_psd, pinv};
//! use ndarray::array;
//!
//! let sigma = array![[2.0, 0.5], [0.5, 1.0]];
//! let inverse = pinv(&sigma, 1e-12, "sigma").unwrap();
//! assert_eq!(inverse.rank, 2);
//!
//! let l = cholesky_psd(&inverse.matrix, 1e-10).unwrap();
//! let back = l.dot(&l.t());
//! assert!((back[(0, 1)] - inverse.matrix[(0, 1)]).abs() < 1e-12);
//! ```

mod cholesky;
mod faer_ndarray;
mod pinv;

pub use cholesky::cholesky_psd;
pub use faer_ndarray::{Svd, thin_svd};
pub use pinv::{PseudoInverse, pinv};
