pub use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

pub mod error;
pub mod linalg;
pub mod metrics;
pub mod system;

pub use error::{ConfigurationError, NumericalError, SysRegError, SysResult};
pub use system::{
    CovarianceMatrix, Equation, EquationPool, SigmaSpec, SolverOptions, SysGls, SysResults,
    Weights, WhitenedSystem, WhiteningOperator,
};

pub type Vector = Array1<f64>;
pub type Matrix = Array2<f64>;
