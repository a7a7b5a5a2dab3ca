use crate::error::{ConfigurationError, SysResult};
use crate::linalg::{PseudoInverse, pinv};
use crate::system::covariance::{CovarianceMatrix, SigmaSpec, Weights};
use crate::system::equation::{Equation, EquationPool, unstack};
use crate::system::options::SolverOptions;
use crate::system::results::SysResults;
use crate::system::whitening::WhiteningOperator;
use crate::{Matrix, Vector};

/// Generalized least squares for a system of equations.
///
/// WLS and OLS are the same estimator with a diagonal or identity sigma;
/// see [`SysGls::wls`] and [`SysGls::ols`].
#[derive(Clone, Debug)]
pub struct SysGls {
    pool: EquationPool,
    sigma: CovarianceMatrix,
    options: SolverOptions,
}

impl SysGls {
    pub fn new(equations: Vec<Equation>, sigma: impl Into<SigmaSpec>) -> SysResult<Self> {
        Self::with_options(equations, sigma, SolverOptions::default())
    }

    pub fn with_options(
        equations: Vec<Equation>,
        sigma: impl Into<SigmaSpec>,
        options: SolverOptions,
    ) -> SysResult<Self> {
        options.validate()?;
        let pool = EquationPool::new(equations)?;
        Self::from_pool(pool, &sigma.into(), options)
    }

    pub fn wls(equations: Vec<Equation>, weights: impl Into<Weights>) -> SysResult<Self> {
        Self::wls_with_options(equations, weights, SolverOptions::default())
    }

    pub fn wls_with_options(
        equations: Vec<Equation>,
        weights: impl Into<Weights>,
        options: SolverOptions,
    ) -> SysResult<Self> {
        options.validate()?;
        let pool = EquationPool::new(equations)?;
        let sigma = weights.into().to_sigma(pool.neqs())?;
        Self::from_pool(pool, &sigma, options)
    }

    pub fn ols(equations: Vec<Equation>) -> SysResult<Self> {
        Self::wls(equations, Weights::Scalar(1.0))
    }

    pub fn ols_with_options(equations: Vec<Equation>, options: SolverOptions) -> SysResult<Self> {
        Self::wls_with_options(equations, Weights::Scalar(1.0), options)
    }

    fn from_pool(pool: EquationPool, sigma: &SigmaSpec, options: SolverOptions) -> SysResult<Self> {
        let sigma = CovarianceMatrix::resolve(sigma, pool.neqs())?;
        Ok(Self {
            pool,
            sigma,
            options,
        })
    }

    pub fn pool(&self) -> &EquationPool {
        &self.pool
    }

    pub fn sigma(&self) -> &CovarianceMatrix {
        &self.sigma
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    pub fn neqs(&self) -> usize {
        self.pool.neqs()
    }

    pub fn nobs(&self) -> usize {
        self.pool.nobs()
    }

    /// Builds the whitening operator, whitens the pooled data and
    /// pseudo-inverts the whitened design.
    pub fn whiten(&self) -> SysResult<WhitenedSystem<'_>> {
        let operator = WhiteningOperator::new(&self.sigma, self.pool.nobs(), &self.options)?;
        let wexog = operator.apply(self.pool.sp_exog())?;
        let wendog = operator.apply_vector(&self.pool.stacked_endog())?;

        let pinv_wexog = pinv(&wexog, self.options.get_rcond(), "whitened design")?;
        if !pinv_wexog.is_full_rank() {
            log::warn!(
                "whitened design is rank deficient (rank {} of {} columns, condition number {:e}), using the minimum-norm solution",
                pinv_wexog.rank,
                wexog.ncols(),
                pinv_wexog.condition_number
            );
        } else {
            log::debug!(
                "whitened design has full rank {} (condition number {:e})",
                pinv_wexog.rank,
                pinv_wexog.condition_number
            );
        }

        Ok(WhitenedSystem {
            model: self,
            operator,
            wexog,
            wendog,
            pinv_wexog,
        })
    }

    pub fn fit(&self) -> SysResult<SysResults<'_>> {
        Ok(self.whiten()?.fit())
    }

    /// Fitted values, one row per equation.
    ///
    /// Without `exog` the model's own regressors are used. New regressors
    /// must supply one matrix per equation with that equation's column count.
    pub fn predict(&self, params: &Vector, exog: Option<&[Matrix]>) -> SysResult<Matrix> {
        if params.len() != self.pool.ncols() {
            return Err(ConfigurationError::ParamsLength {
                expected: self.pool.ncols(),
                found: params.len(),
            }
            .into());
        }
        if params.iter().any(|x| !x.is_finite()) {
            return Err(ConfigurationError::NonFinite { what: "params" }.into());
        }

        let stacked = match exog {
            Some(exogs) => self.pool.block_design(exogs)?.dot(params),
            None => self.pool.sp_exog().dot(params),
        };
        let nobs = stacked.len() / self.neqs();
        Ok(unstack(&stacked, self.neqs(), nobs))
    }
}

/// A model whose data has been whitened and whose design has been
/// pseudo-inverted. Fitting from here is pure and cannot fail.
#[derive(Clone, Debug)]
pub struct WhitenedSystem<'a> {
    model: &'a SysGls,
    operator: WhiteningOperator,
    wexog: Matrix,
    wendog: Vector,
    pinv_wexog: PseudoInverse,
}

impl<'a> WhitenedSystem<'a> {
    pub fn model(&self) -> &'a SysGls {
        self.model
    }

    pub fn operator(&self) -> &WhiteningOperator {
        &self.operator
    }

    pub fn wexog(&self) -> &Matrix {
        &self.wexog
    }

    pub fn wendog(&self) -> &Vector {
        &self.wendog
    }

    pub fn pinv_wexog(&self) -> &Matrix {
        &self.pinv_wexog.matrix
    }

    pub fn rank(&self) -> usize {
        self.pinv_wexog.rank
    }

    pub fn condition_number(&self) -> f64 {
        self.pinv_wexog.condition_number
    }

    pub fn fit(&self) -> SysResults<'a> {
        let p = &self.pinv_wexog.matrix;
        let params = p.dot(&self.wendog);
        let normalized_cov_params = p.dot(&p.t());
        SysResults::new(self.model, params, normalized_cov_params, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SysRegError;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn system() -> Vec<Equation> {
        vec![
            Equation::new(
                array![3.1, 4.9, 7.2, 8.8, 11.1],
                array![
                    [1.0, 1.0],
                    [1.0, 2.0],
                    [1.0, 3.0],
                    [1.0, 4.0],
                    [1.0, 5.0]
                ],
            ),
            Equation::new(
                array![0.9, 2.2, 2.8, 4.1, 5.0],
                array![[1.0], [2.0], [3.0], [4.0], [5.0]],
            ),
        ]
    }

    #[test]
    fn test_ols_fit_shapes() {
        let model = SysGls::ols(system()).unwrap();
        let results = model.fit().unwrap();

        assert_eq!(results.params().len(), 3);
        assert_eq!(results.normalized_cov_params().shape(), &[3, 3]);
        assert_eq!(results.scale(), 1.0);
        assert_eq!(results.model().neqs(), 2);
    }

    #[test]
    fn test_ols_matches_single_equation_fit() {
        let model = SysGls::ols(system()).unwrap();
        let results = model.fit().unwrap();

        let single_model = SysGls::ols(vec![system().remove(1)]).unwrap();
        let single = single_model.fit().unwrap();
        assert_abs_diff_eq!(results.params()[2], single.params()[0], epsilon = 1e-10);
    }

    #[test]
    fn test_fit_is_repeatable() {
        let model = SysGls::new(system(), array![[1.0, 0.4], [0.4, 2.0]]).unwrap();
        let whitened = model.whiten().unwrap();

        let first = whitened.fit();
        let second = whitened.fit();
        assert_eq!(first.params(), second.params());
        assert_eq!(first.normalized_cov_params(), second.normalized_cov_params());

        let refit = model.fit().unwrap();
        for (a, b) in refit.params().iter().zip(first.params().iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_normalized_cov_is_symmetric() {
        let model = SysGls::new(system(), array![[1.0, 0.4], [0.4, 2.0]]).unwrap();
        let cov = model.fit().unwrap().normalized_cov_params().clone();

        for ((i, j), x) in cov.indexed_iter() {
            assert_abs_diff_eq!(*x, cov[(j, i)], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_wls_vector_weights_wrong_length() {
        let err = SysGls::wls(system(), array![1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(
            err,
            SysRegError::Configuration(ConfigurationError::WeightsLength {
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn test_invalid_sigma_fails_before_whitening() {
        let err = SysGls::new(system(), Matrix::eye(3)).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_invalid_options_rejected() {
        let options = SolverOptions::new().rcond(-1.0);
        assert!(SysGls::ols_with_options(system(), options).unwrap_err().is_configuration());
    }

    #[test]
    fn test_whitened_system_is_consistent() {
        let model = SysGls::new(system(), array![[1.0, 0.4], [0.4, 2.0]]).unwrap();
        let whitened = model.whiten().unwrap();

        let full = whitened.operator().to_matrix();
        for (a, b) in full.dot(model.pool().sp_exog()).iter().zip(whitened.wexog().iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
        let wendog = full.dot(&model.pool().stacked_endog());
        for (a, b) in wendog.iter().zip(whitened.wendog().iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }

        let params = whitened.pinv_wexog().dot(whitened.wendog());
        assert_eq!(&params, whitened.fit().params());
        assert_eq!(whitened.rank(), 3);
        assert!(whitened.condition_number() >= 1.0);
        assert!(std::ptr::eq(whitened.model(), &model));
    }

    #[test]
    fn test_asymmetric_sigma_fails_at_whitening() {
        let model = SysGls::new(system(), array![[1.0, 0.5], [0.1, 1.0]]).unwrap();
        assert!(matches!(
            model.fit().unwrap_err(),
            SysRegError::Numerical(crate::NumericalError::AsymmetricInverse { .. })
        ));
    }

    #[test]
    fn test_non_psd_sigma_fails_at_whitening() {
        let model = SysGls::new(system(), array![[1.0, 2.0], [2.0, 1.0]]).unwrap();
        assert!(model.whiten().unwrap_err().is_numerical());
        assert!(model.fit().unwrap_err().is_numerical());
    }

    #[test]
    fn test_collinear_design_gives_minimum_norm_solution() {
        // second regressor duplicates the first
        let eqs = vec![Equation::new(
            array![2.0, 4.0, 6.0],
            array![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0]],
        )];
        let model = SysGls::ols(eqs).unwrap();
        let whitened = model.whiten().unwrap();
        assert_eq!(whitened.rank(), 1);

        let results = whitened.fit();
        assert_abs_diff_eq!(results.params()[0], 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(results.params()[1], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_zero_design_is_unreliable() {
        let eqs = vec![Equation::new(array![1.0, 2.0], Matrix::zeros((2, 2)))];
        let model = SysGls::ols(eqs).unwrap();

        let err = model.fit().unwrap_err();
        assert!(matches!(
            err,
            SysRegError::Numerical(crate::NumericalError::UnreliablePseudoInverse { rank: 0, .. })
        ));
    }

    #[test]
    fn test_predict_in_and_out_of_sample() {
        let model = SysGls::ols(system()).unwrap();
        let params = array![1.0, 2.0, 0.5];

        let fitted = model.predict(&params, None).unwrap();
        assert_eq!(fitted.shape(), &[2, 5]);
        assert_abs_diff_eq!(fitted[(0, 0)], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fitted[(1, 4)], 2.5, epsilon = 1e-12);

        let new_exog = vec![array![[1.0, 10.0], [1.0, 20.0]], array![[4.0], [8.0]]];
        let forecast = model.predict(&params, Some(new_exog.as_slice())).unwrap();
        assert_eq!(forecast, array![[21.0, 41.0], [2.0, 4.0]]);
    }

    #[test]
    fn test_predict_wrong_params_length() {
        let model = SysGls::ols(system()).unwrap();
        let err = model.predict(&array![1.0, 2.0], None).unwrap_err();
        assert!(err.is_configuration());
    }
}
