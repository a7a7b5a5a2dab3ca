use ndarray::{ArrayView1, s};

use crate::error::SysResult;
use crate::metrics;
use crate::system::equation::unstack;
use crate::system::model::SysGls;
use crate::{Matrix, Vector};

#[derive(Clone, Debug)]
pub struct SysResults<'a> {
    model: &'a SysGls,
    params: Vector,
    normalized_cov_params: Matrix,
    scale: f64,
}

impl<'a> SysResults<'a> {
    pub fn new(
        model: &'a SysGls,
        params: Vector,
        normalized_cov_params: Matrix,
        scale: f64,
    ) -> Self {
        Self {
            model,
            params,
            normalized_cov_params,
            scale,
        }
    }

    pub fn model(&self) -> &'a SysGls {
        self.model
    }

    pub fn params(&self) -> &Vector {
        &self.params
    }

    pub fn normalized_cov_params(&self) -> &Matrix {
        &self.normalized_cov_params
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn cov_params(&self) -> Matrix {
        &self.normalized_cov_params * self.scale
    }

    pub fn equation_params(&self, i: usize) -> Option<ArrayView1<'_, f64>> {
        if i >= self.model.neqs() {
            return None;
        }
        let cols = self.model.pool().column_range(i);
        Some(self.params.slice(s![cols.start..cols.end]))
    }

    pub fn fitted_values(&self) -> Matrix {
        let pool = self.model.pool();
        let stacked = pool.sp_exog().dot(&self.params);
        unstack(&stacked, pool.neqs(), pool.nobs())
    }

    pub fn residuals(&self) -> Matrix {
        self.model.pool().endog() - &self.fitted_values()
    }

    /// Contemporaneous residual covariance `E · Eᵀ / N`.
    ///
    /// Can be passed back as a full sigma for a second-stage fit.
    pub fn residual_covariance(&self) -> Matrix {
        let resid = self.residuals();
        resid.dot(&resid.t()) / self.model.nobs() as f64
    }

    pub fn r_squared(&self) -> SysResult<Vector> {
        let endog = self.model.pool().endog();
        let fitted = self.fitted_values();
        let scores = endog
            .rows()
            .into_iter()
            .zip(fitted.rows())
            .map(|(y, f)| metrics::r2_score(y, f))
            .collect::<SysResult<Vec<f64>>>()?;
        Ok(Vector::from(scores))
    }

    pub fn mse(&self) -> SysResult<Vector> {
        let endog = self.model.pool().endog();
        let fitted = self.fitted_values();
        let scores = endog
            .rows()
            .into_iter()
            .zip(fitted.rows())
            .map(|(y, f)| metrics::mean_squared_error(y, f))
            .collect::<SysResult<Vec<f64>>>()?;
        Ok(Vector::from(scores))
    }
}
