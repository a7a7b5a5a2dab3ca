use crate::error::{ConfigurationError, SysResult};

#[derive(Clone, Debug, PartialEq)]
pub struct SolverOptions {
    rcond: f64,
    psd_tolerance: f64,
    symmetry_tolerance: f64,
}

impl SolverOptions {
    pub fn new() -> Self {
        Self {
            rcond: 1e-12,
            psd_tolerance: 1e-10,
            symmetry_tolerance: 1e-10,
        }
    }

    pub fn rcond(mut self, rcond: f64) -> Self {
        self.rcond = rcond;
        self
    }

    pub fn psd_tolerance(mut self, psd_tolerance: f64) -> Self {
        self.psd_tolerance = psd_tolerance;
        self
    }

    pub fn symmetry_tolerance(mut self, symmetry_tolerance: f64) -> Self {
        self.symmetry_tolerance = symmetry_tolerance;
        self
    }

    pub fn get_rcond(&self) -> f64 {
        self.rcond
    }

    pub fn get_psd_tolerance(&self) -> f64 {
        self.psd_tolerance
    }

    pub fn get_symmetry_tolerance(&self) -> f64 {
        self.symmetry_tolerance
    }

    pub fn validate(&self) -> SysResult<()> {
        let tolerances = [
            ("rcond", self.rcond),
            ("psd_tolerance", self.psd_tolerance),
            ("symmetry_tolerance", self.symmetry_tolerance),
        ];
        for (name, value) in tolerances {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::InvalidOption { name, value }.into());
            }
        }
        Ok(())
    }
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self::new()
    }
}
