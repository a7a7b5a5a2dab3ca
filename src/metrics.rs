use ndarray::ArrayView1;

use crate::error::{ConfigurationError, SysResult};

fn check_lengths(y_true: &ArrayView1<f64>, y_pred: &ArrayView1<f64>) -> SysResult<()> {
    if y_true.len() != y_pred.len() {
        return Err(ConfigurationError::LengthMismatch {
            expected: y_true.len(),
            found: y_pred.len(),
        }
        .into());
    }
    if y_true.is_empty() {
        return Err(ConfigurationError::EmptyInput.into());
    }
    Ok(())
}

pub fn mean_squared_error(y_true: ArrayView1<f64>, y_pred: ArrayView1<f64>) -> SysResult<f64> {
    check_lengths(&y_true, &y_pred)?;

    let diff = &y_true - &y_pred;
    Ok(diff.mapv(|x| x * x).sum() / y_true.len() as f64)
}

pub fn r2_score(y_true: ArrayView1<f64>, y_pred: ArrayView1<f64>) -> SysResult<f64> {
    check_lengths(&y_true, &y_pred)?;

    let y_mean = y_true.sum() / y_true.len() as f64;
    let ss_res = (&y_true - &y_pred).mapv(|x| x * x).sum();
    let ss_tot = y_true.mapv(|x| (x - y_mean) * (x - y_mean)).sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }

    Ok(1.0 - ss_res / ss_tot)
}
