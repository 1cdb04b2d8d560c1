use anyhow::{Context, Result};
use ndarray::{Array1, Array2, Axis};

/// Column-wise standardisation: (x − mean) / std.
/// Columns with zero variance are only centred.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean:  Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    pub fn fit(x: &Array2<f64>) -> Result<Self> {
        let mean = x
            .mean_axis(Axis(0))
            .context("Cannot fit a scaler on zero rows")?;
        let scale = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s > 0.0 { s } else { 1.0 });
        Ok(Self { mean, scale })
    }

    pub fn transform(&self, x: &Array2<f64>) -> Array2<f64> {
        (x - &self.mean) / &self.scale
    }

    pub fn fit_transform(x: &Array2<f64>) -> Result<(Self, Array2<f64>)> {
        let scaler = Self::fit(x)?;
        let scaled = scaler.transform(x);
        Ok((scaler, scaled))
    }
}
