use serde::{Deserialize, Serialize};

use crate::serialize::DEFAULT_PRECISION;

// Half a unit of X drift over 52 of Y.
pub const DEFAULT_SHEAR_COEFFICIENT: f64 = -0.5 / 52.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShearConfig {
    pub coefficient: f64,
    pub y_align: f64,
    pub precision: usize,
}

impl Default for ShearConfig {
    fn default() -> Self {
        Self {
            coefficient: DEFAULT_SHEAR_COEFFICIENT,
            y_align: 0.0,
            precision: DEFAULT_PRECISION,
        }
    }
}

impl ShearConfig {
    pub fn with_y_align(y_align: f64) -> Self {
        Self { y_align, ..Self::default() }
    }

    pub fn correct_x(&self, x: f64, y: f64) -> f64 {
        x + self.coefficient * (y - self.y_align)
    }
}
