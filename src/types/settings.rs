use crate::error::{AppError, Result};
use crate::types::EvaluationConfig;
use serde::{Deserialize, Serialize};

pub const MIN_SENSITIVITY: f64 = 0.1;
pub const MAX_SENSITIVITY: f64 = 5.0;

/// Operator-tunable generation settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalSettings {
    pub minimum_quality: f64,
    pub indicator_sensitivity: f64,
}

impl Default for SignalSettings {
    fn default() -> Self {
        Self {
            minimum_quality: 60.0,
            indicator_sensitivity: 1.0,
        }
    }
}

impl SignalSettings {
    /// Check the settings against their accepted ranges.
    pub fn validate(&self) -> Result<()> {
        if !self.minimum_quality.is_finite() || !(0.0..=100.0).contains(&self.minimum_quality) {
            return Err(AppError::Validation(format!(
                "minimumQuality must be between 0 and 100, got {}",
                self.minimum_quality
            )));
        }

        if !self.indicator_sensitivity.is_finite()
            || !(MIN_SENSITIVITY..=MAX_SENSITIVITY).contains(&self.indicator_sensitivity)
        {
            return Err(AppError::Validation(format!(
                "indicatorSensitivity must be between {} and {}, got {}",
                MIN_SENSITIVITY, MAX_SENSITIVITY, self.indicator_sensitivity
            )));
        }

        Ok(())
    }

    /// Validated conversion into the evaluator's run configuration.
    pub fn evaluation_config(&self) -> Result<EvaluationConfig> {
        self.validate()?;
        Ok(EvaluationConfig {
            sensitivity: self.indicator_sensitivity,
            minimum_quality: self.minimum_quality,
        })
    }
}
