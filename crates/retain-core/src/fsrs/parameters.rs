//! FSRS weight table configuration
//!
//! The 17 calibrated weights are treated as one immutable, versioned value.
//! An engine holds exactly one table, so every card scheduled in a session
//! sees the same calibration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Number of weights in an FSRS-4.5 table
pub const WEIGHT_COUNT: usize = 17;

/// Version tag of the built-in table
pub const DEFAULT_PARAMETERS_VERSION: &str = "fsrs-4.5";

/// FSRS-4.5 default weights
///
/// | Index   | Role                                   |
/// |---------|----------------------------------------|
/// | w0..w3  | initial stability for Again..Easy      |
/// | w4, w5  | initial difficulty and its rating slope |
/// | w6      | mean-reversion weight                  |
/// | w7      | difficulty step per rating             |
/// | w8..w10 | recall stability growth                |
/// | w11..w14| lapse (forget) stability               |
/// | w15     | Hard penalty                           |
/// | w16     | Easy bonus                             |
pub const FSRS45_WEIGHTS: [f64; WEIGHT_COUNT] = [
    0.4, 0.6, 2.4, 5.8, // w0-w3: initial stability
    4.93, 0.94, 0.86, 0.01, 1.49, // w4-w8
    0.14, 0.94, 2.18, 0.05, 0.34, // w9-w13
    1.26, 0.29, 2.61, // w14-w16
];

// ============================================================================
// PARAMETERS
// ============================================================================

/// Versioned FSRS weight table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FsrsParameters {
    /// Calibration identifier, stamped onto every scheduling result
    pub version: String,
    /// The weight table
    pub weights: [f64; WEIGHT_COUNT],
}

impl Default for FsrsParameters {
    fn default() -> Self {
        Self {
            version: DEFAULT_PARAMETERS_VERSION.to_string(),
            weights: FSRS45_WEIGHTS,
        }
    }
}

impl FsrsParameters {
    /// Create a validated parameter set
    pub fn new(version: impl Into<String>, weights: [f64; WEIGHT_COUNT]) -> Result<Self> {
        let params = Self {
            version: version.into(),
            weights,
        };
        params.validate()?;
        Ok(params)
    }

    /// Parse and validate a JSON parameter document
    ///
    /// ```
    /// use retain_core::FsrsParameters;
    ///
    /// let json = r#"{"version":"custom","weights":[0.4,0.6,2.4,5.8,4.93,0.94,0.86,0.01,1.49,0.14,0.94,2.18,0.05,0.34,1.26,0.29,2.61]}"#;
    /// let params = FsrsParameters::from_json_str(json).unwrap();
    /// assert_eq!(params.version, "custom");
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Load and validate a JSON parameter file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let params = Self::from_json_str(&contents)?;
        tracing::info!(
            "Loaded FSRS parameters '{}' from {}",
            params.version,
            path.display()
        );
        Ok(params)
    }

    /// Check the table can drive the formulas without leaving their domain
    pub fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(SchedulerError::InvalidParameters(
                "version must not be empty".into(),
            ));
        }

        if let Some((i, w)) = self.weights.iter().enumerate().find(|(_, w)| !w.is_finite()) {
            return Err(SchedulerError::InvalidParameters(format!(
                "w{} is not finite ({})",
                i, w
            )));
        }

        for i in 0..4 {
            if self.weights[i] <= 0.0 {
                return Err(SchedulerError::InvalidParameters(format!(
                    "initial stability w{} must be positive, got {}",
                    i, self.weights[i]
                )));
            }
        }

        let reversion = self.weights[6];
        if !(0.0..=1.0).contains(&reversion) {
            return Err(SchedulerError::InvalidParameters(format!(
                "mean-reversion weight w6 must be in [0, 1], got {}",
                reversion
            )));
        }

        for i in [11, 15, 16] {
            if self.weights[i] <= 0.0 {
                return Err(SchedulerError::InvalidParameters(format!(
                    "multiplier w{} must be positive, got {}",
                    i, self.weights[i]
                )));
            }
        }

        Ok(())
    }
}
