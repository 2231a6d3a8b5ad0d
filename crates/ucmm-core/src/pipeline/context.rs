//! Transform options

use crate::math::AdaptationMethod;

/// Default tolerance when comparing normalized white points
pub const DEFAULT_WHITE_POINT_TOLERANCE: f64 = 1e-4;

/// Knobs for [`Ucmm`](super::Ucmm) transforms
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TransformOptions {
    /// Adaptation used when source and target whites differ
    pub adaptation: AdaptationMethod,
    /// Maximum difference of normalized X and Z for whites to count as equal
    pub white_point_tolerance: f64,
    /// Clamp device output to `[0, 1]`
    pub clamp_output: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            adaptation: AdaptationMethod::Bradford,
            white_point_tolerance: DEFAULT_WHITE_POINT_TOLERANCE,
            clamp_output: true,
        }
    }
}

impl TransformOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_adaptation(mut self, method: AdaptationMethod) -> Self {
        self.adaptation = method;
        self
    }

    pub fn with_white_point_tolerance(mut self, tolerance: f64) -> Self {
        self.white_point_tolerance = tolerance;
        self
    }

    pub fn with_clamp_output(mut self, clamp: bool) -> Self {
        self.clamp_output = clamp;
        self
    }
}
