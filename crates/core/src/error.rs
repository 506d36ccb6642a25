use thiserror::Error;

/// Caller misconfiguration, reported when a layout is set up.
///
/// Runtime anomalies (missing measurements, zero-sized viewports) are never
/// errors; they resolve to an unscaled layout instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reference canvas must be positive and finite, got {width}x{height}")]
    ReferenceCanvas { width: f64, height: f64 },
    #[error("scale bounds must satisfy 0 < min <= 1 <= max, got [{min}, {max}]")]
    ScaleBounds { min: f64, max: f64 },
    #[error("safety margin must be finite and non-negative, got {0}")]
    SafetyMargin(f64),
    #[error("reference content width must be finite, got {0}")]
    ContentWidth(f64),
    #[error("breakpoint {index}: {reason}")]
    Breakpoint { index: usize, reason: &'static str },
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}
