//! Error types.
//!
//! The computational core reports typed errors (`EstimateError`,
//! `ScenarioError`). The binary boundary collapses everything into `AppError`,
//! which carries the process exit code:
//!
//! - `2`: usage, configuration or reference-data errors
//! - `3`: core computation errors
//! - `4`: terminal / filesystem errors

use thiserror::Error;

/// Failures of the trend estimator and its input types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimateError {
    #[error("invalid anchors: {0}")]
    InvalidAnchors(String),

    #[error("empty year range: end {end} is before start {start}")]
    EmptyRange { start: i32, end: i32 },

    #[error("year range {start}..={end} leaves the anchor span {min}..={max}")]
    OutsideAnchorSpan { start: i32, end: i32, min: i32, max: i32 },

    #[error("invalid value bounds: low={low}, high={high}")]
    InvalidBounds { low: f64, high: f64 },
}

/// Failures of the scenario aggregator and its action catalog.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScenarioError {
    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("invalid action catalog: {0}")]
    InvalidCatalog(String),
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<EstimateError> for AppError {
    fn from(err: EstimateError) -> Self {
        let code = match err {
            EstimateError::OutsideAnchorSpan { .. } => 3,
            _ => 2,
        };
        AppError::new(code, err.to_string())
    }
}

impl From<ScenarioError> for AppError {
    fn from(err: ScenarioError) -> Self {
        let code = match err {
            ScenarioError::UnknownAction(_) => 3,
            ScenarioError::InvalidCatalog(_) => 2,
        };
        AppError::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let e: AppError = EstimateError::EmptyRange { start: 2000, end: 1999 }.into();
        assert_eq!(e.exit_code(), 2);
        assert!(e.to_string().contains("1999"));

        let e: AppError = ScenarioError::UnknownAction("surfing".to_string()).into();
        assert_eq!(e.exit_code(), 3);
        assert_eq!(e.to_string(), "unknown action 'surfing'");
    }
}
