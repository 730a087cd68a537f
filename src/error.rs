//! Error types for the sign-up workflow harness

use std::time::Duration;

use thiserror::Error;

use crate::driver::WorkflowState;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("page did not become interactive within {elapsed:?}")]
    LoadTimeout { elapsed: Duration },

    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("option '{value}' is not available in {selector}")]
    ValueNotAvailable { selector: String, value: String },

    #[error("timed out waiting for {context} after {elapsed:?}")]
    Timeout { context: String, elapsed: Duration },

    #[error("assertion failed: expected {expected:?}, last observed {actual:?}")]
    AssertionFailure { expected: String, actual: String },

    #[error("step '{step}' requires state {expected}, but the workflow is in {actual}")]
    StepOrder {
        step: &'static str,
        expected: WorkflowState,
        actual: WorkflowState,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type HarnessResult<T> = Result<T, HarnessError>;
