/// Why a run stopped early. The first error aborts every remaining step.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StepError {
    #[error("no requests supplied")]
    NoRequests,
    #[error("request {index}: {message}")]
    Validation { index: usize, message: String },
    #[error("request {index}: cannot extract '{variable}' using '{expression}': {message}")]
    Extraction {
        index: usize,
        variable: String,
        expression: String,
        message: String,
    },
    #[error("request {index}: {method} {url} returned status {status}")]
    Downstream {
        index: usize,
        method: String,
        url: String,
        status: u16,
    },
    #[error("request {index}: {message}")]
    Unhandled { index: usize, message: String },
}

impl StepError {
    /// Status code of the composite response.
    pub fn status(&self) -> u16 {
        match self {
            StepError::NoRequests | StepError::Validation { .. } | StepError::Extraction { .. } => {
                400
            }
            StepError::Downstream { .. } | StepError::Unhandled { .. } => 500,
        }
    }

    pub fn is_unhandled(&self) -> bool {
        matches!(self, StepError::Unhandled { .. })
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            StepError::NoRequests => None,
            StepError::Validation { index, .. }
            | StepError::Extraction { index, .. }
            | StepError::Downstream { index, .. }
            | StepError::Unhandled { index, .. } => Some(*index),
        }
    }
}
