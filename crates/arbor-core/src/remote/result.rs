use crate::error::{ArborError, Result};
use serde::{Deserialize, Serialize};

/// Outcome of a whole-list operation, as reported to the host.
///
/// Mirrors a `Result` with an explicit success flag so hosts that render
/// messages do not need to match on error variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodResult<T> {
    pub is_successful: bool,
    pub error: Option<String>,
    pub result: Option<T>,
}

impl<T> MethodResult<T> {
    pub fn success(result: T) -> Self {
        Self {
            is_successful: true,
            error: None,
            result: Some(result),
        }
    }

    pub fn failure(error: impl ToString) -> Self {
        Self {
            is_successful: false,
            error: Some(error.to_string()),
            result: None,
        }
    }

    pub fn into_result(self) -> Result<T> {
        match (self.is_successful, self.result) {
            (true, Some(result)) => Ok(result),
            (_, _) => Err(ArborError::remote(
                self.error.unwrap_or_else(|| "operation failed".to_string()),
            )),
        }
    }
}

impl<T> From<Result<T>> for MethodResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::success(value),
            Err(err) => Self::failure(err),
        }
    }
}
