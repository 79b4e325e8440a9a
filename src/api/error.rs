use axum::http::StatusCode;
use thiserror::Error;

use crate::core::TvmError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Numeric domain error: {0}")]
    Numeric(#[from] TvmError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Cli(#[from] clap::Error),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Cli(_) | ApiError::Json(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Numeric(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Csv(_) | ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
