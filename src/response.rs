use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::core::graph::GraphError;
use crate::core::mastery::MasteryError;
use crate::core::planner::PlanError;
use crate::core::srs::SrsError;

/// Standard success envelope for every route.
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
}

#[derive(Debug, Clone)]
pub struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::with(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::with(StatusCode::CONFLICT, "CONFLICT", message)
    }

    fn with(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            success: false,
            error: self.message,
            code: self.code,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<MasteryError> for AppError {
    fn from(err: MasteryError) -> Self {
        match err {
            MasteryError::InvalidInput(_) => Self::validation(err.to_string()),
        }
    }
}

impl From<SrsError> for AppError {
    fn from(err: SrsError) -> Self {
        match err {
            SrsError::NotFound(_) => Self::not_found(err.to_string()),
            SrsError::InvalidQuality(_) => Self::validation(err.to_string()),
        }
    }
}

impl From<GraphError> for AppError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::NotFound(_) => Self::not_found(err.to_string()),
            GraphError::NodeLocked(_) => Self::conflict(err.to_string()),
            GraphError::InvalidInput(_)
            | GraphError::UnknownPrerequisite { .. }
            | GraphError::PrerequisiteCycle(_) => Self::validation(err.to_string()),
        }
    }
}

impl From<PlanError> for AppError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::NoPlan => Self::not_found(err.to_string()),
            PlanError::InvalidInput(_) => Self::validation(err.to_string()),
        }
    }
}
