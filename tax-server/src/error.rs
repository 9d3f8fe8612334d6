use std::convert::Infallible;

use tax_core::{AdminServiceError, TaxServiceError};
use tax_data::BatchCsvError;
use thiserror::Error;
use tracing::{debug, error};
use warp::filters::body::BodyDeserializeError;
use warp::http::StatusCode;
use warp::reject::{MethodNotAllowed, MissingHeader, PayloadTooLarge, UnsupportedMediaType};
use warp::{Rejection, Reply};

use crate::schemas::MessageResponse;

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized: Incorrect credentials";

/// Failures raised by handlers and filters, carried as warp rejections.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Unauthorized: Incorrect credentials")]
    Unauthorized,

    #[error("{0}")]
    Internal(String),
}

impl warp::reject::Reject for ApiError {}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Joins request validation problems into one message.
    pub fn validation(errors: &[String]) -> Self {
        ApiError::BadRequest(format!("validation errors: {}", errors.join(", ")))
    }
}

impl From<TaxServiceError> for ApiError {
    fn from(err: TaxServiceError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<AdminServiceError> for ApiError {
    fn from(err: AdminServiceError) -> Self {
        if err.is_validation() {
            ApiError::BadRequest(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl From<BatchCsvError> for ApiError {
    fn from(err: BatchCsvError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

fn message_reply(
    status: StatusCode,
    message: impl Into<String>,
) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(
        warp::reply::json(&MessageResponse {
            message: message.into(),
        }),
        status,
    )
}

/// Turns every rejection into a JSON `{"message"}` body.
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    if let Some(api_error) = err.find::<ApiError>() {
        let status = api_error.status();
        if status.is_server_error() {
            error!(error = %api_error, "request failed");
        } else {
            debug!(%status, error = %api_error, "request rejected");
        }
        return Ok(message_reply(status, api_error.to_string()));
    }

    if err.is_not_found() {
        return Ok(message_reply(StatusCode::NOT_FOUND, "Not Found"));
    }

    if let Some(e) = err.find::<BodyDeserializeError>() {
        debug!(error = %e, "invalid request body");
        return Ok(message_reply(StatusCode::BAD_REQUEST, "Invalid input data"));
    }

    if err.find::<MissingHeader>().is_some() {
        return Ok(message_reply(StatusCode::BAD_REQUEST, "Failed to get the file"));
    }

    if err.find::<UnsupportedMediaType>().is_some() {
        return Ok(message_reply(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Unsupported Media Type",
        ));
    }

    if err.find::<PayloadTooLarge>().is_some() {
        return Ok(message_reply(
            StatusCode::PAYLOAD_TOO_LARGE,
            "Payload Too Large",
        ));
    }

    if err.find::<MethodNotAllowed>().is_some() {
        return Ok(message_reply(
            StatusCode::METHOD_NOT_ALLOWED,
            "Method Not Allowed",
        ));
    }

    error!(rejection = ?err, "unhandled rejection");
    Ok(message_reply(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal Server Error",
    ))
}
