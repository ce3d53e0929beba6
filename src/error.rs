use std::collections::BTreeMap;

use axum::{
    http::{header::RETRY_AFTER, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use mongodb::bson::oid::ObjectId;
use thiserror::Error;
use tracing::error;

use crate::booking::BookingError;
use crate::db::StoreError;
use crate::models::GenericResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not authorized.")]
    Unauthorized,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid id.")]
    InvalidId,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Hall {} is full.", .0.to_hex())]
    HallFull(ObjectId),

    #[error("Booking slot is busy, try again.")]
    Busy,

    #[error("validation failed")]
    Validation(BTreeMap<String, String>),

    #[error("Internal server error")]
    Internal,

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::NotFound(resource) => ApiError::NotFound(resource),
            BookingError::HallFull(hall_id) => ApiError::HallFull(hall_id),
            BookingError::Unauthorized => ApiError::Unauthorized,
            BookingError::InvalidInput(msg) => ApiError::BadRequest(msg),
            BookingError::Busy => ApiError::Busy,
            BookingError::Storage(err) => ApiError::Store(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::InvalidCredentials
            | ApiError::BadRequest(_)
            | ApiError::InvalidId
            | ApiError::HallFull(_)
            | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Busy => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match self {
            ApiError::Validation(errors) => (status, Json(errors)).into_response(),
            busy @ ApiError::Busy => {
                let mut response =
                    (status, Json(GenericResponse::error(busy.to_string()))).into_response();
                response
                    .headers_mut()
                    .insert(RETRY_AFTER, HeaderValue::from_static("1"));
                response
            }
            ApiError::Store(err) => {
                error!("Store error: {}", err);
                (status, Json(GenericResponse::error("Internal server error"))).into_response()
            }
            other => (status, Json(GenericResponse::error(other.to_string()))).into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_errors_map_to_statuses() {
        let cases = [
            (BookingError::NotFound("hall"), StatusCode::NOT_FOUND),
            (BookingError::HallFull(ObjectId::new()), StatusCode::BAD_REQUEST),
            (BookingError::Unauthorized, StatusCode::UNAUTHORIZED),
            (BookingError::InvalidInput("Invalid date.".into()), StatusCode::BAD_REQUEST),
            (BookingError::Busy, StatusCode::SERVICE_UNAVAILABLE),
            (BookingError::Storage(StoreError::MissingId), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn busy_sets_retry_after() {
        let response = ApiError::Busy.into_response();
        assert_eq!(response.headers().get(RETRY_AFTER).unwrap(), "1");
    }
}
