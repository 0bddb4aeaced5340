use crate::api::v1::handler::ApiResponse;
use crate::application_port::*;
use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;
use tracing::warn;
use warp::http::StatusCode;
use warp::{Rejection, reject};

pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    if let Some(err) = err.find::<ApiErrorCode>() {
        let json = warp::reply::json(&ApiResponse::<()>::err(err.clone(), err.to_string()));
        Ok(warp::reply::with_status(json, StatusCode::OK))
    } else {
        let json = warp::reply::json(&ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(ApiError {
                code: ApiErrorCode::InternalError,
                message: format!("Unhandled error: {:?}", err),
            }),
        });
        Ok(warp::reply::with_status(
            json,
            StatusCode::INTERNAL_SERVER_ERROR,
        ))
    }
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Error, Serialize)]
pub enum ApiErrorCode {
    #[error("Caller identity missing or malformed")]
    InvalidIdentity,
    #[error("{0}")]
    InvalidTransition(String),
    #[error("Concurrent update, re-read and retry")]
    Conflict,
    #[error("User not found")]
    UserNotFound,
    #[error("Not found")]
    NotFound,
    #[error("Not permitted")]
    NotPermitted,
    #[error("{0}")]
    InvalidInput(String),
    #[error("Internal error")]
    InternalError,
}

impl ApiErrorCode {
    pub fn internal<E: std::fmt::Display>(error: E) -> ApiErrorCode {
        warn!("Internal error: {}", error);
        ApiErrorCode::InternalError
    }
}

impl reject::Reject for ApiErrorCode {}

impl From<RelationError> for ApiErrorCode {
    fn from(error: RelationError) -> Self {
        match error {
            RelationError::Validation(msg) => ApiErrorCode::InvalidTransition(msg),
            RelationError::Conflict => ApiErrorCode::Conflict,
            RelationError::UserNotFound => ApiErrorCode::UserNotFound,
            RelationError::Permission => ApiErrorCode::NotPermitted,
            RelationError::Store(e) => ApiErrorCode::internal(e),
        }
    }
}

impl From<NotificationError> for ApiErrorCode {
    fn from(error: NotificationError) -> Self {
        match error {
            NotificationError::Malformed(msg) => ApiErrorCode::InvalidInput(msg),
            NotificationError::NotFound => ApiErrorCode::NotFound,
            NotificationError::NotOwner => ApiErrorCode::NotPermitted,
            NotificationError::Store(e) => ApiErrorCode::internal(e),
        }
    }
}

impl From<DeviceError> for ApiErrorCode {
    fn from(error: DeviceError) -> Self {
        match error {
            DeviceError::EmptyToken => {
                ApiErrorCode::InvalidInput("empty device token".to_owned())
            }
            DeviceError::Store(e) => ApiErrorCode::internal(e),
        }
    }
}
