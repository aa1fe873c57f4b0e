use std::convert::Infallible;

use serde::Serialize;
use warp::{
    body::BodyDeserializeError,
    http::StatusCode,
    reject::{
        InvalidQuery, LengthRequired, MethodNotAllowed, PayloadTooLarge, Rejection,
        UnsupportedMediaType,
    },
    Reply,
};

use crate::error::ApiError;

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    error: String,
}

/// Turns every rejection into a JSON error body with a matching status.
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (code, error) = if let Some(e) = err.find::<ApiError>() {
        let code = StatusCode::from_u16(e.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let error = e
            .info
            .clone()
            .unwrap_or_else(|| code.canonical_reason().unwrap_or("Error").to_string());
        (code, error)
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, String::from("Not found"))
    } else if let Some(e) = err.find::<BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, format!("Invalid JSON body: {e}"))
    } else if err.find::<InvalidQuery>().is_some() {
        (StatusCode::BAD_REQUEST, String::from("Invalid query string"))
    } else if err.find::<LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, String::from("Content-Length required"))
    } else if err.find::<PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, String::from("Payload too large"))
    } else if err.find::<UnsupportedMediaType>().is_some() {
        (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            String::from("Expected application/json"),
        )
    } else if err.find::<MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, String::from("Method not allowed"))
    } else {
        log::error!("> Unhandled rejection: {err:?}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            String::from("Internal server error"),
        )
    };

    if code.is_server_error() {
        log::error!("> {code}: {error}");
    } else {
        log::trace!("> {code}: {error}");
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&ErrorBody {
            code: code.as_u16(),
            error,
        }),
        code,
    ))
}
