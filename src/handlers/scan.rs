use std::any::Any;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::engine::{fail_closed_contract, new_scan_id};
use crate::handlers::AppState;
use crate::models::{Target, TargetError};

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub mint: Option<String>,
}

/// Why a scan request was refused before reaching the engine. Only ever logged.
#[derive(Error, Debug)]
pub enum ScanRejection {
    #[error("Request body could not be read")]
    UnreadableBody,

    #[error("Request body is empty")]
    EmptyBody,

    #[error("Request body is not valid JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("Request is missing the mint field")]
    MissingMint,

    #[error(transparent)]
    InvalidMint(#[from] TargetError),
}

pub fn parse_scan_request(body: &[u8]) -> Result<Target, ScanRejection> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ScanRejection::EmptyBody);
    }
    let request: ScanRequest = serde_json::from_slice(body)?;
    let mint = request.mint.ok_or(ScanRejection::MissingMint)?;
    Ok(Target::parse(&mint)?)
}

/// Complete fail-closed contract with the given status.
pub fn fail_closed_response(status: StatusCode) -> Response {
    (status, Json(fail_closed_contract(&new_scan_id()))).into_response()
}

/// POST /api/scan
pub async fn scan_token(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let target = match body
        .map_err(|_| ScanRejection::UnreadableBody)
        .and_then(|body| parse_scan_request(&body))
    {
        Ok(target) => target,
        Err(rejection) => {
            warn!(reason = %rejection, "Rejected scan request");
            return fail_closed_response(StatusCode::BAD_REQUEST);
        }
    };

    let contract = state.engine.evaluate(&target).await;
    (StatusCode::OK, Json(contract)).into_response()
}

pub async fn method_not_allowed() -> Response {
    fail_closed_response(StatusCode::METHOD_NOT_ALLOWED)
}

pub async fn not_found() -> Response {
    fail_closed_response(StatusCode::NOT_FOUND)
}

/// Response for a panic caught by the HTTP layer. The payload is never echoed.
pub fn panic_response(_payload: Box<dyn Any + Send + 'static>) -> Response {
    error!("Request handler panicked, returning fail-closed contract");
    fail_closed_response(StatusCode::INTERNAL_SERVER_ERROR)
}
