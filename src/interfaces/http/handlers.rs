use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, error, warn};

use super::AppState;
use super::dto::{
    CreateOrderRequest, ErrorResponse, HealthResponse, StatusResponse, VerifyPaymentRequest,
};
use crate::application::lifecycle::ConfirmOutcome;
use crate::error::RelayError;

/// Errors surfaced to HTTP clients. Bodies carry a fixed message only.
#[derive(Debug)]
pub(crate) enum ApiError {
    InvalidAmount,
    CreateFailed,
    VerificationFailed,
    ConfirmFailed,
}

impl ApiError {
    fn from_create(err: RelayError) -> Self {
        match err {
            RelayError::InvalidAmount(_) => ApiError::InvalidAmount,
            other => {
                error!(error = %other, "Order creation error");
                ApiError::CreateFailed
            }
        }
    }

    fn from_confirm(err: RelayError) -> Self {
        match err {
            RelayError::SignatureMismatch { .. } => ApiError::VerificationFailed,
            other => {
                error!(error = %other, "Payment confirmation error");
                ApiError::ConfirmFailed
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidAmount => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Invalid amount",
                }),
            )
                .into_response(),
            ApiError::CreateFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create order",
                }),
            )
                .into_response(),
            ApiError::VerificationFailed => (
                StatusCode::BAD_REQUEST,
                Json(StatusResponse {
                    status: "verification_failed",
                }),
            )
                .into_response(),
            ApiError::ConfirmFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to record payment",
                }),
            )
                .into_response(),
        }
    }
}

// ---------------------------------------------------------------------------
// POST /create-order
// ---------------------------------------------------------------------------

pub(crate) async fn create_order(
    State(st): State<Arc<AppState>>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload.map_err(|e| {
        warn!(error = %e, "rejected create-order body");
        ApiError::InvalidAmount
    })?;
    let amount = req.amount_text().ok_or(ApiError::InvalidAmount)?;

    let descriptor = st
        .lifecycle
        .create_order(&amount)
        .await
        .map_err(ApiError::from_create)?;

    Ok(Json(descriptor))
}

// ---------------------------------------------------------------------------
// POST /verify-payment
// ---------------------------------------------------------------------------

pub(crate) async fn verify_payment(
    State(st): State<Arc<AppState>>,
    payload: Result<Json<VerifyPaymentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload.map_err(|e| {
        warn!(error = %e, "rejected verify-payment body");
        ApiError::VerificationFailed
    })?;

    let outcome = st
        .lifecycle
        .confirm_payment(
            &req.razorpay_order_id,
            &req.razorpay_payment_id,
            &req.razorpay_signature,
        )
        .await
        .map_err(ApiError::from_confirm)?;

    // Unknown and already-paid orders still acknowledge a valid signature.
    if outcome != ConfirmOutcome::Paid {
        debug!(order_id = %req.razorpay_order_id, ?outcome, "payment acknowledged without update");
    }

    Ok(Json(StatusResponse { status: "ok" }))
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

pub(crate) async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        ok: true,
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}
