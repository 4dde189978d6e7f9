// SPDX-License-Identifier: MIT

//! Checkout endpoints: create a subscription session, read back its status.

use crate::error::{AppError, Result};
use crate::services::payments::{self, SessionSummary};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Checkout routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/checkout", post(create_checkout).get(retrieve_checkout))
}

/// Checkout creation request body.
#[derive(Deserialize)]
struct CheckoutRequest {
    /// Human-readable price label, e.g. "$9.99"
    price: String,
    #[serde(rename = "userId")]
    user_id: String,
}

/// Create a monthly subscription Checkout session.
///
/// The user is NOT marked paid here; session creation only starts a payment
/// flow. Activation happens when the payment-confirmation webhook fires.
async fn create_checkout(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CheckoutRequest>,
) -> Result<Json<SessionSummary>> {
    if req.user_id.trim().is_empty() {
        return Err(AppError::BadRequest("userId must not be empty".to_string()));
    }

    let amount_cents = payments::minor_units(&req.price)?;

    let session = state
        .payments
        .create_subscription_session(&req.user_id, amount_cents, &state.config.frontend_url)
        .await?;

    tracing::info!(
        user_id = %req.user_id,
        session_id = %session.id,
        amount_cents,
        "Checkout session created"
    );

    Ok(Json(session))
}

/// Checkout retrieval query params.
#[derive(Deserialize)]
struct RetrieveQuery {
    session_id: String,
}

/// Retrieve a Checkout session's status by ID.
async fn retrieve_checkout(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RetrieveQuery>,
) -> Result<Json<SessionSummary>> {
    let session = state.payments.retrieve_session(&query.session_id).await?;
    Ok(Json(session))
}
