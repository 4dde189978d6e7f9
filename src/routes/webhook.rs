// SPDX-License-Identifier: MIT

//! Stripe webhook route for payment confirmation.
//!
//! Subscription activation is gated here, on `checkout.session.completed`,
//! rather than at session creation; creating a session only starts a payment
//! flow.

use crate::error::{AppError, Result};
use crate::models::SubscriptionStatus;
use crate::services::payments::METADATA_USER_ID;
use crate::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use std::sync::Arc;
use stripe::{EventObject, EventType, Webhook};

/// Webhook routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/webhook/stripe", post(handle_stripe_event))
}

/// Verify and process a Stripe webhook event.
async fn handle_stripe_event(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Result<StatusCode> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("missing Stripe-Signature header".to_string()))?;

    let event = Webhook::construct_event(&body, signature, &state.config.stripe_webhook_secret)
        .map_err(|e| {
            tracing::warn!(error = %e, "Webhook signature verification failed");
            AppError::BadRequest(format!("webhook signature verification failed: {}", e))
        })?;

    match event.type_ {
        EventType::CheckoutSessionCompleted => {
            if let EventObject::CheckoutSession(session) = event.data.object {
                let user_id = session
                    .metadata
                    .as_ref()
                    .and_then(|m| m.get(METADATA_USER_ID))
                    .cloned()
                    .unwrap_or_default();

                if user_id.is_empty() {
                    tracing::warn!(
                        session_id = %session.id,
                        "Completed checkout session carries no user metadata"
                    );
                } else {
                    state
                        .db
                        .set_subscription_status(&user_id, SubscriptionStatus::Paid)
                        .await?;

                    tracing::info!(
                        user_id = %user_id,
                        session_id = %session.id,
                        "Subscription activated on confirmed payment"
                    );
                }
            }
        }
        other => {
            tracing::debug!(event_type = ?other, "Ignoring Stripe event");
        }
    }

    Ok(StatusCode::OK)
}
