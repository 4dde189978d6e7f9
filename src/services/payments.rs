// SPDX-License-Identifier: MIT

//! Stripe client wrapper for subscription checkout.
//!
//! Handles:
//! - Creating monthly-recurring Checkout sessions
//! - Retrieving a session's payment status by ID
//! - Converting human-readable price labels to minor units

use crate::error::AppError;
use serde::Serialize;
use stripe::{
    CheckoutSession, CheckoutSessionId, CheckoutSessionMode, Client, CreateCheckoutSession,
    CreateCheckoutSessionLineItems, CreateCheckoutSessionLineItemsPriceData,
    CreateCheckoutSessionLineItemsPriceDataProductData,
    CreateCheckoutSessionLineItemsPriceDataRecurring,
    CreateCheckoutSessionLineItemsPriceDataRecurringInterval,
    CreateCheckoutSessionPaymentMethodTypes, Currency,
};

/// Product name shown on the hosted checkout page.
const PRODUCT_NAME: &str = "Pro Subscription";

/// Metadata key carrying the auth-provider user ID through Stripe, so the
/// completion webhook can find the user to activate.
pub const METADATA_USER_ID: &str = "user_id";

/// Stripe API client.
#[derive(Clone)]
pub struct PaymentsService {
    client: Client,
}

/// Session resource summary returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    /// Stripe checkout session ID
    pub id: String,
    /// Hosted checkout page URL (present on freshly created sessions)
    pub url: Option<String>,
    /// Session status (open/complete/expired)
    pub status: Option<String>,
    /// Payment status (paid/unpaid/no_payment_required)
    pub payment_status: String,
}

impl From<CheckoutSession> for SessionSummary {
    fn from(session: CheckoutSession) -> Self {
        Self {
            id: session.id.to_string(),
            url: session.url,
            status: session.status.map(|s| s.as_str().to_string()),
            payment_status: session.payment_status.as_str().to_string(),
        }
    }
}

impl PaymentsService {
    /// Create a new Stripe client with the account's secret key.
    pub fn new(secret_key: &str) -> Self {
        Self {
            client: Client::new(secret_key),
        }
    }

    /// Create a monthly-recurring subscription Checkout session.
    ///
    /// The user ID travels in session metadata; activation happens when the
    /// `checkout.session.completed` webhook confirms payment, not here.
    pub async fn create_subscription_session(
        &self,
        user_id: &str,
        amount_cents: i64,
        redirect_base: &str,
    ) -> Result<SessionSummary, AppError> {
        // Stripe substitutes the placeholder with the real session ID
        let result_url = format!("{}/result?session_id={{CHECKOUT_SESSION_ID}}", redirect_base);

        let mut params = CreateCheckoutSession::new();
        params.mode = Some(CheckoutSessionMode::Subscription);
        params.payment_method_types = Some(vec![CreateCheckoutSessionPaymentMethodTypes::Card]);
        params.success_url = Some(&result_url);
        params.cancel_url = Some(&result_url);

        let mut metadata = std::collections::HashMap::new();
        metadata.insert(METADATA_USER_ID.to_string(), user_id.to_string());
        params.metadata = Some(metadata);

        params.line_items = Some(vec![CreateCheckoutSessionLineItems {
            quantity: Some(1),
            price_data: Some(CreateCheckoutSessionLineItemsPriceData {
                currency: Currency::USD,
                unit_amount: Some(amount_cents),
                product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                    name: PRODUCT_NAME.to_string(),
                    ..Default::default()
                }),
                recurring: Some(CreateCheckoutSessionLineItemsPriceDataRecurring {
                    interval: CreateCheckoutSessionLineItemsPriceDataRecurringInterval::Month,
                    interval_count: Some(1),
                }),
                ..Default::default()
            }),
            ..Default::default()
        }]);

        let session = CheckoutSession::create(&self.client, params)
            .await
            .map_err(|e| AppError::Stripe(e.to_string()))?;

        Ok(SessionSummary::from(session))
    }

    /// Retrieve an existing Checkout session by ID.
    pub async fn retrieve_session(&self, session_id: &str) -> Result<SessionSummary, AppError> {
        let id: CheckoutSessionId = session_id
            .parse()
            .map_err(|_| AppError::Stripe(format!("No such checkout session: {}", session_id)))?;

        let session = CheckoutSession::retrieve(&self.client, &id, &[])
            .await
            .map_err(|e| AppError::Stripe(e.to_string()))?;

        Ok(SessionSummary::from(session))
    }
}

/// Parse a human-readable price label into Stripe minor units.
///
/// Strips everything except digits, `.` and `-`, parses the rest as a
/// decimal, and rounds `value * 100` to the nearest integer. `"$9.99"` → 999.
pub fn minor_units(price: &str) -> Result<i64, AppError> {
    let cleaned: String = price
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    let value: f64 = cleaned
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Unparseable price: '{}'", price)))?;

    Ok((value * 100.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minor_units_dollar_prices() {
        assert_eq!(minor_units("$9.99").unwrap(), 999);
        assert_eq!(minor_units("$29").unwrap(), 2900);
        assert_eq!(minor_units("0.1").unwrap(), 10);
        assert_eq!(minor_units("$0.00").unwrap(), 0);
    }

    #[test]
    fn test_minor_units_ignores_label_text() {
        assert_eq!(minor_units("USD 12.50 / month").unwrap(), 1250);
        assert_eq!(minor_units("9.99 dollars").unwrap(), 999);
    }

    #[test]
    fn test_minor_units_rounds_to_nearest() {
        assert_eq!(minor_units("12.345").unwrap(), 1235);
        assert_eq!(minor_units("1.001").unwrap(), 100);
    }

    #[test]
    fn test_minor_units_negative() {
        assert_eq!(minor_units("-5.00").unwrap(), -500);
    }

    #[test]
    fn test_minor_units_rejects_garbage() {
        assert!(minor_units("free!").is_err());
        assert!(minor_units("").is_err());
        assert!(minor_units("$").is_err());
        assert!(minor_units("..").is_err());
    }
}
