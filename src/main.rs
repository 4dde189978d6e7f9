// SPDX-License-Identifier: MIT

//! Flashdeck API Server
//!
//! Generates flashcards from user-submitted text with a hosted
//! chat-completion API, sells monthly subscriptions via Stripe, and stores
//! per-user flashcard collections in Firestore.

use flashdeck::{
    config::Config,
    db::FirestoreDb,
    services::{FlashcardGenerator, PaymentsService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Flashdeck API");

    if config.openrouter_api_key.is_none() {
        tracing::warn!("OPENROUTER_API_KEY not set; generation requests will fail");
    }

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Initialize Stripe client
    let payments = PaymentsService::new(&config.stripe_secret_key);
    tracing::info!("Stripe client initialized");

    // Initialize the completion client
    let generator = FlashcardGenerator::from_config(&config);
    tracing::info!(endpoint = %config.openrouter_endpoint, "Completion client initialized");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        payments,
        generator,
    });

    // Build router
    let app = flashdeck::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("flashdeck=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
