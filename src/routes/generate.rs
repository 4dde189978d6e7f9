// SPDX-License-Identifier: MIT

//! Flashcard generation endpoint.

use crate::error::{AppError, Result};
use crate::models::Flashcard;
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use std::sync::Arc;

/// Generation routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/generate", post(generate))
}

/// Generate flashcards from the raw request body (plain text).
async fn generate(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<Vec<Flashcard>>> {
    let text = body.trim();
    if text.is_empty() {
        return Err(AppError::BadRequest(
            "request body must contain source text".to_string(),
        ));
    }

    let cards = state.generator.generate(text).await?;

    tracing::info!(cards = cards.len(), "Flashcards generated");

    Ok(Json(cards))
}
