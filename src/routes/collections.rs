// SPDX-License-Identifier: MIT

//! Flashcard collection endpoints: save, list, and read collections, plus
//! the subscription tier read used by the client for quota gating.

use crate::error::{AppError, Result};
use crate::models::{CollectionRef, Flashcard, SubscriptionStatus};
use crate::services::subscription;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Collection routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users/{user_id}/subscription", get(get_subscription))
        .route(
            "/api/users/{user_id}/collections",
            get(list_collections).post(save_collection),
        )
        .route(
            "/api/users/{user_id}/collections/{name}",
            get(get_collection),
        )
}

// ─── Subscription ────────────────────────────────────────────

#[derive(Serialize)]
struct SubscriptionResponse {
    status: SubscriptionStatus,
}

/// Get a user's subscription tier (defaults to free for unknown users).
async fn get_subscription(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<SubscriptionResponse>> {
    let status = subscription::resolve(&state.db, &user_id).await?;
    Ok(Json(SubscriptionResponse { status }))
}

// ─── Collections ─────────────────────────────────────────────

/// Save request body.
#[derive(Deserialize, Validate)]
struct SaveCollectionRequest {
    #[validate(length(max = 100, message = "name must be at most 100 characters"))]
    name: String,
    flashcards: Vec<Flashcard>,
}

#[derive(Serialize)]
struct SaveCollectionResponse {
    name: String,
    cards: usize,
}

/// Save a named collection of flashcards under the user's namespace.
///
/// Uniqueness and the free-tier cap are enforced transactionally in the
/// database layer; collisions come back as 409, quota as 403.
async fn save_collection(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(req): Json<SaveCollectionRequest>,
) -> Result<(StatusCode, Json<SaveCollectionResponse>)> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name must not be empty".to_string()));
    }
    if req.flashcards.is_empty() {
        return Err(AppError::BadRequest(
            "flashcards must not be empty".to_string(),
        ));
    }

    state
        .db
        .save_collection(&user_id, name, &req.flashcards)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SaveCollectionResponse {
            name: name.to_string(),
            cards: req.flashcards.len(),
        }),
    ))
}

/// List a user's saved collection names (empty for unknown users).
async fn list_collections(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<CollectionRef>>> {
    let collections = state
        .db
        .get_user(&user_id)
        .await?
        .map(|user| user.flashcards)
        .unwrap_or_default();

    Ok(Json(collections))
}

/// Read the ordered cards of one saved collection.
async fn get_collection(
    State(state): State<Arc<AppState>>,
    Path((user_id, name)): Path<(String, String)>,
) -> Result<Json<Vec<Flashcard>>> {
    let known = state
        .db
        .get_user(&user_id)
        .await?
        .is_some_and(|user| user.has_collection(&name));

    if !known {
        return Err(AppError::NotFound(format!(
            "No flashcard collection named '{}'",
            name
        )));
    }

    let cards = state.db.get_cards(&user_id, &name).await?;
    Ok(Json(cards))
}
