// SPDX-License-Identifier: MIT

//! Flashdeck: AI flashcard SaaS backend
//!
//! This crate provides the backend API for generating flashcards from user
//! text via a chat-completion API, billing monthly subscriptions through
//! Stripe, and persisting per-user collections in Firestore.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::FirestoreDb;
use services::{FlashcardGenerator, PaymentsService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub payments: PaymentsService,
    pub generator: FlashcardGenerator,
}
