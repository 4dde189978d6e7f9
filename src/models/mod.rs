// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod flashcard;
pub mod user;

pub use flashcard::{CardDocument, Flashcard};
pub use user::{CollectionRef, SaveDenied, SubscriptionStatus, UserDoc};
