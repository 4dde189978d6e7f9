//! Flashcard models for storage and API.

use serde::{Deserialize, Serialize};

/// A single front/back flashcard as exchanged with clients and the
/// completion API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

/// Stored card document in a collection sub-collection.
///
/// Firestore reads are unordered, so `position` records the card's place in
/// the generated sequence and is the read-side sort key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardDocument {
    pub position: u32,
    pub front: String,
    pub back: String,
}

impl CardDocument {
    pub fn new(position: u32, card: &Flashcard) -> Self {
        Self {
            position,
            front: card.front.clone(),
            back: card.back.clone(),
        }
    }
}

impl From<CardDocument> for Flashcard {
    fn from(doc: CardDocument) -> Self {
        Self {
            front: doc.front,
            back: doc.back,
        }
    }
}
