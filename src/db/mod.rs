//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    /// Per-user documents; card sub-collections hang off each user document,
    /// named after the (encoded) flashcard collection name.
    pub const USERS: &str = "users";
}
