//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// Saved collections allowed on the free tier.
pub const FREE_COLLECTION_LIMIT: usize = 1;

/// Subscription tier stored on the user document.
///
/// Missing documents and missing fields both resolve to `Free`; a missing
/// user is a default, not an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    #[default]
    Free,
    Paid,
}

/// Reference to a named flashcard collection in the user's list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRef {
    pub name: String,
}

/// Per-user document stored in Firestore.
///
/// Field names match the original web client's layout so existing documents
/// stay readable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserDoc {
    /// Subscription tier; absent field defaults to free
    #[serde(default, rename = "subscriptionStatus")]
    pub subscription_status: SubscriptionStatus,
    /// Ordered list of saved collection names
    #[serde(default)]
    pub flashcards: Vec<CollectionRef>,
}

/// Why a save was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveDenied {
    /// A collection with that name already exists for this user
    NameTaken,
    /// Free tier already holds its one saved collection
    QuotaExceeded,
}

impl UserDoc {
    /// Check whether a collection named `name` may be saved for this user.
    ///
    /// Pure so it can run inside the Firestore transaction that performs the
    /// save, closing the check-then-write race.
    pub fn check_save(&self, name: &str) -> Result<(), SaveDenied> {
        if self.flashcards.iter().any(|c| c.name == name) {
            return Err(SaveDenied::NameTaken);
        }
        if self.subscription_status == SubscriptionStatus::Free
            && self.flashcards.len() >= FREE_COLLECTION_LIMIT
        {
            return Err(SaveDenied::QuotaExceeded);
        }
        Ok(())
    }

    /// Whether this user has a collection with the given name.
    pub fn has_collection(&self, name: &str) -> bool {
        self.flashcards.iter().any(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with(status: SubscriptionStatus, names: &[&str]) -> UserDoc {
        UserDoc {
            subscription_status: status,
            flashcards: names
                .iter()
                .map(|n| CollectionRef {
                    name: (*n).to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_missing_status_field_defaults_to_free() {
        let user: UserDoc = serde_json::from_str(r#"{"flashcards": []}"#).unwrap();
        assert_eq!(user.subscription_status, SubscriptionStatus::Free);
    }

    #[test]
    fn test_status_round_trips_lowercase() {
        let user = user_with(SubscriptionStatus::Paid, &[]);
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["subscriptionStatus"], "paid");

        let back: UserDoc = serde_json::from_value(json).unwrap();
        assert_eq!(back.subscription_status, SubscriptionStatus::Paid);
    }

    #[test]
    fn test_duplicate_name_rejected_for_any_tier() {
        let free = user_with(SubscriptionStatus::Free, &["biology"]);
        assert_eq!(free.check_save("biology"), Err(SaveDenied::NameTaken));

        let paid = user_with(SubscriptionStatus::Paid, &["biology", "chemistry"]);
        assert_eq!(paid.check_save("biology"), Err(SaveDenied::NameTaken));
    }

    #[test]
    fn test_free_tier_capped_at_one_collection() {
        let empty = user_with(SubscriptionStatus::Free, &[]);
        assert_eq!(empty.check_save("biology"), Ok(()));

        let full = user_with(SubscriptionStatus::Free, &["biology"]);
        assert_eq!(full.check_save("chemistry"), Err(SaveDenied::QuotaExceeded));
    }

    #[test]
    fn test_paid_tier_uncapped() {
        let user = user_with(SubscriptionStatus::Paid, &["a", "b", "c"]);
        assert_eq!(user.check_save("d"), Ok(()));
    }
}
