//! Subscription tier resolution.

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::SubscriptionStatus;

/// Resolve a user's subscription tier.
///
/// Missing user documents resolve to `Free`; this is a default, not an error.
/// The stored value is returned otherwise. Read-only and idempotent.
pub async fn resolve(db: &FirestoreDb, user_id: &str) -> Result<SubscriptionStatus, AppError> {
    Ok(db
        .get_user(user_id)
        .await?
        .map(|user| user.subscription_status)
        .unwrap_or_default())
}
