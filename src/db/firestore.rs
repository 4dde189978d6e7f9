// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Layout:
//! - `users/{user_id}`: subscription flag plus the ordered list of saved
//!   collection names
//! - `users/{user_id}/{collection}/{card}`: one document per flashcard
//!
//! User IDs come from the auth provider and collection names from users, so
//! both are percent-encoded before being used as document/collection IDs.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{CardDocument, Flashcard, SaveDenied, SubscriptionStatus, UserDoc};
use crate::models::{CollectionRef, user::FREE_COLLECTION_LIMIT};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    /// Percent-encode an external string for use as a document/collection ID.
    fn doc_id(raw: &str) -> String {
        urlencoding::encode(raw).into_owned()
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user document by auth-provider user ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<UserDoc>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(&Self::doc_id(user_id))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or replace a user document.
    pub async fn upsert_user(&self, user_id: &str, user: &UserDoc) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(Self::doc_id(user_id))
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Set the subscription flag, preserving the saved-collection list.
    ///
    /// Runs as a transaction so a save committing concurrently cannot have
    /// its collection-list entry overwritten; creates the document if the
    /// user has never been stored before (a webhook can arrive before any
    /// save).
    pub async fn set_subscription_status(
        &self,
        user_id: &str,
        status: SubscriptionStatus,
    ) -> Result<(), AppError> {
        let client = self.get_client()?;
        let user_doc_id = Self::doc_id(user_id);

        client
            .run_transaction(|db, transaction| {
                let user_doc_id = user_doc_id.clone();
                Box::pin(async move {
                    let mut user: UserDoc = db
                        .fluent()
                        .select()
                        .by_id_in(collections::USERS)
                        .obj()
                        .one(&user_doc_id)
                        .await?
                        .unwrap_or_default();

                    user.subscription_status = status;

                    db.fluent()
                        .update()
                        .in_col(collections::USERS)
                        .document_id(&user_doc_id)
                        .object(&user)
                        .add_to_transaction(transaction)?;

                    Ok(())
                })
            })
            .await
            .map_err(|e| AppError::Database(format!("Transaction failed: {}", e)))?;

        Ok(())
    }

    // ─── Flashcard Collection Operations ─────────────────────────

    /// Read the cards of a saved collection, in original order.
    pub async fn get_cards(
        &self,
        user_id: &str,
        collection_name: &str,
    ) -> Result<Vec<Flashcard>, AppError> {
        let client = self.get_client()?;

        let parent_path = client
            .parent_path(collections::USERS, Self::doc_id(user_id))
            .map_err(|e| AppError::Database(e.to_string()))?;

        let col_id = Self::doc_id(collection_name);
        let cards: Vec<CardDocument> = client
            .fluent()
            .select()
            .from(col_id.as_str())
            .parent(&parent_path)
            .order_by([(
                "position",
                firestore::FirestoreQueryDirection::Ascending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(cards.into_iter().map(Flashcard::from).collect())
    }

    /// Atomically save a named collection of flashcards for a user.
    ///
    /// Runs inside `run_transaction`, which hands the closure a database
    /// handle whose reads carry the transaction's consistency selector: the
    /// user document read is registered with the transaction, so the commit
    /// aborts when another writer touches that document first, and the
    /// closure is retried against fresh data. Uniqueness and the free-tier
    /// cap are re-checked on every attempt; a denied attempt adds no writes,
    /// so its commit is a no-op.
    pub async fn save_collection(
        &self,
        user_id: &str,
        name: &str,
        cards: &[Flashcard],
    ) -> Result<(), AppError> {
        let client = self.get_client()?;
        let user_doc_id = Self::doc_id(user_id);
        let col_id = Self::doc_id(name);

        let outcome: Result<(), SaveDenied> = client
            .run_transaction(|db, transaction| {
                let user_doc_id = user_doc_id.clone();
                let col_id = col_id.clone();
                let name = name.to_string();
                let cards = cards.to_vec();
                Box::pin(async move {
                    let current: Option<UserDoc> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::USERS)
                        .obj()
                        .one(&user_doc_id)
                        .await?;

                    let mut user = current.unwrap_or_default();

                    if let Err(denied) = user.check_save(&name) {
                        return Ok(Err(denied));
                    }

                    user.flashcards.push(CollectionRef { name: name.clone() });

                    db.fluent()
                        .update()
                        .in_col(collections::USERS)
                        .document_id(&user_doc_id)
                        .object(&user)
                        .add_to_transaction(transaction)?;

                    let parent_path = db.parent_path(collections::USERS, &user_doc_id)?;

                    for (position, card) in cards.iter().enumerate() {
                        let doc = CardDocument::new(position as u32, card);

                        db.fluent()
                            .update()
                            .in_col(col_id.as_str())
                            .document_id(format!("card-{:04}", position))
                            .parent(&parent_path)
                            .object(&doc)
                            .add_to_transaction(transaction)?;
                    }

                    Ok(Ok(()))
                })
            })
            .await
            .map_err(|e| AppError::Database(format!("Transaction failed: {}", e)))?;

        match outcome {
            Err(SaveDenied::NameTaken) => Err(AppError::CollectionExists(name.to_string())),
            Err(SaveDenied::QuotaExceeded) => Err(AppError::QuotaExceeded(format!(
                "free tier allows at most {} saved collection",
                FREE_COLLECTION_LIMIT
            ))),
            Ok(()) => {
                tracing::info!(
                    user_id,
                    collection = name,
                    cards = cards.len(),
                    "Collection saved atomically"
                );
                Ok(())
            }
        }
    }
}
