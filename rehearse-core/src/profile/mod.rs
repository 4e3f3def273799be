//! User profiles
//!
//! One document per user in the `users` collection, keyed by uid and created
//! the first time the user is seen.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::auth::Identity;
use crate::store::{DocumentStore, StoreError, USERS};

/// Name shown when a user has no display name
pub const DEFAULT_DISPLAY_NAME: &str = "User";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Display name, or the default when unset
    pub fn name_or_default(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(DEFAULT_DISPLAY_NAME)
    }
}

/// Reads and creates user profiles
#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn DocumentStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Profile for `uid`, if one exists
    pub async fn get(&self, uid: &str) -> Result<Option<UserProfile>, StoreError> {
        let Some(doc) = self.store.get(USERS, uid).await? else {
            return Ok(None);
        };
        let profile = serde_json::from_value(Value::Object(doc.fields))
            .map_err(|e| StoreError::corruption(USERS, uid, e.to_string()))?;
        Ok(Some(profile))
    }

    /// Return the caller's profile, creating it on first sight
    pub async fn ensure(&self, identity: &Identity) -> Result<UserProfile, StoreError> {
        if let Some(existing) = self.get(&identity.uid).await? {
            return Ok(existing);
        }

        let profile = UserProfile {
            uid: identity.uid.clone(),
            email: identity.email.clone(),
            display_name: identity.name.clone(),
            created_at: Utc::now(),
        };
        let fields = match serde_json::to_value(&profile)? {
            Value::Object(fields) => fields,
            _ => {
                return Err(StoreError::Backend(
                    "profile did not encode to an object".to_string(),
                ));
            }
        };
        self.store.set(USERS, &identity.uid, fields).await?;
        info!(uid = %identity.uid, "created user profile");
        Ok(profile)
    }
}
