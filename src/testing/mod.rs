//! In-memory fixtures for exercising auth without a database

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::password::hash_password;
use crate::database::models::{Profile, UserCredentials};
use crate::database::{DatabaseError, ProfileStore};
use crate::types::{ApprovalStatus, Role};

struct StoredUser {
    email: String,
    password_hash: String,
    profile: Option<Profile>,
}

/// `ProfileStore` backed by a map, mutable from tests
#[derive(Default)]
pub struct MemoryProfileStore {
    users: RwLock<HashMap<Uuid, StoredUser>>,
}

impl MemoryProfileStore {
    pub async fn insert(&self, profile: Profile, password: &str) {
        let stored = StoredUser {
            email: profile.email.to_lowercase(),
            password_hash: hash_password(password).expect("hash"),
            profile: Some(profile.clone()),
        };
        self.users.write().await.insert(profile.user_id, stored);
    }

    /// Identity with no profile row
    pub async fn insert_orphan(&self, email: &str, password: &str) -> Uuid {
        let id = Uuid::new_v4();
        let stored = StoredUser {
            email: email.to_lowercase(),
            password_hash: hash_password(password).expect("hash"),
            profile: None,
        };
        self.users.write().await.insert(id, stored);
        id
    }

    pub async fn set_role(&self, user_id: Uuid, role: Role) {
        if let Some(profile) = self.users.write().await.get_mut(&user_id).and_then(|u| u.profile.as_mut()) {
            profile.role = role;
        }
    }

    pub async fn set_status(&self, user_id: Uuid, status: ApprovalStatus) {
        if let Some(profile) = self.users.write().await.get_mut(&user_id).and_then(|u| u.profile.as_mut()) {
            profile.approval_status = status;
        }
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn profile_by_user_id(&self, user_id: Uuid) -> Result<Option<Profile>, DatabaseError> {
        Ok(self.users.read().await.get(&user_id).and_then(|u| u.profile.clone()))
    }

    async fn credentials_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DatabaseError> {
        let email = email.to_lowercase();
        let users = self.users.read().await;
        Ok(users.iter().find(|(_, u)| u.email == email).map(|(id, u)| UserCredentials {
            user_id: *id,
            email: u.email.clone(),
            password_hash: u.password_hash.clone(),
            profile: u.profile.clone(),
        }))
    }
}

/// `ProfileStore` whose every read fails, for checking fail-closed paths
pub struct FailingProfileStore;

#[async_trait]
impl ProfileStore for FailingProfileStore {
    async fn profile_by_user_id(&self, _user_id: Uuid) -> Result<Option<Profile>, DatabaseError> {
        Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
    }

    async fn credentials_by_email(&self, _email: &str) -> Result<Option<UserCredentials>, DatabaseError> {
        Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
    }
}
