use std::sync::Arc;

use anyhow::Context;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::auth::dto::normalize_email;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo::UserRepo;
use crate::auth::repo_types::{NewUser, UserSummary};
use crate::db::Insert;
use crate::error::AppError;

// Hashed against when the email is unknown, so both failure paths cost one PBKDF2 run.
const DUMMY_SALT: &str = "0000000000000000000000000000000000000000000000000000000000000000";

#[derive(Clone)]
pub struct UserStore {
    repo: Arc<dyn UserRepo>,
}

impl UserStore {
    pub fn new(repo: Arc<dyn UserRepo>) -> Self {
        Self { repo }
    }

    /// Register a user. Input shape (name/password length, email format) is
    /// checked at the request boundary; uniqueness is left to the storage layer.
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<i64, AppError> {
        let email = normalize_email(email);
        let plain = password.to_owned();
        let (password_hash, salt) = tokio::task::spawn_blocking(move || hash_password(&plain, None))
            .await
            .context("password hashing task")?;

        let new_user = NewUser {
            name: name.trim().to_owned(),
            email,
            password_hash,
            salt,
        };
        match self.repo.insert_user(new_user).await? {
            Insert::Created(id) => {
                info!(user_id = id, "user registered");
                Ok(id)
            }
            Insert::Conflict => {
                warn!("registration with an email already in use");
                Err(AppError::DuplicateEmail)
            }
        }
    }

    /// Check credentials of an active user and stamp `last_login`.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<UserSummary, AppError> {
        let email = normalize_email(email);
        let plain = password.to_owned();

        let Some(user) = self.repo.find_active_by_email(&email).await? else {
            let _ = tokio::task::spawn_blocking(move || hash_password(&plain, Some(DUMMY_SALT))).await;
            warn!("login for unknown or inactive email");
            return Err(AppError::InvalidCredentials);
        };

        let (stored_hash, salt) = (user.password_hash.clone(), user.salt.clone());
        let ok = tokio::task::spawn_blocking(move || verify_password(&plain, &stored_hash, &salt))
            .await
            .context("password verification task")?;
        if !ok {
            warn!(user_id = user.id, "login with invalid password");
            return Err(AppError::InvalidCredentials);
        }

        self.repo
            .touch_last_login(user.id, OffsetDateTime::now_utc())
            .await?;
        info!(user_id = user.id, "user logged in");
        Ok(user.summary())
    }

    pub async fn find_active(&self, user_id: i64) -> Result<Option<UserSummary>, AppError> {
        Ok(self.repo.find_active_by_id(user_id).await?)
    }
}
