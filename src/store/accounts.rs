use std::sync::Arc;

use crate::{
    auth::PasswordHasher,
    error::AppError,
    models::{Account, NewAccount},
};

use super::{AccountRepository, StoreError, UniqueField};

pub const USERNAME_TAKEN: &str = "Username already registered";
pub const EMAIL_TAKEN: &str = "Email already registered";

/// Account creation and lookup. Owns the password hashing step so plaintext never
/// reaches the repository.
#[derive(Clone)]
pub struct AccountStore {
    repo: Arc<dyn AccountRepository>,
    hasher: PasswordHasher,
}

impl AccountStore {
    pub fn new(repo: Arc<dyn AccountRepository>, hasher: PasswordHasher) -> Self {
        Self { repo, hasher }
    }

    /// Hashes `password` and persists a new account.
    ///
    /// Callers check for existing usernames/emails first; a uniqueness race lost at the
    /// storage layer still surfaces as `AppError::Conflict`.
    pub async fn create_account(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Account, AppError> {
        let hasher = self.hasher;
        let password = password.to_owned();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))??;

        let new_account = NewAccount {
            username: username.to_owned(),
            email: email.to_owned(),
            password_hash,
        };

        self.repo
            .insert_account(new_account)
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(UniqueField::Username) => {
                    AppError::Conflict(USERNAME_TAKEN.into())
                }
                StoreError::UniqueViolation(UniqueField::Email) => {
                    AppError::Conflict(EMAIL_TAKEN.into())
                }
                other => AppError::Store(other),
            })
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        self.repo.find_account_by_username(username).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        self.repo.find_account_by_email(email).await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Account>, StoreError> {
        self.repo.find_account_by_id(id).await
    }

    /// Login credential check: the active account named `username` whose stored hash
    /// matches `password`, or `None`.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Account>, AppError> {
        let account = match self.find_by_username(username).await? {
            Some(account) if account.is_active => account,
            Some(_) => {
                log::info!("Login refused for inactive account {:?}", username);
                return Ok(None);
            }
            None => return Ok(None),
        };

        let hasher = self.hasher;
        let password = password.to_owned();
        let stored_hash = account.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?;

        Ok(matches.then_some(account))
    }
}
