use std::sync::Arc;

use crate::{
    auth::{PasswordHasher, TokenService},
    config::Config,
    store::{AccountRepository, AccountStore, TaskRepository, TaskStore},
};

/// Collaborators shared by every handler, registered once as `web::Data<AppState>`.
pub struct AppState {
    pub accounts: AccountStore,
    pub tasks: TaskStore,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(accounts: AccountStore, tasks: TaskStore, tokens: TokenService) -> Self {
        Self {
            accounts,
            tasks,
            tokens,
        }
    }

    /// Wires the stores and token service around a backend that holds both accounts and tasks.
    pub fn from_config<S>(config: &Config, store: Arc<S>) -> Self
    where
        S: AccountRepository + TaskRepository,
    {
        let accounts = AccountStore::new(store.clone(), PasswordHasher::new(config.bcrypt_cost));
        let tasks = TaskStore::new(store);
        let tokens = TokenService::new(config.jwt_secret.as_bytes(), config.token_ttl());
        Self::new(accounts, tasks, tokens)
    }
}
