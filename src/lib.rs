#![doc = "The `taskdesk` library crate."]
#![doc = ""]
#![doc = "A per-user task tracker: account signup, password login issuing bearer tokens,"]
#![doc = "and owner-scoped task CRUD. The binary (`main.rs`) wires configuration, storage"]
#![doc = "and the HTTP server around the pieces declared here."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use crate::error::AppError;
pub use crate::state::AppState;
