//! # jobboard
//!
//! Typed client, client-side job store and CLI for the job-board REST API.
//!
//! ## Overview
//!
//! jobboard can be used in two ways:
//!
//! 1. **As a command-line tool** - Run the `jobboard` binary
//! 2. **As a library** - Embed the store and API clients in your own program
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use jobboard::{ApiClient, JobStore};
//! use jobboard::auth::credentials::MemoryCredentials;
//! use jobboard::types::{JobPatch, Role};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = Arc::new(ApiClient::with_base_url("http://localhost:8000")?);
//!     let session = api.login("asha", "secret").await?;
//!     let credentials = Arc::new(MemoryCredentials::new(session));
//!
//!     let store = JobStore::new(api, credentials);
//!     store.fetch_all().await?;
//!
//!     let patch = JobPatch {
//!         pay: Some(95_000),
//!         ..Default::default()
//!     };
//!     store.update_one(&4.into(), &patch).await?;
//!     println!("{} jobs, status {}", store.jobs().len(), store.status());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`store`] - Job cache with request status ([`JobStore`])
//! - [`api`] - REST client for jobs, accounts and applications, plus the chat bot client
//! - [`auth`] - Session, token and role checks ([`CredentialProvider`])
//! - [`chat`] - HR bot transcript
//! - [`types`] - Wire types and the crate error ([`AppError`])
//! - [`utils`] - Configuration loading and display helpers
//! - [`cli`] - Argument parsing, handlers and terminal output for the binary

pub mod api;
pub mod auth;
pub mod chat;
pub mod cli;
pub mod store;
pub mod types;
pub mod utils;

pub use api::{ApiClient, ChatClient, JobApi};
pub use auth::{CredentialProvider, SessionStore};
pub use store::{JobStore, JobStoreState, RequestStatus, StoreError};
pub use types::{AppError, Result};
pub use utils::config::JobBoardConfig;
