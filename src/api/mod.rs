//! Clients for the job-board REST API
//!
//! # Module Structure
//!
//! - [`api::client`](crate::api::client) - shared reqwest client, URL joining and error mapping
//! - [`api::jobs`](crate::api::jobs) - job collection (list, post, update, delete)
//! - [`api::accounts`](crate::api::accounts) - login, registration and logout
//! - [`api::applications`](crate::api::applications) - applying and reviewing applications
//! - [`api::chat`](crate::api::chat) - HR chat bot service
//!
//! # Endpoints
//!
//! ## Jobs (`/api/jobs/`)
//! - `GET /api/jobs/` - List jobs
//! - `POST /api/jobs/` - Post a job
//! - `PATCH /api/jobs/{id}/` - Partially update a job
//! - `DELETE /api/jobs/{id}/` - Delete a job
//!
//! ## Accounts
//! - `POST /api/login/` - Obtain access/refresh tokens and role
//! - `POST /api/register/` - Create an account (multipart for candidates)
//! - `POST /api/logout/` - End the server-side session
//!
//! ## Applications
//! - `GET /api/applied-jobs/` - Jobs the candidate applied to
//! - `POST /api/apply-job/{id}/` - Apply to a job
//! - `GET /api/job-applications/` - Applications for HR review
//! - `POST /api/send-email/` - E-mail an interview invitation
//!
//! All authenticated calls send `Authorization: Bearer <token>` when a token
//! is available. Non-2xx replies become [`AppError::Server`](crate::types::AppError::Server)
//! carrying the response body verbatim.

/// Login, registration and logout.
pub mod accounts;
/// Applications and interview invitations.
pub mod applications;
/// HR chat bot client.
pub mod chat;
/// Shared HTTP plumbing.
pub mod client;
/// Job collection endpoints and the [`JobApi`] implementation.
pub mod jobs;

pub use chat::ChatClient;
pub use client::ApiClient;

use crate::auth::Token;
use crate::types::{Job, JobId, JobPatch, Result};
use async_trait::async_trait;

/// Remote job collection used by [`JobStore`](crate::store::JobStore).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobApi: Send + Sync {
    /// `GET /api/jobs/`
    async fn list_jobs(&self, token: Option<Token>) -> Result<Vec<Job>>;

    /// `PATCH /api/jobs/{id}/`; returns the server's full record.
    async fn update_job(&self, token: Option<Token>, id: &JobId, patch: &JobPatch) -> Result<Job>;

    /// `DELETE /api/jobs/{id}/`
    async fn delete_job(&self, token: Option<Token>, id: &JobId) -> Result<()>;
}
