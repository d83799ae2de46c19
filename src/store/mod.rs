//! Client-side job store
//!
//! [`JobStore`] caches the remote job collection and the status of the most
//! recent request. It is synchronized with the server by three operations:
//!
//! | Operation | On success | On failure |
//! |-----------|------------|------------|
//! | [`fetch_all`](JobStore::fetch_all) | `jobs` replaced wholesale | `jobs` untouched |
//! | [`update_one`](JobStore::update_one) | matching record replaced in place | `jobs` untouched |
//! | [`delete_one`](JobStore::delete_one) | matching record removed | `jobs` untouched |
//!
//! Every operation sets `status` to `Loading` and clears `error` when it
//! starts, then ends in `Success` or `Failed` with an [`StoreError`]. The
//! status is shared by all operations, so with overlapping calls it reflects
//! whichever resolved last. Calls are not queued or cancelled.
//!
//! The bearer token is taken from the [`CredentialProvider`] at the start of
//! each operation.
//!
//! # Example
//!
//! ```ignore
//! use jobboard::{ApiClient, JobStore};
//! use jobboard::auth::credentials::FileCredentials;
//! use std::sync::Arc;
//!
//! let api = Arc::new(ApiClient::with_base_url("http://localhost:8000")?);
//! let credentials = Arc::new(FileCredentials::new(".jobboard/session.json"));
//! let store = JobStore::new(api, credentials);
//!
//! store.fetch_all().await?;
//! for job in store.jobs() {
//!     println!("{} {}", job.id, job.title().unwrap_or("Untitled"));
//! }
//! ```

use crate::api::JobApi;
use crate::auth::CredentialProvider;
use crate::types::{describe_error_body, AppError, Job, JobId, JobPatch};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error};

const FETCH_FALLBACK: &str = "Error fetching jobs";
const UPDATE_FALLBACK: &str = "Error updating job";
const DELETE_FALLBACK: &str = "Error deleting job";

/// Status of the most recently started operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Failed,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Failure recorded by the store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// The request never got a response.
    #[error("{0}")]
    Transport(String),

    /// The server answered with a non-2xx status; `body` is its reply verbatim.
    #[error("{}", describe_error_body(.body))]
    Server { status: u16, body: Value },

    /// Anything else, including a success reply of the wrong shape.
    #[error("{0}")]
    Unknown(String),
}

impl StoreError {
    /// Text suitable for showing to the user.
    pub fn message(&self) -> String {
        self.to_string()
    }

    fn from_app(err: AppError, fallback: &str) -> Self {
        match err {
            AppError::Transport(_) => Self::Transport(fallback.to_string()),
            AppError::Server {
                status,
                body: Value::Null,
            } => Self::Server {
                status,
                body: Value::String(fallback.to_string()),
            },
            AppError::Server { status, body } => Self::Server { status, body },
            AppError::Decode(cause) => Self::Unknown(format!("{}: {}", fallback, cause)),
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Snapshot of the store.
///
/// `error` is `Some` exactly when `status` is [`RequestStatus::Failed`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobStoreState {
    pub jobs: Vec<Job>,
    pub status: RequestStatus,
    pub error: Option<StoreError>,
}

impl JobStoreState {
    /// Drops an `error` outside `Failed`; a `Failed` with no error becomes `Idle`.
    fn normalized(mut self) -> Self {
        match (self.status, &self.error) {
            (RequestStatus::Failed, None) => self.status = RequestStatus::Idle,
            (RequestStatus::Failed, Some(_)) => {}
            _ => self.error = None,
        }
        self
    }
}

/// Cache of job postings plus last-request status.
pub struct JobStore {
    api: Arc<dyn JobApi>,
    credentials: Arc<dyn CredentialProvider>,
    state: watch::Sender<JobStoreState>,
}

impl fmt::Debug for JobStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobStore")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl JobStore {
    /// Empty store in the `Idle` state.
    pub fn new(api: Arc<dyn JobApi>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self::with_state(api, credentials, JobStoreState::default())
    }

    /// Store restored from an earlier snapshot.
    ///
    /// The snapshot is normalized so `error` is set only with `Failed`.
    pub fn with_state(
        api: Arc<dyn JobApi>,
        credentials: Arc<dyn CredentialProvider>,
        state: JobStoreState,
    ) -> Self {
        let (state, _) = watch::channel(state.normalized());
        Self {
            api,
            credentials,
            state,
        }
    }

    pub fn snapshot(&self) -> JobStoreState {
        self.state.borrow().clone()
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.state.borrow().jobs.clone()
    }

    pub fn status(&self) -> RequestStatus {
        self.state.borrow().status
    }

    pub fn error(&self) -> Option<StoreError> {
        self.state.borrow().error.clone()
    }

    /// Receiver notified on every state transition.
    pub fn subscribe(&self) -> watch::Receiver<JobStoreState> {
        self.state.subscribe()
    }

    /// Replace the cached list with the server's collection.
    pub async fn fetch_all(&self) -> Result<(), StoreError> {
        let token = self.credentials.token();
        self.begin();

        match self.api.list_jobs(token).await {
            Ok(jobs) => {
                debug!(count = jobs.len(), "Jobs fetched successfully");
                self.state.send_modify(|state| {
                    state.jobs = jobs;
                    state.status = RequestStatus::Success;
                    state.error = None;
                });
                Ok(())
            }
            Err(e) => {
                error!("Fetch jobs error: {}", e);
                Err(self.fail(StoreError::from_app(e, FETCH_FALLBACK)))
            }
        }
    }

    /// Partially update one job and splice the server's record into the list.
    ///
    /// The record is located by the `id` of the returned job. When no cached
    /// record matches, the list is left as is and the call still succeeds.
    pub async fn update_one(&self, id: &JobId, patch: &JobPatch) -> Result<Job, StoreError> {
        let token = self.credentials.token();
        self.begin();

        match self.api.update_job(token, id, patch).await {
            Ok(updated) => {
                debug!(job_id = %updated.id, "Job updated successfully");
                let returned = updated.clone();
                self.state.send_modify(|state| {
                    replace_by_id(&mut state.jobs, updated);
                    state.status = RequestStatus::Success;
                    state.error = None;
                });
                Ok(returned)
            }
            Err(e) => {
                error!(job_id = %id, "Update job error: {}", e);
                Err(self.fail(StoreError::from_app(e, UPDATE_FALLBACK)))
            }
        }
    }

    /// Delete one job on the server and drop it from the list.
    pub async fn delete_one(&self, id: &JobId) -> Result<(), StoreError> {
        let token = self.credentials.token();
        self.begin();

        match self.api.delete_job(token, id).await {
            Ok(()) => {
                debug!(job_id = %id, "Job deleted successfully");
                self.state.send_modify(|state| {
                    state.jobs.retain(|job| &job.id != id);
                    state.status = RequestStatus::Success;
                    state.error = None;
                });
                Ok(())
            }
            Err(e) => {
                error!(job_id = %id, "Delete job error: {}", e);
                Err(self.fail(StoreError::from_app(e, DELETE_FALLBACK)))
            }
        }
    }

    fn begin(&self) {
        self.state.send_modify(|state| {
            state.status = RequestStatus::Loading;
            state.error = None;
        });
    }

    fn fail(&self, err: StoreError) -> StoreError {
        let recorded = err.clone();
        self.state.send_modify(|state| {
            state.status = RequestStatus::Failed;
            state.error = Some(recorded);
        });
        err
    }
}

/// Put `updated` where the first record with its id sits and drop any later
/// record with the same id. No match leaves `jobs` untouched.
fn replace_by_id(jobs: &mut Vec<Job>, updated: Job) {
    let Some(index) = jobs.iter().position(|job| job.id == updated.id) else {
        return;
    };

    let id = updated.id.clone();
    jobs[index] = updated;

    let mut position = 0;
    jobs.retain(|job| {
        let keep = job.id != id || position == index;
        position += 1;
        keep
    });
}
