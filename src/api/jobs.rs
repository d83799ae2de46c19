use crate::api::client::{execute, execute_json, ApiClient};
use crate::api::JobApi;
use crate::auth::Token;
use crate::types::{Job, JobId, JobPatch, NewJob, Result};
use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;

const JOBS_PATH: &str = "/api/jobs/";

#[async_trait]
impl JobApi for ApiClient {
    async fn list_jobs(&self, token: Option<Token>) -> Result<Vec<Job>> {
        let req = self.request(Method::GET, JOBS_PATH, token.as_ref());
        let jobs: Vec<Job> = execute_json(req).await?;
        debug!(count = jobs.len(), "Jobs fetched");
        Ok(jobs)
    }

    async fn update_job(&self, token: Option<Token>, id: &JobId, patch: &JobPatch) -> Result<Job> {
        let req = self
            .request_url(Method::PATCH, self.item_url(JOBS_PATH, id)?, token.as_ref())
            .json(patch);
        let job: Job = execute_json(req).await?;
        debug!(job_id = %job.id, "Job updated");
        Ok(job)
    }

    async fn delete_job(&self, token: Option<Token>, id: &JobId) -> Result<()> {
        let req = self.request_url(Method::DELETE, self.item_url(JOBS_PATH, id)?, token.as_ref());
        execute(req).await?;
        debug!(job_id = %id, "Job deleted");
        Ok(())
    }
}

impl ApiClient {
    /// `POST /api/jobs/`; returns the created record.
    pub async fn create_job(&self, token: Option<Token>, job: &NewJob) -> Result<Job> {
        let req = self
            .request(Method::POST, JOBS_PATH, token.as_ref())
            .json(job);
        let created: Job = execute_json(req).await?;
        debug!(job_id = %created.id, "Job posted");
        Ok(created)
    }
}
