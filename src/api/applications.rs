use crate::api::client::{execute, execute_json, ApiClient};
use crate::auth::Token;
use crate::types::{
    AppError, Application, AppliedJob, InterviewInvite, JobId, Result, SendEmailResponse,
};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info};

const APPLIED_JOBS_PATH: &str = "/api/applied-jobs/";
const APPLY_PATH: &str = "/api/apply-job/";
const APPLICATIONS_PATH: &str = "/api/job-applications/";
const SEND_EMAIL_PATH: &str = "/api/send-email/";

impl ApiClient {
    /// Ids of the jobs the logged-in candidate has applied to.
    pub async fn applied_job_ids(&self, token: Option<Token>) -> Result<Vec<JobId>> {
        let req = self.request(Method::GET, APPLIED_JOBS_PATH, token.as_ref());
        let applied: Vec<AppliedJob> = execute_json(req).await?;
        Ok(applied.into_iter().map(|a| a.job_id).collect())
    }

    /// `POST /api/apply-job/{id}/`. Requires a token.
    pub async fn apply(&self, token: Option<Token>, id: &JobId) -> Result<()> {
        let token = token.ok_or_else(|| {
            AppError::Auth("Not logged in. Run `jobboard login` first.".to_string())
        })?;
        let req = self.request_url(Method::POST, self.item_url(APPLY_PATH, id)?, Some(&token));
        execute(req).await?;
        info!(job_id = %id, "Applied to job");
        Ok(())
    }

    /// Applications for HR review, unwrapped from the `{"data": [...]}` envelope.
    pub async fn job_applications(&self, token: Option<Token>) -> Result<Vec<Application>> {
        let req = self.request(Method::GET, APPLICATIONS_PATH, token.as_ref());
        let envelope: Value = execute_json(req).await?;
        let applications = unwrap_applications(envelope)?;
        debug!(count = applications.len(), "Applications fetched");
        Ok(applications)
    }

    /// `POST /api/send-email/`; returns the server's `success` flag.
    pub async fn send_interview_invite(
        &self,
        token: Option<Token>,
        invite: &InterviewInvite,
    ) -> Result<bool> {
        let req = self
            .request(Method::POST, SEND_EMAIL_PATH, token.as_ref())
            .json(invite);
        let reply: SendEmailResponse = execute_json(req).await?;
        info!(to = %invite.to_email, success = reply.success, "Interview invite sent");
        Ok(reply.success)
    }
}

fn unwrap_applications(envelope: Value) -> Result<Vec<Application>> {
    match envelope {
        Value::Object(mut map) => match map.remove("data") {
            Some(data @ Value::Array(_)) => {
                serde_json::from_value(data).map_err(|e| AppError::Decode(e.to_string()))
            }
            _ => Err(AppError::Decode("Unexpected response format.".to_string())),
        },
        _ => Err(AppError::Decode("Unexpected response format.".to_string())),
    }
}
