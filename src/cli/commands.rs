//! Command handlers
//!
//! One handler per subcommand. Handlers check the session role first, the
//! way each page of the web client redirects away when the role is wrong.

use crate::api::{ApiClient, ChatClient};
use crate::auth::credentials::FileCredentials;
use crate::auth::{require_any_role, require_role, CredentialProvider};
use crate::chat::{ChatTranscript, Sender};
use crate::cli::output::Output;
use crate::cli::{ApplicationCommands, Cli, Commands, JobCommands, RegisterArgs};
use crate::store::JobStore;
use crate::types::{AppError, InterviewDetails, InterviewInvite, JobId, JobPatch, NewJob, Role};
use crate::utils::config::JobBoardConfig;
use crate::utils::display::DescriptionToggles;
use anyhow::{anyhow, bail, Context as _};
use chrono::Utc;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, warn};

/// Shared state for one CLI invocation.
pub struct Context<'a> {
    pub config: JobBoardConfig,
    pub output: &'a Output,
    pub api: Arc<ApiClient>,
    pub credentials: Arc<FileCredentials>,
}

impl<'a> Context<'a> {
    pub fn new(config: JobBoardConfig, output: &'a Output) -> anyhow::Result<Self> {
        let api = ApiClient::new(&config.api).context("Failed to create API client")?;
        let credentials = FileCredentials::new(config.session.path.clone());
        Ok(Self {
            config,
            output,
            api: Arc::new(api),
            credentials: Arc::new(credentials),
        })
    }

    fn store(&self) -> JobStore {
        JobStore::new(self.api.clone(), self.credentials.clone())
    }
}

/// Dispatch the parsed command line.
pub async fn run(cli: Cli, config: JobBoardConfig, output: &Output) -> anyhow::Result<()> {
    let ctx = Context::new(config, output)?;
    debug!(api = %ctx.api.base_url(), session = %ctx.credentials.path().display(), "Dispatching command");

    match cli.command {
        Commands::Login { username, password } => login(&ctx, &username, &password).await,
        Commands::Logout => logout(&ctx).await,
        Commands::Register(args) => register(&ctx, args).await,
        Commands::Whoami => whoami(&ctx),
        Commands::Jobs(JobCommands::List { expand, json }) => list_jobs(&ctx, &expand, json).await,
        Commands::Jobs(JobCommands::Post(args)) => post_job(&ctx, args.into()).await,
        Commands::Jobs(JobCommands::Update { id, fields }) => {
            update_job(&ctx, &id, fields.into()).await
        }
        Commands::Jobs(JobCommands::Delete { id, yes }) => delete_job(&ctx, &id, yes).await,
        Commands::Apply { id } => apply(&ctx, &id).await,
        Commands::Applied => applied(&ctx).await,
        Commands::Applications(ApplicationCommands::List) => list_applications(&ctx).await,
        Commands::Applications(ApplicationCommands::Invite {
            index,
            date,
            time,
            location,
            company,
        }) => {
            let details = InterviewDetails {
                date,
                time,
                location,
            };
            invite(&ctx, index, &details, company.as_deref()).await
        }
        Commands::Chat { prompt } => chat(&ctx, prompt).await,
        Commands::Config { validate } => show_config(&ctx, validate),
    }
}

async fn login(ctx: &Context<'_>, username: &str, password: &str) -> anyhow::Result<()> {
    let role = ctx
        .api
        .login_and_store(ctx.credentials.as_ref(), username, password)
        .await?;

    ctx.output.success(&format!("Logged in as {} ({})", username, role));
    ctx.output.hint("Next:");
    ctx.output.command(landing_command(role));
    Ok(())
}

/// Command that shows the page a role lands on after login.
pub fn landing_command(role: Role) -> &'static str {
    match role {
        Role::Hr | Role::Candidate => "jobboard jobs list",
        Role::Employee => "jobboard chat",
    }
}

async fn logout(ctx: &Context<'_>) -> anyhow::Result<()> {
    ctx.api
        .logout(ctx.credentials.as_ref())
        .await
        .context("Logout failed")?;
    ctx.output.success("Logged out");
    Ok(())
}

async fn register(ctx: &Context<'_>, args: RegisterArgs) -> anyhow::Result<()> {
    let request = args.into_request()?;
    if request.password != request.confirm_password {
        bail!(AppError::InvalidInput("Passwords do not match.".to_string()));
    }

    ctx.api.register(&request).await?;
    ctx.output.success("Registered successfully!");
    ctx.output.hint("Log in with:");
    ctx.output
        .command(&format!("jobboard login -u {}", request.username));
    Ok(())
}

fn whoami(ctx: &Context<'_>) -> anyhow::Result<()> {
    let session = ctx.credentials.session();
    ctx.output.header("Session");
    ctx.output.kv(
        "Role",
        session.role.map(|r| r.as_str()).unwrap_or("none"),
    );
    ctx.output.kv(
        "Logged in",
        if session.is_authenticated() { "yes" } else { "no" },
    );
    ctx.output
        .kv("Session file", &ctx.credentials.path().display().to_string());
    ctx.output.newline();
    Ok(())
}

async fn list_jobs(ctx: &Context<'_>, expand: &[JobId], json: bool) -> anyhow::Result<()> {
    let session = require_any_role(
        ctx.credentials.as_ref(),
        &[Role::Hr, Role::Candidate, Role::Employee],
    )?;
    let store = ctx.store();
    store.fetch_all().await?;
    let jobs = store.jobs();

    if json {
        println!("{}", serde_json::to_string_pretty(&jobs)?);
        return Ok(());
    }

    let applied: Option<HashSet<JobId>> = if session.role == Some(Role::Candidate) {
        match ctx.api.applied_job_ids(ctx.credentials.token()).await {
            Ok(ids) => Some(ids.into_iter().collect()),
            Err(e) => {
                warn!(error = %e, "Could not load applied jobs");
                Some(HashSet::new())
            }
        }
    } else {
        None
    };

    let mut toggles = DescriptionToggles::new();
    for id in expand {
        toggles.toggle(id);
    }

    let title = match session.role {
        Some(Role::Hr) => "Posted Jobs",
        _ => "Available Jobs",
    };
    ctx.output.header(title);
    if jobs.is_empty() {
        ctx.output.info("No jobs posted yet.");
    }

    let now = Utc::now();
    for job in &jobs {
        let marker = applied.as_ref().map(|ids| ids.contains(&job.id));
        ctx.output.job_card(job, now, &toggles, marker);
    }
    ctx.output.newline();
    Ok(())
}

async fn post_job(ctx: &Context<'_>, job: NewJob) -> anyhow::Result<()> {
    let session = require_role(ctx.credentials.as_ref(), Role::Hr)?;
    let created = ctx.api.create_job(session.access_token, &job).await?;
    ctx.output
        .success(&format!("Job posted (#{})", created.id));
    Ok(())
}

async fn update_job(ctx: &Context<'_>, id: &JobId, patch: JobPatch) -> anyhow::Result<()> {
    require_role(ctx.credentials.as_ref(), Role::Hr)?;
    if patch.is_empty() {
        bail!(AppError::InvalidInput(
            "Nothing to update. Pass at least one field flag.".to_string()
        ));
    }

    let store = ctx.store();
    store.fetch_all().await?;
    let updated = store.update_one(id, &patch).await?;

    ctx.output.success(&format!("Job #{} updated", updated.id));
    ctx.output
        .job_card(&updated, Utc::now(), &DescriptionToggles::new(), None);
    ctx.output.newline();
    Ok(())
}

async fn delete_job(ctx: &Context<'_>, id: &JobId, yes: bool) -> anyhow::Result<()> {
    require_role(ctx.credentials.as_ref(), Role::Hr)?;
    if !yes && !ctx.output.confirm(&format!("Delete job #{}?", id)).await {
        ctx.output.info("Cancelled");
        return Ok(());
    }

    ctx.store().delete_one(id).await?;
    ctx.output.success(&format!("Job #{} deleted", id));
    Ok(())
}

async fn apply(ctx: &Context<'_>, id: &JobId) -> anyhow::Result<()> {
    let session = require_role(ctx.credentials.as_ref(), Role::Candidate)?;
    if let Err(e) = ctx.api.apply(session.access_token, id).await {
        error!(job_id = %id, error = %e, "Apply failed");
        return Err(anyhow!(apply_failure(&e)));
    }
    ctx.output.success("Applied successfully!");
    Ok(())
}

/// Message shown when applying fails: the server's `detail`, if any.
pub fn apply_failure(err: &AppError) -> String {
    match err {
        AppError::Server { body, .. } => body
            .get("detail")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| "Failed to apply.".to_string()),
        AppError::Auth(message) => message.clone(),
        _ => "Failed to apply.".to_string(),
    }
}

async fn applied(ctx: &Context<'_>) -> anyhow::Result<()> {
    let session = require_role(ctx.credentials.as_ref(), Role::Candidate)?;
    let ids = ctx.api.applied_job_ids(session.access_token).await?;

    ctx.output.header("Applied Jobs");
    if ids.is_empty() {
        ctx.output.info("You have not applied to any jobs yet.");
    }
    for id in ids {
        ctx.output.kv("Job", &format!("#{}", id));
    }
    ctx.output.newline();
    Ok(())
}

async fn list_applications(ctx: &Context<'_>) -> anyhow::Result<()> {
    let session = require_role(ctx.credentials.as_ref(), Role::Hr)?;
    let applications = ctx.api.job_applications(session.access_token).await?;

    ctx.output.header("Job Applications");
    if applications.is_empty() {
        ctx.output.info("No applications found.");
        return Ok(());
    }
    ctx.output
        .table_header(&["#", "Applicant", "Job", "Status", "Score"]);
    for (i, application) in applications.iter().enumerate() {
        ctx.output.application_row(i + 1, application);
    }
    ctx.output.newline();
    Ok(())
}

async fn invite(
    ctx: &Context<'_>,
    index: usize,
    details: &InterviewDetails,
    company: Option<&str>,
) -> anyhow::Result<()> {
    let session = require_role(ctx.credentials.as_ref(), Role::Hr)?;
    let applications = ctx.api.job_applications(session.access_token.clone()).await?;
    let application = index
        .checked_sub(1)
        .and_then(|i| applications.get(i))
        .ok_or_else(|| {
            AppError::InvalidInput(format!(
                "No application #{} ({} listed)",
                index,
                applications.len()
            ))
        })?;

    let invite = InterviewInvite::for_application(application, details, company)?;
    if ctx
        .api
        .send_interview_invite(session.access_token, &invite)
        .await?
    {
        ctx.output
            .success(&format!("Email sent successfully to {}", invite.to_email));
    } else {
        ctx.output.warning("The server did not confirm the e-mail was sent.");
    }
    Ok(())
}

async fn chat(ctx: &Context<'_>, prompt: Option<String>) -> anyhow::Result<()> {
    let session = require_any_role(ctx.credentials.as_ref(), &[Role::Hr, Role::Employee])?;
    let role = session.role.context("Session has no role")?;
    let client = ChatClient::new(&ctx.config.chat)?;
    let mut transcript = ChatTranscript::new();
    let mut seen = 0;

    if let Some(prompt) = prompt {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            bail!(AppError::InvalidInput("Prompt is empty.".to_string()));
        }
        seen = transcript.messages().len();
        let reply = client.send(prompt, role).await?;
        transcript.push_exchange(prompt, reply);
        print_replies(ctx.output, &transcript, &mut seen);
        return Ok(());
    }

    print_replies(ctx.output, &transcript, &mut seen);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if matches!(line, "exit" | "quit") {
            break;
        }
        if line.is_empty() {
            continue;
        }

        match client.send(line, role).await {
            Ok(reply) => {
                transcript.push_exchange(line, reply);
                print_replies(ctx.output, &transcript, &mut seen);
            }
            Err(e) => {
                error!(error = %e, "Chat request failed");
                ctx.output.error(&e.to_string());
            }
        }
    }
    Ok(())
}

/// Print bot messages added to `transcript` since `seen`; prompts are already on screen.
fn print_replies(output: &Output, transcript: &ChatTranscript, seen: &mut usize) {
    let new = transcript.messages_since(*seen);
    for message in new.iter().filter(|m| m.sender == Sender::Bot) {
        output.chat_message(message);
    }
    *seen += new.len();
}

fn show_config(ctx: &Context<'_>, validate: bool) -> anyhow::Result<()> {
    ctx.config.validate()?;
    if validate {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }
    print!("{}", ctx.config.to_toml()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_apply_failure_uses_server_detail() {
        let err = AppError::Server {
            status: 400,
            body: json!({"detail": "Already applied."}),
        };
        assert_eq!(apply_failure(&err), "Already applied.");
    }

    #[test]
    fn test_apply_failure_fallback() {
        let err = AppError::Server {
            status: 500,
            body: Value::Null,
        };
        assert_eq!(apply_failure(&err), "Failed to apply.");
        assert_eq!(
            apply_failure(&AppError::Transport("connection refused".into())),
            "Failed to apply."
        );
    }

    #[test]
    fn test_landing_command() {
        assert_eq!(landing_command(Role::Employee), "jobboard chat");
        assert_eq!(landing_command(Role::Hr), "jobboard jobs list");
    }
}
