//! CLI module for jobboard
//!
//! Provides command-line interface parsing for the `jobboard` binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.
//! Each command stands in for one page of the web client and is gated by the
//! same role check that page performs.

pub mod commands;
pub mod output;

use crate::types::{AppError, JobId, JobPatch, JobType, NewJob, Profile, RegisterRequest, Result, Role};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// jobboard - job-board client for HR, candidates and employees
#[derive(Parser, Debug)]
#[command(
    name = "jobboard",
    author = "Dirmacs <build@dirmacs.com>",
    version,
    about = "jobboard - command-line client for the job-board API",
    long_about = "Post and manage job listings as HR, browse and apply as a candidate,\n\
                  review applications and talk to the HR bot.\n\n\
                  Log in first; the session is stored locally and reused by every command.",
    after_help = "EXAMPLES:\n    \
                  jobboard login -u asha               # Log in (password from JOBBOARD_PASSWORD or --password)\n    \
                  jobboard jobs list                   # Show job postings\n    \
                  jobboard jobs update 4 --pay 95000   # Edit a posting (HR)\n    \
                  jobboard apply 4                     # Apply to a posting (Candidate)\n    \
                  jobboard chat \"leave policy?\"        # Ask the HR bot (HR, Employee)"
)]
pub struct Cli {
    /// Path to the configuration file (defaults to ./jobboard.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session locally
    Login {
        /// Account username
        #[arg(short, long)]
        username: String,

        /// Account password
        #[arg(short, long, env = "JOBBOARD_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// End the session on the server and remove it locally
    Logout,

    /// Create an account
    Register(RegisterArgs),

    /// Show the stored session
    Whoami,

    /// Browse and manage job postings
    #[command(subcommand)]
    Jobs(JobCommands),

    /// Apply to a job (Candidate)
    Apply {
        /// Job id
        id: JobId,
    },

    /// List the jobs you applied to (Candidate)
    Applied,

    /// Review applications (HR)
    #[command(subcommand)]
    Applications(ApplicationCommands),

    /// Talk to the HR bot (HR, Employee)
    ///
    /// With a prompt, sends it and prints the reply. Without one, reads
    /// prompts from stdin until EOF or `exit`.
    Chat {
        /// Prompt to send
        prompt: Option<String>,
    },

    /// Show configuration information
    Config {
        /// Only validate the configuration
        #[arg(long)]
        validate: bool,
    },
}

/// Job subcommands
#[derive(Subcommand, Debug)]
pub enum JobCommands {
    /// List job postings
    List {
        /// Show the full description of these jobs
        #[arg(long, value_name = "ID")]
        expand: Vec<JobId>,

        /// Print the raw records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Post a new job (HR)
    Post(PostJobArgs),

    /// Update fields of a job (HR)
    Update {
        /// Job id
        id: JobId,

        #[command(flatten)]
        fields: JobFieldArgs,
    },

    /// Delete a job (HR)
    Delete {
        /// Job id
        id: JobId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Application subcommands
#[derive(Subcommand, Debug)]
pub enum ApplicationCommands {
    /// List applications with applicant, job, status and score
    List,

    /// E-mail an interview invitation to an applicant
    Invite {
        /// Row number shown by `applications list`
        index: usize,

        /// Interview date
        #[arg(long)]
        date: String,

        /// Interview time
        #[arg(long)]
        time: String,

        /// Interview location
        #[arg(long)]
        location: String,

        /// Company name shown in the e-mail
        #[arg(long)]
        company: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(short, long)]
    pub username: String,

    #[arg(short, long)]
    pub email: String,

    #[arg(short, long, env = "JOBBOARD_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Defaults to the password
    #[arg(long)]
    pub confirm_password: Option<String>,

    /// HR, Candidate or Employee
    #[arg(short, long)]
    pub role: Role,

    /// Display name (HR, Candidate)
    #[arg(long)]
    pub name: Option<String>,

    /// Organization (HR, Employee)
    #[arg(long)]
    pub organization: Option<String>,

    /// Department (Employee)
    #[arg(long)]
    pub department: Option<String>,

    /// Position (Employee)
    #[arg(long)]
    pub position: Option<String>,

    /// CV file to upload (Candidate)
    #[arg(long)]
    pub cv: Option<PathBuf>,
}

fn required(value: Option<String>, flag: &str, role: Role) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput(format!("--{} is required for {}", flag, role)))
}

impl RegisterArgs {
    pub fn into_request(self) -> Result<RegisterRequest> {
        let role = self.role;
        let profile = match role {
            Role::Hr => Profile::Hr {
                name: required(self.name, "name", role)?,
                organization_name: required(self.organization, "organization", role)?,
            },
            Role::Employee => Profile::Employee {
                department: required(self.department, "department", role)?,
                position: required(self.position, "position", role)?,
                organization_name: required(self.organization, "organization", role)?,
            },
            Role::Candidate => Profile::Candidate {
                name: required(self.name, "name", role)?,
                cv: self.cv,
            },
        };

        Ok(RegisterRequest {
            confirm_password: self.confirm_password.unwrap_or_else(|| self.password.clone()),
            username: self.username,
            email: self.email,
            password: self.password,
            profile,
        })
    }
}

#[derive(Args, Debug)]
pub struct PostJobArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub description: String,

    #[arg(long)]
    pub location: String,

    /// Yearly pay
    #[arg(long)]
    pub pay: i64,

    #[arg(long)]
    pub qualification: String,

    #[arg(long)]
    pub experience: String,

    /// FT or PT
    #[arg(long, default_value = "PT")]
    pub job_type: JobType,
}

impl From<PostJobArgs> for NewJob {
    fn from(args: PostJobArgs) -> Self {
        Self {
            title: args.title,
            description: args.description,
            location: args.location,
            pay: args.pay,
            qualification: args.qualification,
            experience: args.experience,
            job_type: args.job_type,
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct JobFieldArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub pay: Option<i64>,

    #[arg(long)]
    pub qualification: Option<String>,

    #[arg(long)]
    pub experience: Option<String>,

    /// FT or PT
    #[arg(long)]
    pub job_type: Option<JobType>,
}

impl From<JobFieldArgs> for JobPatch {
    fn from(args: JobFieldArgs) -> Self {
        Self {
            title: args.title,
            description: args.description,
            location: args.location,
            pay: args.pay,
            qualification: args.qualification,
            experience: args.experience,
            job_type: args.job_type,
        }
    }
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
