use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

// ============= Job Types =============

/// Server-assigned job identifier, compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobId {
    Number(i64),
    Text(String),
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl FromStr for JobId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AppError::InvalidInput("Job id cannot be empty".to_string()));
        }
        Ok(s.parse::<i64>()
            .map(Self::Number)
            .unwrap_or_else(|_| Self::Text(s.to_string())))
    }
}

impl From<i64> for JobId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl From<i32> for JobId {
    fn from(id: i32) -> Self {
        Self::Number(i64::from(id))
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

/// One job posting as returned by the server.
///
/// Only `id` is interpreted; every other field is carried through untouched.
/// The accessors read the fields the job pages display and return `None`
/// instead of failing when the server omits or mistypes one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Job {
    pub fn new(id: impl Into<JobId>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Builder-style field setter, mostly useful in tests.
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.str_field("Title")
    }

    pub fn description(&self) -> Option<&str> {
        self.str_field("Description")
    }

    pub fn location(&self) -> Option<&str> {
        self.str_field("Location")
    }

    pub fn qualification(&self) -> Option<&str> {
        self.str_field("Qualification")
    }

    pub fn experience(&self) -> Option<&str> {
        self.str_field("Experience")
    }

    /// Yearly pay; accepts a JSON number or a numeric string.
    pub fn pay(&self) -> Option<i64> {
        match self.fields.get("Pay")? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn job_type(&self) -> Option<JobType> {
        self.str_field("JobType").map(JobType::from_code)
    }

    /// Posting timestamp from `PostDate` (RFC 3339, naive datetime or plain date).
    pub fn posted_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.str_field("PostDate")?)
    }

    fn poster(&self) -> Option<&Map<String, Value>> {
        self.fields.get("PostedByHR").and_then(Value::as_object)
    }

    pub fn organization_name(&self) -> Option<&str> {
        self.poster()?.get("OrganizationName").and_then(Value::as_str)
    }

    pub fn poster_name(&self) -> Option<&str> {
        self.poster()?.get("Name").and_then(Value::as_str)
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Employment type as encoded by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum JobType {
    #[serde(rename = "FT")]
    FullTime,
    #[default]
    #[serde(rename = "PT")]
    PartTime,
}

impl JobType {
    /// Anything other than `FT` is part-time.
    pub fn from_code(code: &str) -> Self {
        if code == "FT" {
            Self::FullTime
        } else {
            Self::PartTime
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::FullTime => "FT",
            Self::PartTime => "PT",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FullTime => "Full-time",
            Self::PartTime => "Part-time",
        }
    }
}

impl FromStr for JobType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ft" | "full-time" | "fulltime" | "full" => Ok(Self::FullTime),
            "pt" | "part-time" | "parttime" | "part" => Ok(Self::PartTime),
            _ => Err(AppError::InvalidInput(format!(
                "Unknown job type: {}. Use: FT, PT",
                s
            ))),
        }
    }
}

/// Partial update for `PATCH /api/jobs/{id}/`; unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPatch {
    #[serde(rename = "Title", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "Location", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "Pay", skip_serializing_if = "Option::is_none")]
    pub pay: Option<i64>,
    #[serde(rename = "Qualification", skip_serializing_if = "Option::is_none")]
    pub qualification: Option<String>,
    #[serde(rename = "Experience", skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(rename = "JobType", skip_serializing_if = "Option::is_none")]
    pub job_type: Option<JobType>,
}

impl JobPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Body of `POST /api/jobs/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewJob {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Pay")]
    pub pay: i64,
    #[serde(rename = "Qualification")]
    pub qualification: String,
    #[serde(rename = "Experience")]
    pub experience: String,
    #[serde(rename = "JobType")]
    pub job_type: JobType,
}

// ============= Role & Authentication Types =============

/// User role carried in the session and returned by login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "HR")]
    Hr,
    Candidate,
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hr => "HR",
            Self::Candidate => "Candidate",
            Self::Employee => "Employee",
        }
    }

    /// `user_type` value expected by the chat service.
    pub fn chat_user_type(&self) -> &'static str {
        match self {
            Self::Hr => "hr",
            Self::Candidate => "candidate",
            Self::Employee => "employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "hr" => Ok(Self::Hr),
            "candidate" => Ok(Self::Candidate),
            "employee" => Ok(Self::Employee),
            _ => Err(AppError::Auth(
                "Unknown user role. Please contact support.".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Raw login reply; every field is optional so a partial reply can be reported.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub refresh: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Role-specific part of a registration.
#[derive(Debug, Clone, PartialEq)]
pub enum Profile {
    Hr {
        name: String,
        organization_name: String,
    },
    Employee {
        department: String,
        position: String,
        organization_name: String,
    },
    Candidate {
        name: String,
        cv: Option<PathBuf>,
    },
}

impl Profile {
    pub fn role(&self) -> Role {
        match self {
            Self::Hr { .. } => Role::Hr,
            Self::Employee { .. } => Role::Employee,
            Self::Candidate { .. } => Role::Candidate,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub profile: Profile,
}

// ============= Application Types =============

/// Entry of `GET /api/applied-jobs/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedJob {
    pub job_id: JobId,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobAdSummary {
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
}

/// One row of the HR applications table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    #[serde(rename = "Applicant", default)]
    pub applicant: Option<Applicant>,
    #[serde(rename = "JobAd", default)]
    pub job_ad: Option<JobAdSummary>,
    #[serde(rename = "Status", default)]
    pub status: String,
    #[serde(rename = "Score", default)]
    pub score: Option<f64>,
}

impl Application {
    pub fn applicant_name(&self) -> &str {
        self.applicant
            .as_ref()
            .and_then(|a| a.name.as_deref())
            .unwrap_or("N/A")
    }

    pub fn job_title(&self) -> &str {
        self.job_ad
            .as_ref()
            .and_then(|j| j.title.as_deref())
            .unwrap_or("Unknown Position")
    }

    pub fn status_kind(&self) -> ApplicationStatus {
        match self.status.as_str() {
            "Pending" => ApplicationStatus::Pending,
            "Accepted" => ApplicationStatus::Accepted,
            _ => ApplicationStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

/// Interview slot entered by HR before e-mailing an applicant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterviewDetails {
    pub date: String,
    pub time: String,
    pub location: String,
}

/// Body of `POST /api/send-email/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewInvite {
    pub to_email: String,
    pub candidate_name: Option<String>,
    pub job_title: Option<String>,
    pub interview_date: String,
    pub interview_time: String,
    pub interview_location: String,
    pub company_name: String,
}

pub const DEFAULT_COMPANY_NAME: &str = "Tech Corp";

impl InterviewInvite {
    /// Builds an invite for `application`, rejecting blank interview details.
    pub fn for_application(
        application: &Application,
        details: &InterviewDetails,
        company_name: Option<&str>,
    ) -> Result<Self> {
        if details.date.trim().is_empty()
            || details.time.trim().is_empty()
            || details.location.trim().is_empty()
        {
            return Err(AppError::InvalidInput("Please fill all fields.".to_string()));
        }

        let applicant = application.applicant.clone().unwrap_or_default();
        let to_email = applicant
            .email
            .as_deref()
            .map(clean_email)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AppError::InvalidInput("Applicant has no e-mail address".to_string()))?;

        Ok(Self {
            to_email,
            candidate_name: applicant.name,
            job_title: application.job_ad.as_ref().and_then(|j| j.title.clone()),
            interview_date: details.date.clone(),
            interview_time: details.time.clone(),
            interview_location: details.location.clone(),
            company_name: company_name.unwrap_or(DEFAULT_COMPANY_NAME).to_string(),
        })
    }
}

/// Strips one layer of surrounding quotes and whitespace from an address.
pub fn clean_email(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix('"')
        .or_else(|| trimmed.strip_prefix('\''))
        .unwrap_or(trimmed);
    let trimmed = trimmed
        .strip_suffix('"')
        .or_else(|| trimmed.strip_suffix('\''))
        .unwrap_or(trimmed);
    trimmed.trim().to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendEmailResponse {
    #[serde(default)]
    pub success: bool,
}

// ============= Chat Types =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub user_id: String,
    pub prompt: String,
    pub user_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub message: String,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Request failed with status {status}: {}", describe_error_body(.body))]
    Server { status: u16, body: Value },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Access denied: requires {required}, session role is {actual}")]
    AccessDenied { required: String, actual: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Human-readable text for an error body returned by the server.
///
/// Object bodies are searched for `detail`, `message` then `error`; string
/// bodies are returned as-is; anything else is rendered as JSON.
pub fn describe_error_body(body: &Value) -> String {
    match body {
        Value::String(s) => s.clone(),
        Value::Null => "empty response body".to_string(),
        Value::Object(map) => ["detail", "message", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_keeps_unknown_fields() {
        let job: Job = serde_json::from_value(json!({
            "id": 7,
            "Title": "Rust Engineer",
            "Remote": true
        }))
        .unwrap();

        assert_eq!(job.id, JobId::Number(7));
        assert_eq!(job.title(), Some("Rust Engineer"));
        assert_eq!(job.fields.get("Remote"), Some(&json!(true)));
        assert_eq!(serde_json::to_value(&job).unwrap()["Remote"], json!(true));
    }

    #[test]
    fn test_job_without_id_is_rejected() {
        let result: std::result::Result<Job, _> =
            serde_json::from_value(json!({"Title": "No id"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_job_accessors_tolerate_bad_fields() {
        let job = Job::new(1)
            .with_field("Title", 42)
            .with_field("Pay", "85000")
            .with_field("PostedByHR", "not an object");

        assert_eq!(job.title(), None);
        assert_eq!(job.pay(), Some(85000));
        assert_eq!(job.organization_name(), None);
        assert_eq!(job.posted_at(), None);
    }

    #[test]
    fn test_job_poster_fields() {
        let job = Job::new(1).with_field(
            "PostedByHR",
            json!({"Name": "Asha", "OrganizationName": "Acme"}),
        );
        assert_eq!(job.organization_name(), Some("Acme"));
        assert_eq!(job.poster_name(), Some("Asha"));
    }

    #[test]
    fn test_posted_at_formats() {
        let rfc = Job::new(1).with_field("PostDate", "2024-05-01T10:00:00Z");
        let naive = Job::new(2).with_field("PostDate", "2024-05-01T10:00:00.123456");
        let date = Job::new(3).with_field("PostDate", "2024-05-01");

        assert!(rfc.posted_at().is_some());
        assert!(naive.posted_at().is_some());
        assert_eq!(
            date.posted_at().unwrap().to_rfc3339(),
            "2024-05-01T00:00:00+00:00"
        );
    }

    #[test]
    fn test_job_id_parsing() {
        assert_eq!("12".parse::<JobId>().unwrap(), JobId::Number(12));
        assert_eq!(
            "abc-1".parse::<JobId>().unwrap(),
            JobId::Text("abc-1".to_string())
        );
        assert!(" ".parse::<JobId>().is_err());
    }

    #[test]
    fn test_job_type_codes() {
        assert_eq!(JobType::from_code("FT"), JobType::FullTime);
        assert_eq!(JobType::from_code("contract"), JobType::PartTime);
        assert_eq!(JobType::FullTime.label(), "Full-time");
        assert_eq!("full-time".parse::<JobType>().unwrap(), JobType::FullTime);
        assert!("weekly".parse::<JobType>().is_err());
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let patch = JobPatch {
            title: Some("Y".to_string()),
            job_type: Some(JobType::FullTime),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({"Title": "Y", "JobType": "FT"})
        );
        assert!(JobPatch::default().is_empty());
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("HR".parse::<Role>().unwrap(), Role::Hr);
        assert_eq!("employee".parse::<Role>().unwrap(), Role::Employee);
        assert!("admin".parse::<Role>().is_err());
        assert_eq!(Role::Hr.chat_user_type(), "hr");
    }

    #[test]
    fn test_interview_invite_requires_details() {
        let application = Application {
            applicant: Some(Applicant {
                name: Some("Ravi".to_string()),
                email: Some("\"ravi@example.com\" ".to_string()),
            }),
            job_ad: Some(JobAdSummary {
                title: Some("Backend".to_string()),
            }),
            status: "Pending".to_string(),
            score: Some(0.5),
        };

        let missing = InterviewDetails {
            date: "2024-06-01".to_string(),
            ..Default::default()
        };
        assert!(InterviewInvite::for_application(&application, &missing, None).is_err());

        let details = InterviewDetails {
            date: "2024-06-01".to_string(),
            time: "10:00".to_string(),
            location: "Office".to_string(),
        };
        let invite = InterviewInvite::for_application(&application, &details, None).unwrap();
        assert_eq!(invite.to_email, "ravi@example.com");
        assert_eq!(invite.company_name, DEFAULT_COMPANY_NAME);
        assert_eq!(invite.job_title.as_deref(), Some("Backend"));
    }

    #[test]
    fn test_application_defaults() {
        let app: Application = serde_json::from_value(json!({"Status": "Rejected"})).unwrap();
        assert_eq!(app.applicant_name(), "N/A");
        assert_eq!(app.job_title(), "Unknown Position");
        assert_eq!(app.status_kind(), ApplicationStatus::Rejected);
    }

    #[test]
    fn test_describe_error_body() {
        assert_eq!(describe_error_body(&json!({"detail": "Already applied"})), "Already applied");
        assert_eq!(describe_error_body(&json!("boom")), "boom");
        assert_eq!(describe_error_body(&json!({"code": 3})), "{\"code\":3}");
    }
}
