//! Presentation helpers for job listings
//!
//! Formatting shared by the HR and candidate job views: relative posting
//! time, collapsible descriptions and pay.

use crate::types::{Job, JobId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Lines shown for a collapsed description.
pub const COLLAPSED_LINES: usize = 3;

/// Relative age of a posting: "N days ago", "N hours ago" or "Just now".
pub fn time_ago(posted: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(posted);

    let days = elapsed.num_days();
    if days >= 1 {
        return format!("{} day{} ago", days, if days != 1 { "s" } else { "" });
    }

    let hours = elapsed.num_hours();
    if hours >= 1 {
        return format!("{} hour{} ago", hours, if hours != 1 { "s" } else { "" });
    }

    "Just now".to_string()
}

/// [`time_ago`] for a job; a job without a readable `PostDate` counts as new.
pub fn job_age(job: &Job, now: DateTime<Utc>) -> String {
    time_ago(job.posted_at().unwrap_or(now), now)
}

pub fn format_pay(pay: i64) -> String {
    format!("${}/yr", pay)
}

/// Description text limited to [`COLLAPSED_LINES`] lines unless expanded.
pub fn preview(text: &str, expanded: bool) -> String {
    if expanded {
        return text.to_string();
    }

    let mut lines = text.lines();
    let shown: Vec<&str> = lines.by_ref().take(COLLAPSED_LINES).collect();
    if lines.next().is_some() {
        format!("{}…", shown.join("\n"))
    } else {
        shown.join("\n")
    }
}

/// Per-job "show more" state for descriptions.
#[derive(Debug, Clone, Default)]
pub struct DescriptionToggles {
    expanded: HashMap<JobId, bool>,
}

impl DescriptionToggles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the flag for `id` and return the new value.
    pub fn toggle(&mut self, id: &JobId) -> bool {
        let flag = self.expanded.entry(id.clone()).or_insert(false);
        *flag = !*flag;
        *flag
    }

    pub fn is_expanded(&self, id: &JobId) -> bool {
        self.expanded.get(id).copied().unwrap_or(false)
    }

    pub fn description(&self, job: &Job) -> String {
        preview(job.description().unwrap_or_default(), self.is_expanded(&job.id))
    }
}
