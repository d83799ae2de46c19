//! Colored output helpers for CLI
//!
//! Provides consistent terminal output for the jobboard CLI: status lines,
//! job cards, the applications table and chat messages.

use crate::chat::{ChatMessage, Sender};
use crate::types::{Application, ApplicationStatus, Job};
use crate::utils::display::{format_pay, job_age, DescriptionToggles};
use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// Print a hint/tip message
    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "💡".dimmed(), message.dimmed().italic());
        } else {
            println!("\n  [TIP] {}", message);
        }
    }

    /// Print a command suggestion
    pub fn command(&self, cmd: &str) {
        if self.colored {
            println!("     {}", format!("$ {}", cmd).bright_cyan());
        } else {
            println!("     $ {}", cmd);
        }
    }

    /// Prompt for confirmation (returns true if user confirms)
    pub async fn confirm(&self, message: &str) -> bool {
        if self.colored {
            print!(
                "  {} {} [y/N]: ",
                "?".bright_yellow().bold(),
                message.bright_white()
            );
        } else {
            print!("  [?] {} [y/N]: ", message);
        }

        io::stdout().flush().ok();

        let mut input = String::new();
        match BufReader::new(tokio::io::stdin()).read_line(&mut input).await {
            Ok(_) => is_affirmative(&input),
            Err(_) => false,
        }
    }

    /// Print one job as a card
    pub fn job_card(
        &self,
        job: &Job,
        now: DateTime<Utc>,
        toggles: &DescriptionToggles,
        applied: Option<bool>,
    ) {
        let card = JobCard::new(job, now, toggles);

        if self.colored {
            println!(
                "\n  {} {}",
                format!("#{}", job.id).dimmed(),
                card.organization.cyan().bold()
            );
            println!("  {}", card.title.bright_white().bold());
        } else {
            println!("\n  #{} {}", job.id, card.organization);
            println!("  {}", card.title);
        }

        for line in card.description.lines() {
            println!("    {}", line);
        }

        let tags = card.tags.join(" | ");
        if self.colored {
            println!("    {}", tags.blue());
            println!("    {}", card.footer.dimmed());
        } else {
            println!("    {}", tags);
            println!("    {}", card.footer);
        }

        if let Some(applied) = applied {
            match (applied, self.colored) {
                (true, true) => println!("    {}", "Applied".green().bold()),
                (true, false) => println!("    [APPLIED]"),
                (false, true) => println!("    {}", format!("jobboard apply {}", job.id).bright_cyan()),
                (false, false) => println!("    apply with: jobboard apply {}", job.id),
            }
        }
    }

    /// Print a table header row
    pub fn table_header(&self, columns: &[&str]) {
        let header = pad_columns(columns);
        if self.colored {
            println!("    {}", header.bright_white().bold());
            println!("    {}", "─".repeat(columns.len() * 16).dimmed());
        } else {
            println!("    {}", header);
            println!("    {}", "-".repeat(columns.len() * 16));
        }
    }

    /// Print a table row
    pub fn table_row(&self, values: &[&str]) {
        println!("    {}", pad_columns(values));
    }

    /// Print one application as a table row, status colored like the review page
    pub fn application_row(&self, index: usize, application: &Application) {
        let row = application_cells(index, application);
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        if !self.colored {
            self.table_row(&cells);
            return;
        }

        let padded = format!("{:<15}", application.status);
        let status = match application.status_kind() {
            ApplicationStatus::Pending => padded.yellow().to_string(),
            ApplicationStatus::Accepted => padded.green().to_string(),
            ApplicationStatus::Rejected => padded.red().to_string(),
        };
        println!(
            "    {} {} {} {} {}",
            format!("{:<15}", cells[0]),
            format!("{:<15}", cells[1]),
            format!("{:<15}", cells[2]),
            status,
            format!("{:<15}", cells[4]),
        );
    }

    /// Print a chat message
    pub fn chat_message(&self, message: &ChatMessage) {
        match (message.sender, self.colored) {
            (Sender::Bot, true) => println!("  {} {}", "bot>".cyan().bold(), message.message),
            (Sender::User, true) => println!("  {} {}", "you>".green().bold(), message.message),
            (Sender::Bot, false) => println!("  bot> {}", message.message),
            (Sender::User, false) => println!("  you> {}", message.message),
        }
    }

    /// Print newline
    pub fn newline(&self) {
        println!();
    }
}

fn pad_columns(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| format!("{:<15}", v))
        .collect::<Vec<_>>()
        .join(" ")
}

fn application_cells(index: usize, application: &Application) -> Vec<String> {
    vec![
        index.to_string(),
        application.applicant_name().to_string(),
        application.job_title().to_string(),
        application.status.clone(),
        application
            .score
            .map(|s| format!("{:.2}", s))
            .unwrap_or_else(|| "-".to_string()),
    ]
}

/// Text pieces of a job card, with the page's fallbacks applied.
#[derive(Debug, Clone, PartialEq)]
pub struct JobCard {
    pub organization: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub footer: String,
}

impl JobCard {
    pub fn new(
        job: &Job,
        now: DateTime<Utc>,
        toggles: &DescriptionToggles,
    ) -> Self {
        let mut tags = vec![job.job_type().unwrap_or_default().label().to_string()];
        if let Some(experience) = job.experience() {
            tags.push(experience.to_string());
        }

        let mut footer = Vec::new();
        if let Some(pay) = job.pay() {
            footer.push(format_pay(pay));
        }
        if let Some(location) = job.location() {
            footer.push(location.to_string());
        }
        footer.push(job_age(job, now));

        Self {
            organization: job.organization_name().unwrap_or("Company").to_string(),
            title: job.title().unwrap_or("Untitled").to_string(),
            description: toggles.description(job),
            tags,
            footer: footer.join(" · "),
        }
    }
}

fn is_affirmative(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}
