/// Configuration loading (`jobboard.toml` + environment).
pub mod config;
/// Presentation helpers shared by the job views.
pub mod display;
