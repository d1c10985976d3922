use anyhow::{Context, Result};
use dotenvy::dotenv;
use membership_client::Endpoints;
use std::env;
use std::path::{Path, PathBuf};
use team_actions::PanelContext;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub panel_context: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            api_base_url: env::var("TEAMS_API_BASE_URL")
                .context("TEAMS_API_BASE_URL must be set")?,
            api_token: env::var("TEAMS_API_TOKEN").ok().filter(|t| !t.is_empty()),
            panel_context: env::var("TEAMS_PANEL_CONTEXT").ok().map(PathBuf::from),
        })
    }

    /// Read the panel context JSON, preferring `path` over the environment.
    pub fn load_context(&self, path: Option<&Path>) -> Result<PanelContext> {
        let path = path
            .or(self.panel_context.as_deref())
            .context("no panel context: pass --context or set TEAMS_PANEL_CONTEXT")?;
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("{} is not a valid panel context", path.display()))
    }
}

/// Endpoint paths the membership client needs, taken from the page context.
pub fn endpoints(context: &PanelContext) -> Endpoints {
    Endpoints {
        memberships: context.team_memberships_url.clone(),
        teams: context.teams_url.clone(),
        meetings: context.create_meetings_url.clone(),
    }
}
