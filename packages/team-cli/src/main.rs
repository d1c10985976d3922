//! Team header actions CLI
//!
//! Loads a panel context, fetches the team from the membership service and
//! runs one header action against it. The rendered panel goes to stdout.

mod config;
mod ports;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use membership_client::MembershipClient;
use team_actions::{
    ActionDeps, ActionOutcome, BaseMembershipService, EligibilityState, HeaderActionsOptions,
    HttpMembershipService, TeamEventBus, TeamProfileHeaderActions, TeamState, Topic,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{endpoints, Config};
use crate::ports::{StderrNotifier, StdoutNavigator, StdoutPanelView};

#[derive(Parser)]
#[command(name = "team-actions")]
#[command(about = "Run team profile header actions against a live membership service")]
struct Cli {
    /// Panel context JSON (overrides TEAMS_PANEL_CONTEXT)
    #[arg(long, global = true)]
    context: Option<PathBuf>,

    /// Team to act on
    #[arg(long, global = true)]
    team_id: Option<String>,

    /// Topic id (defaults to the team's topic)
    #[arg(long, global = true)]
    topic_id: Option<String>,

    /// Topic type, e.g. "open" or "public_managed"
    #[arg(long, global = true)]
    topic_type: Option<String>,

    /// Render the Edit Team control
    #[arg(long, global = true)]
    show_edit: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate eligibility and print the panel
    Render,

    /// Join the team, then print the updated panel
    Join,

    /// Print the edit route for the team
    Edit,

    /// Create a meeting and print the redirect
    Meeting,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,team_actions=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let team_id = cli.team_id.clone().context("--team-id is required")?;

    let config = Config::from_env()?;
    let context = config.load_context(cli.context.as_deref())?;

    let mut client = MembershipClient::new(&config.api_base_url, endpoints(&context))
        .context("TEAMS_API_BASE_URL is not a valid URL")?;
    if let Some(token) = &config.api_token {
        client = client.with_token(token.clone());
    }
    let membership = Arc::new(HttpMembershipService::new(Arc::new(client)));

    let team = membership
        .fetch_team(&team_id)
        .await
        .with_context(|| format!("failed to load team {team_id}"))?;
    let topic = Topic::new(
        cli.topic_id.clone().unwrap_or_else(|| team.topic_id.clone()),
        cli.topic_type.as_deref(),
    );
    tracing::info!(team_id = %team.id, topic_id = %topic.id, "Loaded team");

    let bus = TeamEventBus::new();
    let mut events = bus.subscribe();

    let actions = TeamProfileHeaderActions::new(HeaderActionsOptions {
        context,
        topic,
        team: TeamState::new(team),
        show_edit_button: cli.show_edit,
        deps: ActionDeps::new(
            membership,
            Arc::new(StdoutNavigator),
            Arc::new(StderrNotifier),
            Arc::new(StdoutPanelView),
        ),
        bus,
    })?;

    let outcome = match cli.command {
        Commands::Render => render_outcome(actions.render().await),
        Commands::Join => {
            let outcome = actions.join_team().await;
            if outcome == ActionOutcome::Completed {
                render_outcome(actions.render().await)
            } else {
                outcome
            }
        }
        Commands::Edit => actions.edit_team(),
        Commands::Meeting => actions.join_meeting().await,
    };

    while let Ok(event) = events.try_recv() {
        println!(
            "{} {}",
            event.channel(),
            serde_json::to_string(&event).context("failed to encode event")?
        );
    }

    actions.shutdown().await;

    if outcome != ActionOutcome::Completed {
        bail!("action finished as {outcome:?}");
    }
    Ok(())
}

/// A render that produced no panel (template failure) counts as failed.
fn render_outcome(state: Option<EligibilityState>) -> ActionOutcome {
    match state {
        Some(state) => {
            tracing::info!(?state, "Rendered");
            ActionOutcome::Completed
        }
        None => ActionOutcome::Failed,
    }
}
