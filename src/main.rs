mod app;
mod auth;
mod config;
mod db;
mod error;
mod exercises;
#[cfg(test)]
mod memory;
mod state;
mod tasks;
mod weight;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "keima=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let state = AppState::init().await?;

    if let Some(every) = state.config.sweep_interval() {
        tasks::spawn_session_sweeper(state.sessions.clone(), every);
    }

    app::serve(app::build_app(state)).await
}
