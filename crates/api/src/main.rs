//! `zerostat` -- host metrics dashboard API and alert engine.
//!
//! Samples the local machine, evaluates alert rules every tick, and serves
//! the JSON management API. See `ServerConfig`, `AgentConfig` and
//! `NotificationConfig` for the environment variables read at startup.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zerostat_agent::collector::{self, HostCollector};
use zerostat_agent::config::AgentConfig;
use zerostat_agent::dispatcher::ActionDispatcher;
use zerostat_agent::evaluator::Evaluator;
use zerostat_agent::persistence::{RuleFile, SettingsFile};
use zerostat_agent::sampler::Sampler;
use zerostat_agent::shell::ShellRunner;
use zerostat_agent::store::RuleStore;
use zerostat_api::background;
use zerostat_api::config::ServerConfig;
use zerostat_api::router::build_app_router;
use zerostat_api::state::AppState;
use zerostat_events::{NotificationConfig, Notifier};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "zerostat_api=info,zerostat_agent=info,zerostat_events=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    let agent_config = AgentConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        data_dir = %agent_config.data_dir.display(),
        tick_secs = agent_config.tick_secs,
        "Loaded configuration"
    );

    // --- Rules ---
    let rule_file = RuleFile::new(agent_config.rules_path());
    let rules = Arc::new(RuleStore::with_rules(rule_file.load().await));

    // --- Notification settings (saved settings win over the environment) ---
    let settings_file = SettingsFile::new(agent_config.settings_path());
    let notification_config = match settings_file.load().await {
        Some(saved) => saved,
        None => NotificationConfig::from_env(),
    };

    // --- Sampler ---
    let disk_mount = agent_config.disk_mount.clone();
    let sampler = match tokio::task::spawn_blocking(move || {
        Sampler::new(Box::new(HostCollector::new(disk_mount)))
    })
    .await
    {
        Ok(sampler) => Arc::new(sampler),
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialise host collector");
            std::process::exit(1);
        }
    };

    // --- Dispatch ---
    let hostname = collector::hostname();
    let notifier = Arc::new(Notifier::new(notification_config));
    let dispatcher = Arc::new(ActionDispatcher::new(
        notifier,
        ShellRunner::new(agent_config.shell_timeout()),
        hostname.clone(),
    ));
    tracing::info!(hostname = %hostname, "Action dispatcher ready");

    // --- Evaluator ---
    let evaluator = Arc::new(Evaluator::new(
        Arc::clone(&rules),
        Arc::clone(&sampler),
        dispatcher.clone(),
    ));
    let eval_cancel = CancellationToken::new();
    let eval_handle = tokio::spawn(background::rule_evaluation::run(
        evaluator,
        agent_config.tick_interval(),
        eval_cancel.clone(),
    ));

    // --- App state + router ---
    let state = AppState::new(
        config.clone(),
        rules,
        sampler,
        dispatcher,
        rule_file,
        settings_file,
    );
    let app = build_app_router(state, &config);

    // --- Start server ---
    let ip = match config.host.parse() {
        Ok(ip) => ip,
        Err(e) => {
            tracing::error!(host = %config.host, error = %e, "Invalid ZEROSTAT_HOST address");
            std::process::exit(1);
        }
    };
    let addr = SocketAddr::new(ip, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Failed to bind to address");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server error");
    }

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    eval_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), eval_handle).await;
    tracing::info!("Rule evaluation loop stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
