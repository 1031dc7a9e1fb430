//! Yatube server entry point.

mod cli;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use yatube_api::AppState;
use yatube_common::{Config, LocalStorage};
use yatube_core::{CreateGroupInput, CreateUserInput, GroupService, UserService};
use sea_orm::DatabaseConnection;
use yatube_db::repositories::{GroupRepository, UserRepository};

use crate::cli::{CliArgs, Command, CreateGroupArgs, CreateUserArgs};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yatube=debug,tower_http=debug".into()),
        )
        .init();

    let args = CliArgs::parse();

    // Load configuration
    let config = match &args.config_file {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };

    let db = yatube_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    yatube_db::migrate(&db).await?;
    info!("Migrations completed");

    let db = Arc::new(db);

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(db, &config).await,
        Command::Migrate => Ok(()),
        Command::CreateUser(user) => create_user(db, user).await,
        Command::CreateGroup(group) => create_group(db, group).await,
    }
}

async fn serve(db: Arc<DatabaseConnection>, config: &Config) -> anyhow::Result<()> {
    info!("Starting yatube server...");

    let storage = Arc::new(LocalStorage::new(
        config.media.root.clone(),
        config.media.url.clone(),
    ));
    let state = AppState::new(db, storage, config);

    // Expired index pages are never served, this only keeps memory bounded.
    let page_cache = state.page_cache.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(page_cache.ttl().max(Duration::from_secs(1)));
        loop {
            interval.tick().await;
            page_cache.purge_expired().await;
        }
    });

    let app = yatube_api::app(state).layer(TraceLayer::new_for_http());

    // Start server with graceful shutdown
    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::from((host, config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn create_user(
    db: Arc<DatabaseConnection>,
    args: CreateUserArgs,
) -> anyhow::Result<()> {
    let service = UserService::new(UserRepository::new(db));
    let user = service
        .create(CreateUserInput {
            username: args.username,
            name: args.name,
        })
        .await?;

    println!("{}", user.token.unwrap_or_default());
    Ok(())
}

async fn create_group(
    db: Arc<DatabaseConnection>,
    args: CreateGroupArgs,
) -> anyhow::Result<()> {
    let service = GroupService::new(GroupRepository::new(db));
    let group = service
        .create(CreateGroupInput {
            title: args.title,
            slug: args.slug,
            description: args.description,
        })
        .await?;

    println!("{}", group.slug);
    Ok(())
}
