//! Anuraagam Server - demo music streaming backend
use anuraagam_library::Catalog;
use anuraagam_server::{
    config::ServerConfig,
    create_router,
    services::{mailer_for, AuthService},
    AppState, Repositories,
};
use clap::{Parser, Subcommand};
use std::{net::SocketAddr, path::PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "anuraagam-server")]
#[command(about = "Anuraagam music streaming server", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./config.toml when present)
    #[arg(short, long, global = true, env = "ANURAAGAM_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create a new user
    AddUser {
        /// Username
        #[arg(short, long)]
        username: String,
        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// List all users
    ListUsers,
    /// Print the catalog
    Catalog {
        /// Only tracks in this language
        #[arg(short, long)]
        language: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "anuraagam_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve => {
            serve(config).await?;
        }
        Commands::AddUser { username, password } => {
            add_user(&config, &username, &password).await?;
        }
        Commands::ListUsers => {
            list_users(&config).await?;
        }
        Commands::Catalog { language } => {
            print_catalog(&config, language.as_deref());
        }
    }

    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting Anuraagam Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);
    tracing::info!("Songs directory: {}", config.storage.songs_dir.display());

    let repositories = Repositories::open(&config.storage).await?;
    let mailer = mailer_for(&config.otp)?;
    if !config.otp.is_demo() {
        tracing::info!(
            "Relaying OTP mail via {}:{}",
            config.otp.smtp_host,
            config.otp.smtp_port
        );
    }
    let app_state = AppState::from_config(&config, repositories, mailer);

    let app = create_router(app_state, config.server.web_dir.clone());

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

async fn add_user(config: &ServerConfig, username: &str, password: &str) -> anyhow::Result<()> {
    let repositories = Repositories::open(&config.storage).await?;

    let auth_service = AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
    );
    let password_hash = auth_service.hash_password(password)?;

    let user = repositories.users.create(username, &password_hash).await?;
    println!("Created user {} ({})", user.username, user.id);

    Ok(())
}

async fn list_users(config: &ServerConfig) -> anyhow::Result<()> {
    let repositories = Repositories::open(&config.storage).await?;
    let users = repositories.users.list().await?;

    println!("Users:");
    for user in users {
        println!(
            "  {} - {} (created {})",
            user.id,
            user.username,
            user.created_at.format("%Y-%m-%d %H:%M")
        );
    }

    Ok(())
}

fn print_catalog(config: &ServerConfig, language: Option<&str>) {
    let catalog = if config.catalog.include_local {
        Catalog::with_local(&config.storage.songs_dir)
    } else {
        Catalog::demo()
    };

    for track in catalog.list(language) {
        println!(
            "{:>5}  {:<10}  {} - {} [{}]",
            track.id, track.language, track.artist, track.title, track.album
        );
    }
}
