//! # RentEase Main Entry Point
//!
//! Runs the API server, manages the database, and acts as a command-line
//! client for the auth endpoints.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rentease::{
    auth::RegisterInput,
    client::{self, ApiClient},
    config::{AppConfig, ConfigLoader},
    db,
    models::Role,
    seeds,
    server::run_server,
    session::FileSessionStore,
    telemetry,
};

#[derive(Parser)]
#[command(name = "rentease", about = "RentEase property management API and client", version)]
struct Cli {
    /// Base URL of a running API, used by the client commands
    #[arg(
        long,
        global = true,
        env = "RENTEASE_API_URL",
        default_value = "http://localhost:8080/"
    )]
    api_url: String,
    /// Where the client keeps its session
    #[arg(long, global = true, env = "RENTEASE_SESSION_FILE")]
    session_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply migrations and serve the HTTP API
    Serve,
    /// Apply pending database migrations
    Migrate,
    /// Insert the demo portfolio into an empty database
    Seed,
    /// Delete every row from the domain tables
    Clean(CleanArgs),
    /// Log in and save the session
    Login(LoginArgs),
    /// Create an account and save the session
    Register(RegisterArgs),
    /// Show the user of the saved session
    Whoami,
    /// Forget the saved session
    Logout,
}

#[derive(Args)]
struct CleanArgs {
    /// Confirm the deletion
    #[arg(long)]
    yes: bool,
}

#[derive(Args)]
struct LoginArgs {
    #[arg(long, help = "Email address for the account")]
    email: String,
    #[arg(long, env = "RENTEASE_PASSWORD", help = "Password for the account")]
    password: String,
}

#[derive(Args)]
struct RegisterArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "RENTEASE_PASSWORD")]
    password: String,
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "TENANT", help = "ADMIN, LANDLORD or TENANT")]
    role: Role,
}

fn default_session_path() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(".rentease")
        .join("session.json")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from layered env files and variables
    let config = ConfigLoader::new().load()?;
    telemetry::init_tracing(&config)?;

    match cli.command {
        Commands::Serve => serve(config).await,
        Commands::Migrate => {
            let db = db::init_pool(&config).await?;
            db::run_migrations(&db).await
        }
        Commands::Seed => {
            let db = db::init_pool(&config).await?;
            db::run_migrations(&db).await?;
            let summary = seeds::seed_demo_data(&db).await?;
            if summary.is_empty() {
                println!("Database already populated; nothing seeded");
            } else {
                println!(
                    "Seeded {} users, {} properties, {} units, {} leases, {} maintenance requests, {} payments",
                    summary.users,
                    summary.properties,
                    summary.units,
                    summary.leases,
                    summary.maintenance_requests,
                    summary.payments
                );
                println!("Demo password for every account: {}", seeds::DEMO_PASSWORD);
            }
            Ok(())
        }
        Commands::Clean(args) => {
            if !args.yes {
                anyhow::bail!("refusing to delete data without --yes");
            }
            let db = db::init_pool(&config).await?;
            seeds::clean_database(&db).await
        }
        Commands::Login(args) => {
            let (api, store) = client_parts(&cli.api_url, cli.session_file)?;
            let session = client::sign_in(&api, &store, &args.email, &args.password).await?;
            println!("Logged in as {} ({})", session.user.email, session.user.role);
            println!("Session saved to: {}", store.path().display());
            Ok(())
        }
        Commands::Register(args) => {
            let (api, store) = client_parts(&cli.api_url, cli.session_file)?;
            let input = RegisterInput {
                email: args.email,
                password: args.password,
                name: args.name,
                role: args.role,
            };
            let session = client::sign_up(&api, &store, &input).await?;
            println!("Registered {} ({})", session.user.email, session.user.role);
            println!("Session saved to: {}", store.path().display());
            Ok(())
        }
        Commands::Whoami => {
            let (api, store) = client_parts(&cli.api_url, cli.session_file)?;
            let session = client::restore_session(&api, &store).await?;
            println!(
                "{} <{}> {} ({})",
                session.user.name, session.user.email, session.user.role, session.user.id
            );
            Ok(())
        }
        Commands::Logout => {
            let (_, store) = client_parts(&cli.api_url, cli.session_file)?;
            client::sign_out(&store).await?;
            println!("Logged out");
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> Result<()> {
    config.validate()?;
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::info!(profile = %config.profile, config = %redacted_json, "Loaded configuration");
    }

    let db = db::init_pool(&config).await?;
    db::run_migrations(&db).await?;

    run_server(config, db).await
}

fn client_parts(
    api_url: &str,
    session_file: Option<PathBuf>,
) -> Result<(ApiClient, FileSessionStore)> {
    let api = ApiClient::new(api_url).with_context(|| format!("invalid --api-url {api_url}"))?;
    let store = FileSessionStore::new(session_file.unwrap_or_else(default_session_path));
    Ok((api, store))
}
