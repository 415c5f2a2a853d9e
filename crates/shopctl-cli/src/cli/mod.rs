//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use shopctl_core::config::Config;
use shopctl_core::session::{CredentialStore, SessionContext, SessionManager};

mod commands;

#[derive(Parser)]
#[command(name = "shopctl")]
#[command(version)]
#[command(about = "Admin session CLI for the shop platform")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override the API base URL for this invocation
    #[arg(long, value_name = "URL", global = true)]
    api_url: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in with email and password
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password (prompted if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Log out and clear stored credentials
    Logout,

    /// Register a new admin account
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password (prompted if omitted)
        #[arg(short, long)]
        password: Option<String>,

        /// Contact phone number
        #[arg(long)]
        phone: Option<String>,
    },

    /// Show the currently logged-in user
    Whoami,

    /// Show local session status without contacting the backend
    Status,

    /// Manage the stored profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Request a password-reset email
    ForgotPassword {
        /// Account email
        #[arg(short, long)]
        email: String,
    },

    /// Complete a password reset with the emailed token
    ResetPassword {
        /// Reset token from the email
        #[arg(short, long)]
        token: String,

        /// New password
        #[arg(short, long)]
        password: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ProfileCommands {
    /// Update profile fields; unset fields are left untouched
    Update {
        /// New display name
        #[arg(long)]
        name: Option<String>,

        /// New phone number
        #[arg(long)]
        phone: Option<String>,

        /// New address
        #[arg(long)]
        address: Option<String>,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Print the config file path
    Path,
    /// Create a starter config file
    Init,
    /// Print the effective configuration
    Show,
    /// Set the API base URL
    SetUrl {
        /// Base URL of the admin REST API
        #[arg(value_name = "URL")]
        url: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    if let Commands::Config { command } = &cli.command {
        return match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::Show => commands::config::show(),
            ConfigCommands::SetUrl { url } => commands::config::set_url(url),
        };
    }

    let mut config = Config::load().context("load config")?;
    if let Some(url) = cli.api_url.as_deref() {
        config.api.base_url = url.trim_end_matches('/').to_string();
    }

    tracing::debug!("using API base URL {}", config.api.base_url);

    let store = CredentialStore::at_default_path();
    let manager = SessionManager::new(&config, store).context("build session manager")?;
    let mut context = SessionContext::new(manager);

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&mut context, &email, password).await
        }
        Commands::Logout => commands::auth::logout(&mut context).await,
        Commands::Register {
            name,
            email,
            password,
            phone,
        } => commands::auth::register(&mut context, &name, &email, password, phone.as_deref()).await,
        Commands::Whoami => commands::auth::whoami(&mut context).await,
        Commands::Status => commands::auth::status(&context),
        Commands::ForgotPassword { email } => commands::auth::forgot_password(&context, &email).await,
        Commands::ResetPassword { token, password } => {
            commands::auth::reset_password(&context, &token, &password).await
        }
        Commands::Profile { command } => match command {
            ProfileCommands::Update {
                name,
                phone,
                address,
            } => commands::profile::update(&mut context, name, phone, address).await,
        },
        Commands::Config { .. } => unreachable!("handled above"),
    }
}
