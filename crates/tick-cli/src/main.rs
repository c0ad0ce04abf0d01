//! Tick CLI
//!
//! Command-line interface for tick - a client for a shared todo service.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tick_core::{ClientError, Config, HttpStore, Session};

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "tick")]
#[command(about = "tick - command-line client for a shared todo list")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        /// Account name
        username: String,
        /// Password (prompted for when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Create an account and log in
    Register {
        /// Account name
        username: String,
        /// Password (prompted for when omitted)
        #[arg(short, long)]
        password: Option<String>,
        /// Email address to attach to the account
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Drop the stored session token
    Logout,
    /// List todos
    #[command(alias = "ls")]
    List {
        /// Only todos still open
        #[arg(long, conflicts_with = "done")]
        pending: bool,
        /// Only completed todos
        #[arg(long)]
        done: bool,
    },
    /// Add a new todo
    Add {
        /// Title of the todo
        #[arg(required = true)]
        title: Vec<String>,
    },
    /// Toggle completion for a todo
    #[command(alias = "toggle")]
    Done {
        /// Todo id
        id: i64,
    },
    /// Change a todo's title or category
    Edit {
        /// Todo id
        id: i64,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Delete every completed todo
    Clear,
    /// Share todos with another user
    Share {
        /// User to share with
        username: String,
        /// Ids of the todos to share
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// List known categories
    Categories,
    /// Show connection and session status
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (api_url, data_dir)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    init_logging();

    // Config commands don't need a session or a network client
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), &output);
    }

    let config = Config::load().context("Failed to load configuration")?;
    let session = Session::with_path(config.token_path())?;
    let store = HttpStore::new(&config.api_url, session.clone())?;

    let result = match cli.command {
        Commands::Login { username, password } => {
            commands::auth::login(&store, &session, username, password, &output).await
        }
        Commands::Register {
            username,
            password,
            email,
        } => commands::auth::register(&store, &session, username, password, email, &output).await,
        Commands::Logout => commands::auth::logout(&session, &output),
        Commands::List { pending, done } => {
            commands::todo::list(store, &session, pending, done, &output).await
        }
        Commands::Add { title } => commands::todo::add(store, &session, title, &output).await,
        Commands::Done { id } => commands::todo::done(store, &session, id, &output).await,
        Commands::Edit {
            id,
            title,
            category,
        } => commands::todo::edit(store, &session, id, title, category, &output).await,
        Commands::Clear => commands::todo::clear(store, &session, &output).await,
        Commands::Share { username, ids } => {
            commands::share::share(store, &session, username, ids, &output).await
        }
        Commands::Categories => commands::todo::categories(store, &session, &output).await,
        Commands::Status => commands::status::show(&config, store, &session, &output).await,
        Commands::Config { .. } => unreachable!(), // Handled above
    };

    // A refused credential mid-operation means the session went stale
    if let Err(err) = result {
        if err
            .downcast_ref::<ClientError>()
            .is_some_and(|e| e.is_auth())
        {
            bail!("{}\nRun `tick login <username>` to start a new session.", err);
        }
        return Err(err);
    }

    Ok(())
}

fn handle_config_command(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(output),
        Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, output),
    }
}

fn init_logging() {
    let env_filter =
        EnvFilter::try_from_env("TICK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    // Logs go to stderr so they never mix with command output
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
