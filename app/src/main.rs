//! GeoSense command-line client
//!
//! Usage:
//!   geosense login --email ana@example.com --password secret1
//!   geosense compare "India Gate" "Noida"
//!   geosense whoami
//!   geosense logout

mod commands;
mod state;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

use commands::{auth, routes, CommandResult};
use geosense_core::Config;
use state::AppState;

#[derive(Parser)]
#[command(name = "geosense")]
#[command(about = "Compare fastest, eco-friendly and cheapest routes")]
struct Args {
    /// Backend origin
    #[arg(long, env = "GEOSENSE_API_BASE_URL")]
    api_url: Option<String>,

    /// Directory holding the local session database
    #[arg(long, env = "GEOSENSE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Pretty-print the JSON result
    #[arg(short, long)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and persist the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "GEOSENSE_PASSWORD")]
        password: String,
    },
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long, env = "GEOSENSE_PASSWORD")]
        password: String,
        #[arg(long)]
        name: String,
    },
    /// Clear the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Compare the three route variants between two places
    Compare { origin: String, destination: String },
    /// Check that the backend is reachable
    Health,
}

impl Args {
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = Config::from_env().context("failed to read configuration")?;

        if let Some(url) = &self.api_url {
            config.api_base_url = url.clone();
        }
        if let Some(dir) = &self.data_dir {
            config.database_path = dir.join("geosense.db");
        }

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

fn print<T: Serialize>(result: &CommandResult<T>, pretty: bool) -> anyhow::Result<ExitCode> {
    let json = if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{}", json);

    Ok(if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    geosense_core::init_logging();

    let args = Args::parse();
    let state = AppState::new(args.config()?).context("failed to start GeoSense")?;

    tracing::debug!(state = %state.geosense().auth_state(), "Running command");

    match &args.command {
        Command::Login { email, password } => {
            print(&auth::login(&state, email, password).await, args.pretty)
        }
        Command::Signup {
            email,
            password,
            name,
        } => print(
            &auth::signup(&state, email, password, name).await,
            args.pretty,
        ),
        Command::Logout => print(&auth::logout(&state), args.pretty),
        Command::Whoami => print(&auth::whoami(&state), args.pretty),
        Command::Compare {
            origin,
            destination,
        } => print(
            &routes::compare(&state, origin, destination).await,
            args.pretty,
        ),
        Command::Health => print(&routes::health(&state).await, args.pretty),
    }
}
