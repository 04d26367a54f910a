//! cobbler CLI
//!
//! Command-line interface for inspecting and managing records on a Cobbler
//! provisioning server

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use color_eyre::eyre::eyre;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use cobbler_api::{Distro, Image, Profile, Record, System};
use cobbler_client::Connection;

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "cobbler-cli")]
#[command(about = "Client for a Cobbler provisioning server", long_about = None)]
struct Cli {
    /// Server hostname or base URL (overrides the config file)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Username for authenticated operations
    #[arg(long, global = true)]
    username: Option<String>,

    /// Password for authenticated operations
    #[arg(long, global = true)]
    password: Option<String>,

    /// Path to a config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Distro records
    Distro {
        #[command(subcommand)]
        action: EntityAction,
    },
    /// Profile records
    Profile {
        #[command(subcommand)]
        action: EntityAction,
    },
    /// System records
    System {
        #[command(subcommand)]
        action: EntityAction,
    },
    /// Image records
    Image {
        #[command(subcommand)]
        action: EntityAction,
    },
    /// Print the server version
    Version,
}

#[derive(Subcommand)]
enum EntityAction {
    /// List record names
    List,
    /// Show a record
    Show { name: String },
    /// Remove a record
    Remove { name: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    let server = cli
        .server
        .or(config.server)
        .ok_or_else(|| eyre!("no server configured; pass --server or set it in cobbler.toml"))?;
    let username = cli.username.or(config.username);
    let password = cli.password.or(config.password);

    let conn = match (username, password) {
        (Some(username), Some(password)) => {
            Connection::with_credentials(&server, username, password)?
        }
        _ => Connection::new(&server)?,
    };

    match cli.command {
        Commands::Version => println!("{}", conn.version().await?),
        Commands::Distro { action } => run_entity::<Distro>(&conn, action, cli.json).await?,
        Commands::Profile { action } => run_entity::<Profile>(&conn, action, cli.json).await?,
        Commands::System { action } => run_entity::<System>(&conn, action, cli.json).await?,
        Commands::Image { action } => run_entity::<Image>(&conn, action, cli.json).await?,
    }

    Ok(())
}

async fn run_entity<R: Record + Serialize>(
    conn: &Connection,
    action: EntityAction,
    json: bool,
) -> Result<()> {
    match action {
        EntityAction::List => {
            let records = conn.find_all::<R>().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                for record in &records {
                    println!("{}", record.name());
                }
            }
        }
        EntityAction::Show { name } => {
            let record = conn
                .find_one::<R>(&name)
                .await?
                .ok_or_else(|| eyre!("no {} named {name}", R::KIND))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print_record(&record)?;
            }
        }
        EntityAction::Remove { name } => {
            if conn.remove::<R>(&name).await? {
                println!("removed {} {name}", R::KIND);
            } else {
                return Err(eyre!("server refused to remove {} {name}", R::KIND));
            }
        }
    }
    Ok(())
}

/// Print a record as aligned `field: value` lines, skipping unset fields.
fn print_record(record: &impl Serialize) -> Result<()> {
    let value = serde_json::to_value(record)?;
    if let serde_json::Value::Object(fields) = value {
        for (key, field) in fields {
            match field {
                serde_json::Value::Null => {}
                serde_json::Value::String(s) => println!("{key:>16}: {s}"),
                other => println!("{key:>16}: {other}"),
            }
        }
    }
    Ok(())
}
