use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use futures_util::StreamExt;
use kbank_ingest::{StatementKind, StatementRow, decode_statement};
use kbank_portal::{Portal, StatementStream};
use serde::Serialize;
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod credentials;
mod state;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("KBANK_GIT_DESCRIBE"), ")");

#[derive(Parser, Debug)]
#[command(
    name = "kbank",
    version = VERSION,
    about = "K-Online / K-eBank session client"
)]
struct Cli {
    /// Print JSON instead of tab-separated text
    #[arg(long, global = true)]
    json: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write ~/.kbank/config.toml with defaults
    Init {
        #[arg(long)]
        username: Option<String>,
    },

    /// Decode a statement CSV that was saved from the portal
    Decode {
        #[arg(long)]
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = ExportKind::History)]
        kind: ExportKind,
    },

    #[command(flatten)]
    Portal(PortalCommand),
}

/// Subcommands that need a portal session.
#[derive(Subcommand, Debug)]
enum PortalCommand {
    /// Check whether the stored session is still alive
    Status,

    /// Log in to K-Online and hand the session over to K-eBank
    Login {
        /// Log in even if the stored session is alive
        #[arg(long)]
        force: bool,
    },

    /// Log out of both domains
    Logout,

    /// List accounts (id, number, name)
    Accounts,

    /// Show current balances
    Balances,

    /// Download a date-range statement
    Statement {
        /// Account number, e.g. 123-4-56789-0
        #[arg(long)]
        account: String,

        /// First day (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,

        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        to: NaiveDate,
    },

    /// Download today's transactions
    Today {
        #[arg(long)]
        account: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportKind {
    History,
    Today,
}

impl From<ExportKind> for StatementKind {
    fn from(kind: ExportKind) -> Self {
        match kind {
            ExportKind::History => StatementKind::History,
            ExportKind::Today => StatementKind::Today,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Init { username } => config::init_config(username)?,

        Command::Decode { file, kind } => {
            let f = File::open(&file).with_context(|| format!("open {}", file.display()))?;
            let rows = decode_statement(f, StatementKind::from(kind).schema())
                .with_context(|| format!("decoding {}", file.display()))?;
            for row in &rows {
                print_row(row, cli.json)?;
            }
        }

        Command::Portal(command) => run_portal_command(command, cli.json).await?,
    }

    Ok(())
}

fn open_portal() -> Result<Portal> {
    let cfg = config::load_config()?;
    let creds = credentials::resolve_credentials(&cfg)?;

    let mut portal = Portal::new(creds)?.with_endpoints(cfg.endpoints());
    portal.set_cookie_path(cfg.cookie_path()?)?;
    Ok(portal)
}

async fn run_portal_command(command: PortalCommand, json: bool) -> Result<()> {
    let mut portal = open_portal()?;

    match command {
        PortalCommand::Status => {
            let alive = portal.is_logged_in().await?;
            if json {
                println!("{}", serde_json::json!({ "logged_in": alive }));
            } else if alive {
                println!("Session is active");
            } else {
                println!("Not logged in. Run: kbank login");
            }
        }

        PortalCommand::Login { force } => {
            if !force && portal.is_logged_in().await? {
                println!("Already logged in");
                return Ok(());
            }
            if !portal.login().await? {
                bail!("login rejected by the portal (check credentials, or run with --log-level debug)");
            }
            println!("Logged in as {}", portal.credentials().username());
        }

        PortalCommand::Logout => {
            if !portal.logout().await? {
                bail!("logout was not acknowledged by the portal");
            }
            println!("Logged out");
        }

        PortalCommand::Accounts => {
            let Some(accounts) = portal.accounts().await? else {
                bail!("account list unavailable. Run: kbank login");
            };
            print_list(&accounts, json, |a| format!("{}\t{}\t{}", a.id, a.number, a.name))?;
        }

        PortalCommand::Balances => {
            let Some(balances) = portal.balances().await? else {
                bail!("account summary unavailable. Run: kbank login");
            };
            print_list(&balances, json, |b| format!("{}\t{}\t{}", b.number, b.name, b.balance))?;
        }

        PortalCommand::Statement { account, from, to } => {
            if from > to {
                bail!("--from {from} is after --to {to}");
            }
            let rows = portal.statement(&account, from, to).await?;
            print_rows(rows, json).await?;
        }

        PortalCommand::Today { account } => {
            let rows = portal.today_statement(&account).await?;
            print_rows(rows, json).await?;
        }
    }

    Ok(())
}

fn print_list<T: Serialize>(items: &[T], json: bool, line: impl Fn(&T) -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else {
        for item in items {
            println!("{}", line(item));
        }
    }
    Ok(())
}

fn print_row(row: &StatementRow, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(row)?);
    } else {
        let cells: Vec<&str> = row.iter().map(|(_, v)| v).collect();
        println!("{}", cells.join("\t"));
    }
    Ok(())
}

async fn print_rows(mut rows: StatementStream, json: bool) -> Result<()> {
    let mut count = 0usize;
    while let Some(row) = rows.next().await {
        print_row(&row?, json)?;
        count += 1;
    }
    tracing::info!(count, "statement rows");
    Ok(())
}
