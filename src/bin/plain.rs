use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use log::info;

use plain_mail::config::{load_config, resolve_log_path, resolve_spool_dir};
use plain_mail::domain::email::{WebhookEvent, welcome_email};
use plain_mail::ingest::spool::write_event;
use plain_mail::store::csv_seed::CsvSeed;
use plain_mail::store::repo::load_or_welcome;
use plain_mail::terminal::run_tui;

#[derive(Parser)]
#[command(name = "plain")]
#[command(about = "Do less email. Plain and simple.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the terminal client
    Tui {
        /// CSV export to seed the mailbox with
        #[arg(long)]
        seed: Option<PathBuf>,

        /// Directory watched for incoming webhook files
        #[arg(long)]
        spool: Option<PathBuf>,
    },

    /// Deliver one email to a running client through its spool directory
    Inject {
        #[arg(long)]
        sender_name: String,

        #[arg(long)]
        sender_email: String,

        #[arg(long)]
        subject: String,

        #[arg(long, default_value = "")]
        body: String,

        #[arg(long, default_value = "")]
        summary: String,

        /// Display timestamp; defaults to the current UTC time
        #[arg(long)]
        received: Option<String>,

        #[arg(long)]
        spool: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config().map_err(|e| anyhow!("Configuration error: {e}"))?;

    match cli.cmd {
        Command::Tui { seed, spool } => {
            // stderr belongs to the terminal UI while it runs
            let log_path = resolve_log_path(&cfg)?;
            let log_file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)?;
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .target(env_logger::Target::Pipe(Box::new(log_file)))
                .init();

            let emails = match seed.or_else(|| cfg.seed_csv.as_ref().map(PathBuf::from)) {
                Some(path) => {
                    let seed = CsvSeed::new(path);
                    info!("seeding mailbox from {}", seed.path().display());
                    load_or_welcome(&seed)
                }
                None => vec![welcome_email()],
            };
            let spool_dir = match spool {
                Some(p) => p,
                None => resolve_spool_dir(&cfg)?,
            };
            run_tui(&cfg, emails, spool_dir)
        }

        Command::Inject {
            sender_name,
            sender_email,
            subject,
            body,
            summary,
            received,
            spool,
        } => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .init();

            let spool_dir = match spool {
                Some(p) => p,
                None => resolve_spool_dir(&cfg)?,
            };
            let ev = WebhookEvent {
                sender_name,
                sender_email,
                received: received
                    .unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%d %H:%M").to_string()),
                subject,
                body,
                summary,
            };
            let path = write_event(&spool_dir, &ev)?;
            info!("queued {}", path.display());
            println!("Queued {}", path.display());
            Ok(())
        }
    }
}
