use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ubx")]
#[command(about = "UBX shipping order backend CLI", long_about = None)]
struct Cli {
    /// Verbose logging (debug level unless RUST_LOG is set)
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database commands
    Db {
        #[command(subcommand)]
        cmd: DbCmd,
    },

    /// Receipt counter inspection
    Counter {
        #[command(subcommand)]
        cmd: CounterCmd,
    },

    /// Order operations
    Order {
        #[command(subcommand)]
        cmd: OrderCmd,
    },
}

#[derive(Subcommand)]
enum DbCmd {
    /// Connectivity + schema presence
    Status,

    /// Apply embedded SQL migrations
    Migrate,
}

#[derive(Subcommand)]
enum CounterCmd {
    /// Print the counter row and the receipt number the next order would get today
    Show,
}

#[derive(Subcommand)]
enum OrderCmd {
    /// Print revenue/status totals, optionally filtered
    Summary {
        /// First calendar day, inclusive (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<String>,

        /// Last calendar day, inclusive (YYYY-MM-DD)
        #[arg(long)]
        end_date: Option<String>,

        /// Case-insensitive substring of the admin name
        #[arg(long)]
        admin_name: Option<String>,

        /// Print JSON instead of key=value lines
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Cancel an order by id (idempotent)
    Cancel {
        /// Order id
        #[arg(long)]
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Commands::Db { cmd } => match cmd {
            DbCmd::Status => commands::db::status().await?,
            DbCmd::Migrate => commands::db::migrate().await?,
        },

        Commands::Counter { cmd } => match cmd {
            CounterCmd::Show => commands::counter::show().await?,
        },

        Commands::Order { cmd } => match cmd {
            OrderCmd::Summary {
                start_date,
                end_date,
                admin_name,
                json,
            } => {
                let filter = ubx_db::OrderFilter::parse(
                    start_date.as_deref(),
                    end_date.as_deref(),
                    admin_name.as_deref(),
                )?;
                commands::order::summary(&filter, json).await?
            }
            OrderCmd::Cancel { id } => commands::order::cancel(id).await?,
        },
    }

    Ok(())
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .init();
}
