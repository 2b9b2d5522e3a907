use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fingrid::cli::{
    handle_accounts_command, handle_analytics, handle_audit, handle_bank_command,
    handle_category_command, handle_history, handle_login, handle_logout, handle_register,
    handle_route, handle_status, handle_summary, handle_transaction_command, AppContext,
};
use fingrid::config::{paths::FinGridPaths, settings::Settings};
use fingrid::display::OutputFormat;

#[derive(Parser)]
#[command(
    name = "fingrid",
    version,
    about = "Personal budget client for the FinGrid backend",
    long_about = "FinGrid keeps your bank accounts, cash wallet and monthly category \
                  budgets in one view. Sign in, link your bank and track spending \
                  from the command line."
)]
struct Cli {
    /// Backend base URL, including the /api prefix
    #[arg(long, global = true, env = "FINGRID_API_URL")]
    api_url: Option<String>,

    /// Output format for views
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in
    Login {
        /// Account email
        email: String,
        /// Password; prompted for when omitted
        #[arg(long, env = "FINGRID_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Create an account
    Register {
        /// Account email
        email: String,
        /// Password; prompted for (twice) when omitted
        #[arg(long, env = "FINGRID_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Sign out and remove the stored token
    Logout,

    /// Show the session state
    Status,

    /// Total capital, wallets and budget progress
    Summary,

    /// Bank account commands
    #[command(subcommand)]
    Accounts(fingrid::cli::AccountCommands),

    /// Recent transactions
    History {
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Spending by category
    Analytics,

    /// Budget category commands
    #[command(subcommand)]
    Category(fingrid::cli::CategoryCommands),

    /// Manual transaction commands
    #[command(subcommand, alias = "txn")]
    Transaction(fingrid::cli::TransactionCommands),

    /// Bank link commands
    #[command(subcommand)]
    Bank(fingrid::cli::BankCommands),

    /// Show what the route guard decides for a screen
    Route {
        /// Screen path, e.g. "/", "screens/login" or "(tabs)/budget"
        path: String,
    },

    /// Show recent entries of the local audit journal
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show current configuration and paths
    Config,
}

/// Diagnostics go to stderr so views stay pipeable
fn init_tracing() {
    let log_format = std::env::var("FINGRID_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let format = cli.format;

    // Initialize paths and settings
    let paths = FinGridPaths::new()?;
    let settings = Settings::load_or_create(&paths)?.with_api_base_url(cli.api_url);

    let command = match cli.command {
        Some(Commands::Config) => {
            println!("FinGrid Configuration");
            println!("=====================");
            println!("Data directory:  {}", paths.base_dir().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!("Credential file: {}", paths.credential_file().display());
            println!("Audit log:       {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Backend:        {}", settings.api_base_url);
            println!("  Currency:       {}", settings.currency_symbol);
            println!("  Failure policy: {}", settings.failure_policy);
            match settings.request_timeout_secs {
                Some(secs) => println!("  Timeout:        {}s", secs),
                None => println!("  Timeout:        none"),
            }
            return Ok(());
        }
        Some(command) => command,
        None => {
            println!("FinGrid - personal budget client");
            println!();
            println!("Run 'fingrid --help' for usage information.");
            println!("Run 'fingrid login <email>' to sign in.");
            return Ok(());
        }
    };

    let ctx = AppContext::open(paths, settings)?;

    match command {
        Commands::Login { email, password } => handle_login(&ctx, &email, password).await?,
        Commands::Register { email, password } => {
            handle_register(&ctx, &email, password).await?
        }
        Commands::Logout => handle_logout(&ctx)?,
        Commands::Status => handle_status(&ctx, format)?,
        Commands::Summary => handle_summary(&ctx, format).await?,
        Commands::Accounts(cmd) => handle_accounts_command(&ctx, cmd, format).await?,
        Commands::History { limit } => handle_history(&ctx, limit, format).await?,
        Commands::Analytics => handle_analytics(&ctx, format).await?,
        Commands::Category(cmd) => handle_category_command(&ctx, cmd, format).await?,
        Commands::Transaction(cmd) => handle_transaction_command(&ctx, cmd).await?,
        Commands::Bank(cmd) => handle_bank_command(&ctx, cmd).await?,
        Commands::Route { path } => handle_route(&ctx, &path, format)?,
        Commands::Audit { limit } => handle_audit(&ctx, limit, format)?,
        Commands::Config => {}
    }

    Ok(())
}
