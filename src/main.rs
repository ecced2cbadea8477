mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod logging;
mod services;
mod workflow;

use clap::{Parser, Subcommand};

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::ticket::{self, AssignArgs, CreateArgs, ShowArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;

#[derive(Parser)]
#[command(name = "ticket-desk", author, version, about = "Support ticket desk")]
struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a ticket, escalating and pricing it by the desk rules.
    Create(CreateArgs),
    /// Reassign an existing ticket to another user.
    Assign(AssignArgs),
    /// Print a stored ticket as JSON.
    Show(ShowArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Config(args) => config_cmd::run(args.command),
        Commands::Create(args) => {
            let ctx = load_context()?;
            let id = ticket::create(&ctx, args).await?;
            println!("Ticket {id} created.");
            Ok(())
        }
        Commands::Assign(args) => {
            let ctx = load_context()?;
            let id = args.id;
            let user = ticket::assign(&ctx, args).await?;
            println!("Ticket {id} assigned to {}.", user.label());
            Ok(())
        }
        Commands::Show(args) => {
            let ctx = load_context()?;
            let ticket = ticket::show(&ctx, args).await?;
            println!("{}", serde_json::to_string_pretty(&ticket)?);
            Ok(())
        }
    }
}

fn load_context() -> AppResult<AppContext> {
    let ctx = AppContext::from_config(AppConfig::load()?)?;
    tracing::debug!(tickets = %ctx.config.tickets_path.display(), "using ticket file");
    Ok(ctx)
}
