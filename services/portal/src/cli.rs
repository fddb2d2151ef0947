use crate::convert::{run_convert, ConvertArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use talent_pool::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Talent Pool Portal",
    about = "Run the talent pool portal or convert applicant exports from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Convert an applicant CSV export into talent profiles and print the outcome
    Convert(ConvertArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Publish a job opening on startup (repeatable)
    #[arg(long = "job")]
    pub(crate) jobs: Vec<String>,
    /// Preload applicants from a CSV export
    #[arg(long)]
    pub(crate) applicants_csv: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Convert(args) => run_convert(args),
    }
}
