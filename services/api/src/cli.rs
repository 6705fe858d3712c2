use crate::demo::{run_demo, run_timeline, DemoArgs, TimelineArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use dieti_agenda::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Dieti Agenda",
    about = "Serve and inspect the agent visit agenda from the command line",
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
    /// Print the classified day view for the sample agenda
    Timeline(TimelineArgs),
    /// Walk through accepting and declining the sample visit requests
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Timeline(args) => run_timeline(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
