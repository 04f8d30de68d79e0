use clap::Parser;
use clap::Subcommand;
use tracing_subscriber::EnvFilter;

mod args;
mod estimate_cmd;
mod render;
mod submit_cmd;
mod wizard;

use estimate_cmd::EstimateCli;
use submit_cmd::SubmitCli;
use wizard::RunCli;

/// Estimate wasted branded search spend and request a personalized report.
///
/// Without a subcommand the interactive questionnaire starts.
#[derive(Debug, Parser)]
#[command(author, version, bin_name = "brand-savings")]
struct BrandSavingsCli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the estimate for answers given as flags.
    Estimate(EstimateCli),

    /// Walk through the questionnaire interactively.
    Run(RunCli),

    /// Submit answers and contact details non-interactively.
    Submit(SubmitCli),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();
    let cli = BrandSavingsCli::parse();
    match cli.command {
        Some(Command::Estimate(estimate_cli)) => estimate_cmd::run(estimate_cli),
        Some(Command::Run(run_cli)) => wizard::run(run_cli).await,
        Some(Command::Submit(submit_cli)) => submit_cmd::run(submit_cli).await,
        None => wizard::run(RunCli::default()).await,
    }
}

fn setup_tracing() {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
