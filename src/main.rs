//! actionsmith CLI — typed GitHub Actions workflow generation.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "actionsmith",
    version,
    about = "Generate chained GitHub Actions deployment workflows from a service description"
)]
struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: actionsmith::cli::Commands,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "actionsmith=debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(e) = actionsmith::cli::dispatch(cli.command) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
