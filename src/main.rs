use clap::Parser;
use ringlens::cli::{Cli, Command};
use ringlens::{
    cmd_analyze, cmd_export, cmd_health, cmd_init, cmd_network, cmd_serve, cmd_summary,
    cmd_suspects,
};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("ringlens=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_env("RINGLENS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let api_url = cli.api_url.as_deref();
    let exit_code = match cli.command {
        Command::Serve(args) => cmd_serve(args, api_url),
        Command::Summary(args) => cmd_summary(args, api_url),
        Command::Suspects(args) => cmd_suspects(args, api_url),
        Command::Network(args) => cmd_network(args, api_url),
        Command::Health(args) => cmd_health(args, api_url),
        Command::Export(args) => cmd_export(args, api_url),
        Command::Analyze(args) => cmd_analyze(args, api_url),
        Command::Init(args) => cmd_init(args),
    };

    std::process::exit(exit_code);
}
