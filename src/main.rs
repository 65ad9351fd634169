use clap::Parser;
use examen::cli::Cli;
use examen::commands;
use examen::services::output;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(err) = commands::dispatch(&cli) {
        output::print_failure(cli.json, &err);
        std::process::exit(1);
    }
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
