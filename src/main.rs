use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mimonb_schema::{
    cli::{Cli, Commands},
    commands,
    config::Config,
};

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;
    cli.apply(&mut config);
    config.validate()?;
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Up(args) => commands::up::execute(args, &config),
        Commands::Down(args) => commands::down::execute(args, &config),
        Commands::Status => commands::status::execute(&config),
        Commands::List => commands::list::execute(&config),
        Commands::Sql(args) => commands::sql::execute(args, &config),
        Commands::Export(args) => commands::export::execute(args, &config),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
