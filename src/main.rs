//! bikeshare - Explore US bike-share trip data from city CSV files

use bikeshare::{
    cli::{Cli, Command},
    data_loader::DataLoader,
    error::Result,
    output::get_formatter,
    report::render,
    session::Session,
};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging. The --quiet flag should override RUST_LOG.
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("warn")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::new("bikeshare=info,bikeshare_core=info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let command = cli.resolve_command();
    let show_progress =
        !cli.json && command != Command::Interactive && is_terminal::is_terminal(std::io::stdout());
    let loader = DataLoader::new(cli.data_dir.clone()).with_progress(show_progress);
    let formatter = get_formatter(cli.json);

    match command {
        Command::Interactive => {
            info!("Starting interactive session");
            let stdin = std::io::stdin();
            let mut session = Session::new(stdin.lock(), std::io::stdout(), formatter);
            session.run(&loader).await?;
        }
        command => {
            let criteria = cli.require_criteria()?;
            info!("Running {:?} for {:?}", command, criteria);

            let dataset = loader.load_city(criteria.city).await?;
            let table = dataset.into_table(&criteria)?;
            println!("{}", render(&command, &criteria, &table, formatter.as_ref())?);
        }
    }

    Ok(())
}
