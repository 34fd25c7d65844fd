//! Storedesk - a terminal admin console for catalog categories and products.

use clap::Parser;

use storedesk::cli::{failure_message, run_init, run_list, Cli, Commands};
use storedesk::{app, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::List(args)) => {
            logging::init_stderr()?;
            let config = cli
                .load_config()
                .map_err(|e| anyhow::anyhow!(failure_message(&e, None)))?;
            let output = run_list(&config, args).await.map_err(|e| {
                tracing::error!(error = %e, "List command failed");
                anyhow::anyhow!(failure_message(&e, Some(&config)))
            })?;
            print!("{}", output);
        }
        Some(Commands::Init { force }) => {
            logging::init_stderr()?;
            let config = cli
                .load_config()
                .map_err(|e| anyhow::anyhow!(failure_message(&e, None)))?;
            let path = cli
                .config_target()
                .map_err(|e| anyhow::anyhow!(failure_message(&e, None)))?;
            run_init(&config, &path, *force)
                .map_err(|e| anyhow::anyhow!(failure_message(&e, None)))?;
            println!("Wrote {}", path.display());
        }
        None => {
            logging::init()?;
            let config = cli
                .load_config()
                .map_err(|e| anyhow::anyhow!(failure_message(&e, None)))?;
            let result = app::run(config.clone()).await;
            logging::shutdown();
            if let Err(e) = result {
                tracing::error!(error = %e, "Application error");
                if let Some(dir) = logging::log_directory() {
                    eprintln!("Logs are in {}", dir.display());
                }
                return Err(anyhow::anyhow!(failure_message(&e, Some(&config))));
            }
        }
    }

    Ok(())
}
