use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

use dashboard_scrape::browser::ChromiumLauncher;
use dashboard_scrape::cli::{Cli, Command};
use dashboard_scrape::schema::SessionStatus;
use dashboard_scrape::scrape_engine::ScrapeRunner;
use dashboard_scrape::server::{self, AppState};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dashboard_scrape::logging::init(cli.log_level.as_deref()).context("init logging")?;
    tracing::debug!(?cli, "parsed cli");

    let runner = ScrapeRunner::new(ChromiumLauncher);

    match cli.command {
        Command::Scrape(args) => {
            let config = args.session.to_config()?;
            let output_dir = config.output_dir().to_path_buf();
            let session = runner.run(config).await.context("scrape")?;

            tracing::info!(
                status = ?session.status,
                sections = session.sections.len(),
                api_captures = session.api_captures.len(),
                "Results in {}",
                output_dir.display()
            );
            if session.status == SessionStatus::Failed {
                let reason = session.errors.last().map_or("unknown error", String::as_str);
                anyhow::bail!("scrape failed: {reason}");
            }
        }
        Command::Serve(args) => {
            let defaults = args.session.to_config()?;
            server::serve(AppState::new(runner, defaults), args.addr)
                .await
                .context("serve")?;
        }
    }

    Ok(())
}
