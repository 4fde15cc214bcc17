use anyhow::Context;
use bb_client::ReqwestClient;
use bb_pr_config::{DecoratorConfig, FeatureFlags};
use bb_pr_decorator::{AnalysisResults, PullRequestDecorator};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

mod logger;

/// Decorate a Bitbucket Server pull request with static-analysis results
#[derive(Debug, Parser)]
#[command(name = "bb-pr-decorate", version, about)]
struct Cli {
    /// Config file (defaults to .bb-pr-decorator.toml in CWD, then the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Analysis results as JSON
    #[arg(short, long)]
    analysis: PathBuf,

    /// Pull request id, overriding the one in the analysis results
    #[arg(long)]
    pull_request: Option<String>,

    /// Only log what would be posted or deleted
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    logger::init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // BITBUCKET_TOKEN may come from a .env file
    if let Ok(path) = dotenvy::dotenv() {
        log::debug!("Loaded environment from {:?}", path);
    }

    let mut config = DecoratorConfig::load(cli.config.as_deref())?;
    if cli.dry_run {
        log::info!("Dry run: nothing will be posted or deleted");
        config.features = FeatureFlags::disabled();
    }
    config.validate().context("Invalid decorator configuration")?;

    let mut analysis = AnalysisResults::load(&cli.analysis)?;
    if let Some(id) = cli.pull_request {
        analysis.pull_request_id = id;
    }

    let client = ReqwestClient::new(&config.token, config.request_timeout())?;
    let decorator = PullRequestDecorator::new(client, config);
    let report = decorator.decorate(&analysis).await?;

    log::info!(
        "Done: {} old comments deleted, {} of {} open issues commented, {} closed issues skipped",
        report.deleted_comments,
        report.issue_comments_posted,
        report.open_issues,
        report.closed_issues_skipped
    );
    if report.insights_published {
        log::info!(
            "Code Insights report published with {} annotations",
            report.annotations_posted
        );
    }
    Ok(())
}
