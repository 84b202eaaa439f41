//! Run command - resolve inputs, open the pull request, publish outputs

use crate::cli::Cli;
use open_pr::config::WorkflowConfig;
use open_pr::error::Result;
use open_pr::inputs::{ProcessEnv, RawInputs};
use open_pr::output::GitHubOutput;
use open_pr::platform::GitHubService;
use open_pr::workflow;
use tracing::info;

/// Run the workflow once against GitHub
pub async fn run(args: Cli) -> Result<()> {
    let env = ProcessEnv;
    let raw = RawInputs::from(args);

    // Nothing remote happens until the configuration is complete
    let config = WorkflowConfig::from_inputs(&raw, &env)?;

    let platform = GitHubService::new(&config.token, config.slug.clone(), config.api_url.clone())?;
    let mut outputs = GitHubOutput::from_env(&env);

    let report = workflow::run(&config, &platform, &mut outputs).await?;

    let warnings = report.warnings().count();
    if warnings == 0 {
        info!(
            pr_number = report.pull_request.number,
            "pull-request {} is ready",
            report.pull_request.html_url
        );
    } else {
        info!(
            pr_number = report.pull_request.number,
            warnings,
            "pull-request {} opened, some optional steps failed",
            report.pull_request.html_url
        );
    }
    Ok(())
}
