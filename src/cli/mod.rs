//! Command-line surface
//!
//! Every action input is also a long flag. When the binary runs as an action
//! step the runner exports `INPUT_<NAME>` for each `with:` entry, which clap
//! picks up as the flag's value.

mod run;

pub use run::run;

use clap::Parser;
use open_pr::inputs::RawInputs;

/// Open a pull request, optionally creating branches, adding metadata and merging
#[derive(Debug, Parser)]
#[command(name = "open-pr", version, about)]
#[allow(clippy::struct_field_names)]
pub struct Cli {
    /// GitHub token used for every API call
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Branch the pull request merges into
    #[arg(long, env = "INPUT_BASE")]
    base: Option<String>,

    /// Branch the pull request merges from
    #[arg(long, env = "INPUT_HEAD")]
    head: Option<String>,

    /// Pull request title
    #[arg(long, env = "INPUT_TITLE")]
    title: Option<String>,

    /// Pull request description
    #[arg(long, env = "INPUT_BODY")]
    body: Option<String>,

    /// Create the base branch from this commit first
    #[arg(long, env = "INPUT_BASE-SHA")]
    base_sha: Option<String>,

    /// Create the head branch from this commit first
    #[arg(long, env = "INPUT_HEAD-SHA")]
    head_sha: Option<String>,

    /// Users to assign, one per line
    #[arg(long, env = "INPUT_ASSIGNEES")]
    assignees: Option<String>,

    /// Labels to add, one per line
    #[arg(long, env = "INPUT_LABELS")]
    labels: Option<String>,

    /// Users to request review from, one per line
    #[arg(long, env = "INPUT_REVIEWERS")]
    reviewers: Option<String>,

    /// Teams to request review from, one per line
    #[arg(long, env = "INPUT_TEAM-REVIEWERS")]
    team_reviewers: Option<String>,

    /// Repository owner (defaults to the invoking repository's owner)
    #[arg(long, env = "INPUT_OWNER")]
    owner: Option<String>,

    /// Repository name, or owner/repo
    #[arg(long, env = "INPUT_REPOSITORY")]
    repository: Option<String>,

    /// Open the pull request as a draft (true/false)
    #[arg(long, env = "INPUT_DRAFT")]
    draft: Option<String>,

    /// Merge the pull request after creating it (true/false)
    #[arg(long, env = "INPUT_MERGE")]
    merge: Option<String>,

    /// Merge method: merge, squash or rebase
    #[arg(long, env = "INPUT_MERGE-METHOD")]
    merge_method: Option<String>,

    /// Fail the run if assignees cannot be added (true/false)
    #[arg(long, env = "INPUT_FAIL-ON-ADD-ASSIGNEES-FAILURE")]
    fail_on_add_assignees_failure: Option<String>,

    /// Fail the run if labels cannot be added (true/false)
    #[arg(long, env = "INPUT_FAIL-ON-ADD-LABELS-FAILURE")]
    fail_on_add_labels_failure: Option<String>,

    /// Fail the run if reviewers cannot be requested (true/false)
    #[arg(long, env = "INPUT_FAIL-ON-REQUEST-REVIEWERS-FAILURE")]
    fail_on_request_reviewers_failure: Option<String>,

    /// Fail the run if the merge fails (true/false)
    #[arg(long, env = "INPUT_FAIL-ON-MERGE-FAILURE")]
    fail_on_merge_failure: Option<String>,

    /// Overwrite the head branch if it already exists (true/false)
    #[arg(long, env = "INPUT_FORCE-HEAD")]
    force_head: Option<String>,

    /// GitHub REST API URL (for GitHub Enterprise Server)
    #[arg(long, env = "INPUT_API-URL")]
    api_url: Option<String>,
}

impl From<Cli> for RawInputs {
    fn from(cli: Cli) -> Self {
        Self {
            token: cli.token,
            base: cli.base,
            head: cli.head,
            title: cli.title,
            body: cli.body,
            base_sha: cli.base_sha,
            head_sha: cli.head_sha,
            assignees: cli.assignees,
            labels: cli.labels,
            reviewers: cli.reviewers,
            team_reviewers: cli.team_reviewers,
            owner: cli.owner,
            repository: cli.repository,
            draft: cli.draft,
            merge: cli.merge,
            merge_method: cli.merge_method,
            fail_on_add_assignees_failure: cli.fail_on_add_assignees_failure,
            fail_on_add_labels_failure: cli.fail_on_add_labels_failure,
            fail_on_request_reviewers_failure: cli.fail_on_request_reviewers_failure,
            fail_on_merge_failure: cli.fail_on_merge_failure,
            force_head: cli.force_head,
            api_url: cli.api_url,
        }
    }
}
