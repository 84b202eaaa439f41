//! Workflow execution - effectful operations
//!
//! Takes a `WorkflowPlan` (created by the pure planning functions) and runs
//! it against the platform API, one awaited call at a time. Branch creation
//! and opening the PR are always fatal on failure; follow-ups consult their
//! own `FailurePolicy`.

use crate::config::FailurePolicy;
use crate::error::{Error, Result};
use crate::output::{OutputSink, set_json_output};
use crate::platform::PlatformService;
use crate::types::{BranchRef, PullRequest};
use crate::workflow::plan::{BranchStep, FollowUp, WorkflowPlan};
use crate::workflow::{BranchSide, Step};
use tracing::{error, info, warn};

/// Outcome of an optional step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step succeeded
    Succeeded {
        /// Step that ran
        step: Step,
        /// Human-readable detail
        detail: String,
    },
    /// The step failed under a warn-only policy
    Warned {
        /// Step that failed
        step: Step,
        /// Why it failed
        reason: String,
    },
}

impl StepOutcome {
    /// Step this outcome belongs to
    pub const fn step(&self) -> Step {
        match self {
            Self::Succeeded { step, .. } | Self::Warned { step, .. } => *step,
        }
    }
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Branches created before opening the PR
    pub branches: Vec<(BranchSide, BranchRef)>,
    /// The opened pull request
    pub pull_request: PullRequest,
    /// Outcomes of the follow-ups that ran, in order
    pub outcomes: Vec<StepOutcome>,
    /// Merge commit, if the PR was merged
    pub merge_commit_sha: Option<String>,
}

impl RunReport {
    /// Follow-ups that failed without aborting the run
    pub fn warnings(&self) -> impl Iterator<Item = &StepOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, StepOutcome::Warned { .. }))
    }

    /// Whether every step that ran succeeded
    pub fn is_clean(&self) -> bool {
        self.warnings().next().is_none()
    }
}

/// Execute the workflow plan (EFFECTFUL)
///
/// Outputs are published as soon as the step that produces them succeeds,
/// so a later fatal failure still leaves the earlier outputs in place.
pub async fn execute_plan(
    plan: &WorkflowPlan,
    platform: &dyn PlatformService,
    outputs: &mut dyn OutputSink,
) -> Result<RunReport> {
    let slug = &platform.config().slug;

    let mut branches = Vec::with_capacity(plan.branches.len());
    for step in &plan.branches {
        let branch = create_branch(step, platform)
            .await
            .map_err(|e| Error::StepFailed {
                step: Step::CreateBranch(step.side),
                pull_request: None,
                source: Box::new(e),
            })?;
        info!(
            "Created {} branch '{}' from SHA '{}' on {slug}",
            step.side,
            branch.branch_name(),
            branch.sha
        );
        set_json_output(outputs, step.side.output_name(), &branch).map_err(|e| {
            Error::StepFailed {
                step: Step::PublishOutputs,
                pull_request: None,
                source: Box::new(e),
            }
        })?;
        branches.push((step.side, branch));
    }

    let open = &plan.pull_request;
    let pr = platform
        .create_pr(
            &open.head,
            &open.base,
            &open.title,
            open.body.as_deref(),
            open.draft,
        )
        .await
        .map_err(|e| {
            error!(
                repository = %slug,
                head = %open.head,
                base = %open.base,
                "could not open pull-request"
            );
            Error::StepFailed {
                step: Step::OpenPullRequest,
                pull_request: None,
                source: Box::new(e),
            }
        })?;
    info!("Opened pull-request #{}: {}", pr.number, pr.html_url);
    publish_pull_request(&pr, outputs).map_err(|e| Error::StepFailed {
        step: Step::PublishOutputs,
        pull_request: Some((pr.number, pr.html_url.clone())),
        source: Box::new(e),
    })?;

    let mut report = RunReport {
        branches,
        pull_request: pr,
        outcomes: Vec::with_capacity(plan.follow_ups.len()),
        merge_commit_sha: None,
    };

    for follow_up in &plan.follow_ups {
        let step = follow_up.step();
        // The merge commit output belongs to the merge step and shares its policy
        let done = run_follow_up(follow_up, &report.pull_request, platform)
            .await
            .and_then(|done| {
                if let Some(sha) = &done.merge_sha {
                    outputs.set_output("merge-commit-sha", sha)?;
                }
                Ok(done)
            });
        match done {
            Ok(FollowUpDone { detail, merge_sha }) => {
                info!("{step}: {detail}");
                if let Some(sha) = merge_sha {
                    report.merge_commit_sha = Some(sha);
                }
                report.outcomes.push(StepOutcome::Succeeded { step, detail });
            }
            Err(e) => match follow_up.policy() {
                FailurePolicy::Fail => {
                    return Err(Error::StepFailed {
                        step,
                        pull_request: Some((
                            report.pull_request.number,
                            report.pull_request.html_url.clone(),
                        )),
                        source: Box::new(e),
                    });
                }
                FailurePolicy::Warn => {
                    let reason = e.to_string();
                    warn!(%step, %reason, "step failed, continuing");
                    outputs.warning(&format!(
                        "Couldn't {step} for pull-request #{}: {reason}",
                        report.pull_request.number
                    ));
                    report.outcomes.push(StepOutcome::Warned { step, reason });
                }
            },
        }
    }

    Ok(report)
}

/// Publish the record, number and URL of the opened PR
fn publish_pull_request(pr: &PullRequest, outputs: &mut dyn OutputSink) -> Result<()> {
    set_json_output(outputs, "pull-request", pr)?;
    outputs.set_output("pull-request-number", &pr.number.to_string())?;
    outputs.set_output("pull-request-url", &pr.html_url)
}

/// Create the branch, or force it into place when allowed
async fn create_branch(step: &BranchStep, platform: &dyn PlatformService) -> Result<BranchRef> {
    match platform.create_ref(&step.branch, &step.sha).await {
        Ok(branch) => Ok(branch),
        Err(e) if step.force => {
            warn!(
                branch = %step.branch,
                error = %e,
                "could not create ref, forcing update instead"
            );
            platform.update_ref(&step.branch, &step.sha, true).await
        }
        Err(e) => Err(e),
    }
}

struct FollowUpDone {
    detail: String,
    merge_sha: Option<String>,
}

impl FollowUpDone {
    const fn detail(detail: String) -> Self {
        Self {
            detail,
            merge_sha: None,
        }
    }
}

async fn run_follow_up(
    follow_up: &FollowUp,
    pr: &PullRequest,
    platform: &dyn PlatformService,
) -> Result<FollowUpDone> {
    match follow_up {
        FollowUp::AddAssignees { assignees, .. } => {
            platform.add_assignees(pr.number, assignees).await?;
            Ok(FollowUpDone::detail(format!(
                "assigned {} to #{}",
                assignees.join(", "),
                pr.number
            )))
        }
        FollowUp::AddLabels { labels, .. } => {
            platform.add_labels(pr.number, labels).await?;
            Ok(FollowUpDone::detail(format!(
                "labelled #{} with {}",
                pr.number,
                labels.join(", ")
            )))
        }
        FollowUp::RequestReviewers {
            reviewers,
            team_reviewers,
            ..
        } => {
            platform
                .request_reviewers(pr.number, reviewers, team_reviewers)
                .await?;
            Ok(FollowUpDone::detail(format!(
                "requested review on #{} from {} user(s) and {} team(s)",
                pr.number,
                reviewers.len(),
                team_reviewers.len()
            )))
        }
        FollowUp::Merge { method, .. } => {
            let result = platform.merge_pr(pr.number, *method).await?;
            if !result.merged {
                return Err(Error::Platform(
                    result
                        .message
                        .unwrap_or_else(|| "merge was not performed".to_string()),
                ));
            }
            let sha_display = result.sha.as_deref().unwrap_or("(no sha)");
            Ok(FollowUpDone {
                detail: format!("merged #{} ({method}): {sha_display}", pr.number),
                merge_sha: result.sha,
            })
        }
    }
}
