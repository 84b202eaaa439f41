//! Workflow planning - pure functions for deciding which steps run
//!
//! No I/O happens here. The plan's shape encodes the ordering rules: branch
//! creation first, then the pull request, then the optional follow-ups.

use crate::config::{FailurePolicy, WorkflowConfig};
use crate::types::MergeMethod;
use crate::workflow::{BranchSide, Step};

/// Create or move a branch ref before opening the PR
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchStep {
    /// Which side of the PR this branch is
    pub side: BranchSide,
    /// Branch name (without `refs/heads/`)
    pub branch: String,
    /// Commit to point the branch at
    pub sha: String,
    /// Fall back to a forced update if the ref cannot be created
    pub force: bool,
}

/// Parameters of the create-pull-request call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenPullRequest {
    /// Source branch
    pub head: String,
    /// Target branch
    pub base: String,
    /// PR title
    pub title: String,
    /// PR description
    pub body: Option<String>,
    /// Open as draft
    pub draft: bool,
}

/// Optional step applied to the PR once it exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowUp {
    /// Assign users
    AddAssignees {
        /// Logins to assign
        assignees: Vec<String>,
        /// What to do on failure
        policy: FailurePolicy,
    },
    /// Add labels
    AddLabels {
        /// Label names
        labels: Vec<String>,
        /// What to do on failure
        policy: FailurePolicy,
    },
    /// Request reviews from users and teams
    RequestReviewers {
        /// User logins
        reviewers: Vec<String>,
        /// Team slugs
        team_reviewers: Vec<String>,
        /// What to do on failure
        policy: FailurePolicy,
    },
    /// Merge the PR
    Merge {
        /// Merge method
        method: MergeMethod,
        /// What to do on failure
        policy: FailurePolicy,
    },
}

impl FollowUp {
    /// Step this follow-up performs
    pub const fn step(&self) -> Step {
        match self {
            Self::AddAssignees { .. } => Step::AddAssignees,
            Self::AddLabels { .. } => Step::AddLabels,
            Self::RequestReviewers { .. } => Step::RequestReviewers,
            Self::Merge { .. } => Step::Merge,
        }
    }

    /// Failure policy governing this follow-up
    pub const fn policy(&self) -> FailurePolicy {
        match self {
            Self::AddAssignees { policy, .. }
            | Self::AddLabels { policy, .. }
            | Self::RequestReviewers { policy, .. }
            | Self::Merge { policy, .. } => *policy,
        }
    }
}

impl std::fmt::Display for FollowUp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let on_failure = match self.policy() {
            FailurePolicy::Fail => "fail",
            FailurePolicy::Warn => "warn",
        };
        match self {
            Self::AddAssignees { assignees, .. } => {
                write!(f, "add assignees: {}", assignees.join(", "))?;
            }
            Self::AddLabels { labels, .. } => write!(f, "add labels: {}", labels.join(", "))?,
            Self::RequestReviewers {
                reviewers,
                team_reviewers,
                ..
            } => {
                let mut all: Vec<String> = reviewers.clone();
                all.extend(team_reviewers.iter().map(|t| format!("team:{t}")));
                write!(f, "request reviewers: {}", all.join(", "))?;
            }
            Self::Merge { method, .. } => write!(f, "merge ({method})")?,
        }
        write!(f, " [on failure: {on_failure}]")
    }
}

/// Ordered plan for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowPlan {
    /// Branches to create, base before head
    pub branches: Vec<BranchStep>,
    /// The pull request to open
    pub pull_request: OpenPullRequest,
    /// Optional steps in execution order
    pub follow_ups: Vec<FollowUp>,
}

impl WorkflowPlan {
    /// Total number of remote operations the plan performs
    pub fn step_count(&self) -> usize {
        self.branches.len() + 1 + self.follow_ups.len()
    }
}

impl std::fmt::Display for WorkflowPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut index = 1;
        for branch in &self.branches {
            writeln!(
                f,
                "  {index}. create {} branch '{}' at {}{}",
                branch.side,
                branch.branch,
                branch.sha,
                if branch.force { " (force)" } else { "" }
            )?;
            index += 1;
        }
        let pr = &self.pull_request;
        write!(
            f,
            "  {index}. open pull-request {} -> {}{}",
            pr.head,
            pr.base,
            if pr.draft { " (draft)" } else { "" }
        )?;
        for follow_up in &self.follow_ups {
            index += 1;
            write!(f, "\n  {index}. {follow_up}")?;
        }
        Ok(())
    }
}

/// Create the plan for a run (PURE)
///
/// Empty lists are treated exactly like absent ones: the matching follow-up
/// is left out rather than planned with an empty payload.
pub fn create_plan(config: &WorkflowConfig) -> WorkflowPlan {
    let mut branches = Vec::new();
    if let Some(sha) = &config.base_sha {
        branches.push(BranchStep {
            side: BranchSide::Base,
            branch: config.base.clone(),
            sha: sha.clone(),
            force: false,
        });
    }
    if let Some(sha) = &config.head_sha {
        branches.push(BranchStep {
            side: BranchSide::Head,
            branch: config.head.clone(),
            sha: sha.clone(),
            force: config.force_head,
        });
    }

    let pull_request = OpenPullRequest {
        head: config.head.clone(),
        base: config.base.clone(),
        title: config.title.clone(),
        body: config.body.clone(),
        draft: config.draft,
    };

    let mut follow_ups = Vec::new();
    if !config.assignees.is_empty() {
        follow_ups.push(FollowUp::AddAssignees {
            assignees: config.assignees.clone(),
            policy: config.policies.add_assignees,
        });
    }
    if !config.labels.is_empty() {
        follow_ups.push(FollowUp::AddLabels {
            labels: config.labels.clone(),
            policy: config.policies.add_labels,
        });
    }
    if !config.reviewers.is_empty() || !config.team_reviewers.is_empty() {
        follow_ups.push(FollowUp::RequestReviewers {
            reviewers: config.reviewers.clone(),
            team_reviewers: config.team_reviewers.clone(),
            policy: config.policies.request_reviewers,
        });
    }
    if config.merge {
        follow_ups.push(FollowUp::Merge {
            method: config.merge_method,
            policy: config.policies.merge,
        });
    }

    WorkflowPlan {
        branches,
        pull_request,
        follow_ups,
    }
}
