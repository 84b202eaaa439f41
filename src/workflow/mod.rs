//! Pull request workflow
//!
//! Two-phase pattern:
//! 1. Plan - derive the ordered steps and their failure policies from the
//!    configuration (pure, testable)
//! 2. Execute - perform the steps against the platform (effectful)

mod execute;
mod plan;

pub use execute::{RunReport, StepOutcome, execute_plan};
pub use plan::{BranchStep, FollowUp, OpenPullRequest, WorkflowPlan, create_plan};

use crate::config::WorkflowConfig;
use crate::error::Result;
use crate::output::OutputSink;
use crate::platform::PlatformService;

/// Which side of the pull request a branch belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchSide {
    /// Branch the PR merges into
    Base,
    /// Branch the PR merges from
    Head,
}

impl BranchSide {
    /// Output name for a branch created on this side
    pub const fn output_name(self) -> &'static str {
        match self {
            Self::Base => "base-branch",
            Self::Head => "head-branch",
        }
    }
}

impl std::fmt::Display for BranchSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Base => write!(f, "base"),
            Self::Head => write!(f, "head"),
        }
    }
}

/// A step of the workflow, used to attribute outcomes and failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Create (or move) a branch ref
    CreateBranch(BranchSide),
    /// Open the pull request
    OpenPullRequest,
    /// Assign users
    AddAssignees,
    /// Add labels
    AddLabels,
    /// Request reviews
    RequestReviewers,
    /// Merge the pull request
    Merge,
    /// Write the outputs of a completed step
    PublishOutputs,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateBranch(side) => write!(f, "create {side} branch"),
            Self::OpenPullRequest => write!(f, "open pull-request"),
            Self::AddAssignees => write!(f, "add assignees"),
            Self::AddLabels => write!(f, "add labels"),
            Self::RequestReviewers => write!(f, "request reviewers"),
            Self::Merge => write!(f, "merge"),
            Self::PublishOutputs => write!(f, "publish step outputs"),
        }
    }
}

/// Plan and execute the whole workflow for `config`
pub async fn run(
    config: &WorkflowConfig,
    platform: &dyn PlatformService,
    outputs: &mut dyn OutputSink,
) -> Result<RunReport> {
    let plan = create_plan(config);
    tracing::info!("workflow plan for {}:\n{plan}", config.slug);
    execute_plan(&plan, platform, outputs).await
}
