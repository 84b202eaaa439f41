//! Platform service for GitHub
//!
//! The workflow only talks to the forge through [`PlatformService`], so the
//! same orchestration runs against the real API or a test double.

mod github;

pub use github::GitHubService;

use crate::error::Result;
use crate::types::{BranchRef, MergeMethod, MergeResult, PlatformConfig, PullRequest};
use async_trait::async_trait;

/// Platform service trait for the operations the workflow performs
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Create `refs/heads/<branch>` pointing at `sha`
    async fn create_ref(&self, branch: &str, sha: &str) -> Result<BranchRef>;

    /// Move `refs/heads/<branch>` to `sha`, optionally discarding commits
    async fn update_ref(&self, branch: &str, sha: &str, force: bool) -> Result<BranchRef>;

    /// Open a PR from `head` into `base`
    async fn create_pr(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: Option<&str>,
        draft: bool,
    ) -> Result<PullRequest>;

    /// Assign users to a PR
    async fn add_assignees(&self, pr_number: u64, assignees: &[String]) -> Result<()>;

    /// Add labels to a PR
    async fn add_labels(&self, pr_number: u64, labels: &[String]) -> Result<()>;

    /// Request review from users and teams in one call
    async fn request_reviewers(
        &self,
        pr_number: u64,
        reviewers: &[String],
        team_reviewers: &[String],
    ) -> Result<()>;

    /// Merge a PR with the specified method
    async fn merge_pr(&self, pr_number: u64, method: MergeMethod) -> Result<MergeResult>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}
