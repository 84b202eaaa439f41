//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{BranchRef, MergeMethod, MergeResult, PlatformConfig, PullRequest, RepoSlug};
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use tracing::debug;

// REST payloads for the git refs API, which octocrab only partly covers

#[derive(Serialize)]
struct CreateRefRequest<'a> {
    #[serde(rename = "ref")]
    ref_name: String,
    sha: &'a str,
}

#[derive(Serialize)]
struct UpdateRefRequest<'a> {
    sha: &'a str,
    force: bool,
}

#[derive(Serialize)]
struct ReviewRequest<'a> {
    reviewers: &'a [String],
    team_reviewers: &'a [String],
}

#[derive(Deserialize)]
struct GitRefResponse {
    #[serde(rename = "ref")]
    ref_name: String,
    url: String,
    object: GitObject,
}

#[derive(Deserialize)]
struct GitObject {
    sha: String,
}

impl From<GitRefResponse> for BranchRef {
    fn from(r: GitRefResponse) -> Self {
        Self {
            ref_name: r.ref_name,
            sha: r.object.sha,
            url: r.url,
        }
    }
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
}

impl GitHubService {
    /// Create a new GitHub service
    ///
    /// `api_url` overrides the REST endpoint (GitHub Enterprise Server).
    pub fn new(token: &str, slug: RepoSlug, api_url: Option<String>) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        if let Some(url) = api_url {
            builder = builder
                .base_uri(url.as_str())
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
        }

        let client = builder
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        Ok(Self {
            client,
            config: PlatformConfig { slug },
        })
    }

    fn owner(&self) -> &str {
        &self.config.slug.owner
    }

    fn repo(&self) -> &str {
        &self.config.slug.repo
    }
}

/// Route for a single branch ref, escaping each path segment of the branch
fn branch_ref_route(owner: &str, repo: &str, branch: &str) -> String {
    let escaped: Vec<_> = branch
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    format!("/repos/{owner}/{repo}/git/refs/heads/{}", escaped.join("/"))
}

/// Helper to convert octocrab PR to our `PullRequest` type
fn pr_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    PullRequest {
        number: pr.number,
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        base_ref: pr.base.ref_field.clone(),
        head_ref: pr.head.ref_field.clone(),
        title: pr.title.as_deref().unwrap_or_default().to_string(),
        node_id: pr.node_id.clone(),
        is_draft: pr.draft.unwrap_or(false),
        merged: pr.merged_at.is_some(),
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn create_ref(&self, branch: &str, sha: &str) -> Result<BranchRef> {
        debug!(branch, sha, "creating ref");
        let route = format!("/repos/{}/{}/git/refs", self.owner(), self.repo());
        let request = CreateRefRequest {
            ref_name: format!("refs/heads/{branch}"),
            sha,
        };

        let created: GitRefResponse = self.client.post(route, Some(&request)).await?;

        debug!(branch, sha = %created.object.sha, "created ref");
        Ok(created.into())
    }

    async fn update_ref(&self, branch: &str, sha: &str, force: bool) -> Result<BranchRef> {
        debug!(branch, sha, force, "updating ref");
        let route = branch_ref_route(self.owner(), self.repo(), branch);
        let request = UpdateRefRequest { sha, force };

        let updated: GitRefResponse = self.client.patch(route, Some(&request)).await?;

        debug!(branch, sha = %updated.object.sha, "updated ref");
        Ok(updated.into())
    }

    async fn create_pr(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: Option<&str>,
        draft: bool,
    ) -> Result<PullRequest> {
        debug!(head, base, draft, "creating PR");
        let pulls = self.client.pulls(self.owner(), self.repo());
        let mut builder = pulls.create(title, head, base).draft(draft);

        if let Some(body_text) = body {
            builder = builder.body(body_text);
        }

        let pr = builder.send().await?;

        let result = pr_from_octocrab(&pr);
        debug!(pr_number = result.number, "created PR");
        Ok(result)
    }

    async fn add_assignees(&self, pr_number: u64, assignees: &[String]) -> Result<()> {
        debug!(pr_number, ?assignees, "adding assignees");
        let names: Vec<&str> = assignees.iter().map(String::as_str).collect();
        self.client
            .issues(self.owner(), self.repo())
            .add_assignees(pr_number, &names)
            .await?;
        debug!(pr_number, "added assignees");
        Ok(())
    }

    async fn add_labels(&self, pr_number: u64, labels: &[String]) -> Result<()> {
        debug!(pr_number, ?labels, "adding labels");
        let applied = self
            .client
            .issues(self.owner(), self.repo())
            .add_labels(pr_number, labels)
            .await?;
        debug!(pr_number, count = applied.len(), "added labels");
        Ok(())
    }

    async fn request_reviewers(
        &self,
        pr_number: u64,
        reviewers: &[String],
        team_reviewers: &[String],
    ) -> Result<()> {
        debug!(pr_number, ?reviewers, ?team_reviewers, "requesting reviewers");
        let route = format!(
            "/repos/{}/{}/pulls/{pr_number}/requested_reviewers",
            self.owner(),
            self.repo()
        );
        let request = ReviewRequest {
            reviewers,
            team_reviewers,
        };

        let _: serde_json::Value = self.client.post(route, Some(&request)).await?;

        debug!(pr_number, "requested reviewers");
        Ok(())
    }

    async fn merge_pr(&self, pr_number: u64, method: MergeMethod) -> Result<MergeResult> {
        debug!(pr_number, %method, "merging PR");

        let octocrab_method = match method {
            MergeMethod::Squash => octocrab::params::pulls::MergeMethod::Squash,
            MergeMethod::Merge => octocrab::params::pulls::MergeMethod::Merge,
            MergeMethod::Rebase => octocrab::params::pulls::MergeMethod::Rebase,
        };

        let result = self
            .client
            .pulls(self.owner(), self.repo())
            .merge(pr_number)
            .method(octocrab_method)
            .send()
            .await?;

        let merge_result = MergeResult {
            merged: result.merged,
            sha: result.sha,
            message: result.message,
        };

        debug!(
            pr_number,
            merged = merge_result.merged,
            sha = ?merge_result.sha,
            "merge complete"
        );
        Ok(merge_result)
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
