//! Workflow configuration
//!
//! Built once from [`RawInputs`] plus the environment and never mutated.

use crate::error::{Error, Result};
use crate::inputs::{Environment, Layer, RawInputs, parse_bool, parse_list, resolve, resolve_value};
use crate::types::{MergeMethod, RepoSlug};
use tracing::debug;

/// What to do when an optional step fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Abort the run
    #[default]
    Fail,
    /// Emit a warning and continue with the next step
    Warn,
}

impl FailurePolicy {
    /// Map a `fail-on-*` flag to a policy
    pub const fn from_fail_flag(fail: bool) -> Self {
        if fail { Self::Fail } else { Self::Warn }
    }
}

/// Per-step failure policies for the optional steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepPolicies {
    /// `fail-on-add-assignees-failure`
    pub add_assignees: FailurePolicy,
    /// `fail-on-add-labels-failure`
    pub add_labels: FailurePolicy,
    /// `fail-on-request-reviewers-failure`
    pub request_reviewers: FailurePolicy,
    /// `fail-on-merge-failure`
    pub merge: FailurePolicy,
}

/// Immutable configuration for a single run
#[derive(Clone)]
pub struct WorkflowConfig {
    /// GitHub token
    pub token: String,
    /// Target repository
    pub slug: RepoSlug,
    /// Branch the PR merges into
    pub base: String,
    /// Branch the PR merges from
    pub head: String,
    /// PR title
    pub title: String,
    /// PR description
    pub body: Option<String>,
    /// Commit to create the base branch from
    pub base_sha: Option<String>,
    /// Commit to create the head branch from
    pub head_sha: Option<String>,
    /// Users to assign
    pub assignees: Vec<String>,
    /// Labels to add
    pub labels: Vec<String>,
    /// Users to request review from
    pub reviewers: Vec<String>,
    /// Team slugs to request review from
    pub team_reviewers: Vec<String>,
    /// Open the PR as a draft
    pub draft: bool,
    /// Merge after creation
    pub merge: bool,
    /// Merge method used when `merge` is set
    pub merge_method: MergeMethod,
    /// Allow the head ref to be force-overwritten
    pub force_head: bool,
    /// Failure policy per optional step
    pub policies: StepPolicies,
    /// REST API base URL override
    pub api_url: Option<String>,
}

// Manual Debug impl to avoid leaking the token
impl std::fmt::Debug for WorkflowConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowConfig")
            .field("token", &"[REDACTED]")
            .field("slug", &self.slug)
            .field("base", &self.base)
            .field("head", &self.head)
            .field("title", &self.title)
            .field("body", &self.body)
            .field("base_sha", &self.base_sha)
            .field("head_sha", &self.head_sha)
            .field("assignees", &self.assignees)
            .field("labels", &self.labels)
            .field("reviewers", &self.reviewers)
            .field("team_reviewers", &self.team_reviewers)
            .field("draft", &self.draft)
            .field("merge", &self.merge)
            .field("merge_method", &self.merge_method)
            .field("force_head", &self.force_head)
            .field("policies", &self.policies)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl WorkflowConfig {
    /// Resolve every input and build the configuration.
    ///
    /// Fails with [`Error::MissingInputs`] naming every absent required input
    /// before anything else is validated.
    pub fn from_inputs(raw: &RawInputs, env: &dyn Environment) -> Result<Self> {
        let token = resolve_value("token", raw.token.as_deref(), Some("GITHUB_TOKEN"), env);
        let base = resolve_value("base", raw.base.as_deref(), Some("BASE"), env);
        let head = resolve_value("head", raw.head.as_deref(), Some("HEAD"), env);
        let title = resolve_value("title", raw.title.as_deref(), Some("TITLE"), env);

        let (Some(token), Some(base), Some(head), Some(title)) = (&token, &base, &head, &title)
        else {
            let missing = [
                ("token", token.is_none()),
                ("base", base.is_none()),
                ("head", head.is_none()),
                ("title", title.is_none()),
            ]
            .into_iter()
            .filter_map(|(name, absent)| absent.then_some(name))
            .collect();
            return Err(Error::MissingInputs(missing));
        };

        let slug = resolve_slug(raw, env)?;

        let opt = |name: &str, direct: &Option<String>, var: &str| {
            resolve_value(name, direct.as_deref(), Some(var), env)
        };
        let list = |name: &str, direct: &Option<String>, var: &str| {
            parse_list(opt(name, direct, var).as_deref())
        };
        let flag = |name: &'static str, direct: &Option<String>, var: &str, default: bool| {
            parse_bool(name, opt(name, direct, var).as_deref(), default)
        };

        let merge_method = match opt("merge-method", &raw.merge_method, "MERGE_METHOD") {
            Some(value) => value
                .parse::<MergeMethod>()
                .map_err(|reason| Error::InvalidInput {
                    name: "merge-method",
                    value,
                    reason,
                })?,
            None => MergeMethod::default(),
        };

        let policies = StepPolicies {
            add_assignees: FailurePolicy::from_fail_flag(flag(
                "fail-on-add-assignees-failure",
                &raw.fail_on_add_assignees_failure,
                "FAIL_ON_ADD_ASSIGNEES_FAILURE",
                true,
            )?),
            add_labels: FailurePolicy::from_fail_flag(flag(
                "fail-on-add-labels-failure",
                &raw.fail_on_add_labels_failure,
                "FAIL_ON_ADD_LABELS_FAILURE",
                true,
            )?),
            request_reviewers: FailurePolicy::from_fail_flag(flag(
                "fail-on-request-reviewers-failure",
                &raw.fail_on_request_reviewers_failure,
                "FAIL_ON_REQUEST_REVIEWERS_FAILURE",
                true,
            )?),
            merge: FailurePolicy::from_fail_flag(flag(
                "fail-on-merge-failure",
                &raw.fail_on_merge_failure,
                "FAIL_ON_MERGE_FAILURE",
                true,
            )?),
        };

        let api_url = resolve(
            "api-url",
            raw.api_url.as_deref(),
            None,
            env.var("GITHUB_API_URL"),
            env,
        )
        .map(|(v, _)| v);
        if let Some(ref url) = api_url {
            url::Url::parse(url).map_err(|e| Error::InvalidInput {
                name: "api-url",
                value: url.clone(),
                reason: e.to_string(),
            })?;
        }

        let config = Self {
            token: token.clone(),
            slug,
            base: base.clone(),
            head: head.clone(),
            title: title.clone(),
            body: opt("body", &raw.body, "BODY"),
            base_sha: opt("base-sha", &raw.base_sha, "BASE_SHA"),
            head_sha: opt("head-sha", &raw.head_sha, "HEAD_SHA"),
            assignees: list("assignees", &raw.assignees, "ASSIGNEES"),
            labels: list("labels", &raw.labels, "LABELS"),
            reviewers: list("reviewers", &raw.reviewers, "REVIEWERS"),
            team_reviewers: list("team-reviewers", &raw.team_reviewers, "TEAM_REVIEWERS"),
            draft: flag("draft", &raw.draft, "DRAFT", false)?,
            merge: flag("merge", &raw.merge, "MERGE", false)?,
            merge_method,
            force_head: flag("force-head", &raw.force_head, "FORCE_HEAD", false)?,
            policies,
            api_url,
        };

        debug!(?config, "resolved workflow configuration");
        Ok(config)
    }
}

/// Work out the target repository.
///
/// `repository` in `owner/repo` form overrides any separately given owner.
/// Otherwise owner and repo are resolved independently, each falling back to
/// the invoking repository from `GITHUB_REPOSITORY`.
fn resolve_slug(raw: &RawInputs, env: &dyn Environment) -> Result<RepoSlug> {
    let ambient = env
        .var("GITHUB_REPOSITORY")
        .as_deref()
        .and_then(RepoSlug::parse);

    let repository = resolve(
        "repository",
        raw.repository.as_deref(),
        Some("REPOSITORY"),
        ambient.as_ref().map(|s| s.repo.clone()),
        env,
    );

    if let Some((ref value, layer)) = repository
        && layer != Layer::Ambient
        && value.contains('/')
    {
        return RepoSlug::parse(value).ok_or_else(|| Error::InvalidInput {
            name: "repository",
            value: value.clone(),
            reason: "expected owner/repo".to_string(),
        });
    }

    let owner = resolve(
        "owner",
        raw.owner.as_deref(),
        Some("OWNER"),
        ambient.as_ref().map(|s| s.owner.clone()),
        env,
    );

    match (owner, repository) {
        (Some((owner, _)), Some((repo, _))) => Ok(RepoSlug { owner, repo }),
        _ => Err(Error::Config(
            "could not determine the target repository; set 'repository' (owner/repo) or run inside a GitHub Actions workflow".to_string(),
        )),
    }
}
