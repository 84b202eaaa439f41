//! Mock platform service for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use open_pr::error::{Error, Result};
use open_pr::platform::PlatformService;
use open_pr::types::{BranchRef, MergeMethod, MergeResult, PlatformConfig, PullRequest, RepoSlug};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Call record for `create_ref` / `update_ref`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefCall {
    pub branch: String,
    pub sha: String,
    /// `None` for `create_ref`
    pub force: Option<bool>,
}

/// Call record for `create_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePrCall {
    pub head: String,
    pub base: String,
    pub title: String,
    pub body: Option<String>,
    pub draft: bool,
}

/// Call record for `add_assignees` / `add_labels`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCall {
    pub pr_number: u64,
    pub values: Vec<String>,
}

/// Call record for `request_reviewers`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewersCall {
    pub pr_number: u64,
    pub reviewers: Vec<String>,
    pub team_reviewers: Vec<String>,
}

/// Call record for `merge_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePrCall {
    pub pr_number: u64,
    pub method: MergeMethod,
}

/// Simple mock platform service for testing
///
/// This manually implements `PlatformService` rather than using mockall so
/// that every call is recorded in order and failures can be injected per
/// operation.
///
/// Features:
/// - Auto-incrementing PR numbers (starting at 1)
/// - Ordered log of every remote operation
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockPlatformService {
    config: PlatformConfig,
    next_pr_number: AtomicU64,
    merge_response: Mutex<Option<MergeResult>>,
    // Call tracking
    call_log: Mutex<Vec<&'static str>>,
    create_ref_calls: Mutex<Vec<RefCall>>,
    update_ref_calls: Mutex<Vec<RefCall>>,
    create_pr_calls: Mutex<Vec<CreatePrCall>>,
    add_assignees_calls: Mutex<Vec<ListCall>>,
    add_labels_calls: Mutex<Vec<ListCall>>,
    request_reviewers_calls: Mutex<Vec<ReviewersCall>>,
    merge_pr_calls: Mutex<Vec<MergePrCall>>,
    // Error injection
    error_on_create_ref: Mutex<Option<String>>,
    error_on_update_ref: Mutex<Option<String>>,
    error_on_create_pr: Mutex<Option<String>>,
    error_on_add_assignees: Mutex<Option<String>>,
    error_on_add_labels: Mutex<Option<String>>,
    error_on_request_reviewers: Mutex<Option<String>>,
    error_on_merge_pr: Mutex<Option<String>>,
}

impl MockPlatformService {
    /// Create a new mock with the given config
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            next_pr_number: AtomicU64::new(1),
            merge_response: Mutex::new(None),
            call_log: Mutex::new(Vec::new()),
            create_ref_calls: Mutex::new(Vec::new()),
            update_ref_calls: Mutex::new(Vec::new()),
            create_pr_calls: Mutex::new(Vec::new()),
            add_assignees_calls: Mutex::new(Vec::new()),
            add_labels_calls: Mutex::new(Vec::new()),
            request_reviewers_calls: Mutex::new(Vec::new()),
            merge_pr_calls: Mutex::new(Vec::new()),
            error_on_create_ref: Mutex::new(None),
            error_on_update_ref: Mutex::new(None),
            error_on_create_pr: Mutex::new(None),
            error_on_add_assignees: Mutex::new(None),
            error_on_add_labels: Mutex::new(None),
            error_on_request_reviewers: Mutex::new(None),
            error_on_merge_pr: Mutex::new(None),
        }
    }

    /// Mock targeting `acme/widgets` on github.com
    pub fn new() -> Self {
        Self::with_config(PlatformConfig {
            slug: RepoSlug {
                owner: "acme".to_string(),
                repo: "widgets".to_string(),
            },
        })
    }

    // === Error injection methods ===

    /// Make `create_ref` return an error
    pub fn fail_create_ref(&self, msg: &str) {
        *self.error_on_create_ref.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `update_ref` return an error
    pub fn fail_update_ref(&self, msg: &str) {
        *self.error_on_update_ref.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_pr` return an error
    pub fn fail_create_pr(&self, msg: &str) {
        *self.error_on_create_pr.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `add_assignees` return an error
    pub fn fail_add_assignees(&self, msg: &str) {
        *self.error_on_add_assignees.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `add_labels` return an error
    pub fn fail_add_labels(&self, msg: &str) {
        *self.error_on_add_labels.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `request_reviewers` return an error
    pub fn fail_request_reviewers(&self, msg: &str) {
        *self.error_on_request_reviewers.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `merge_pr` return an error
    pub fn fail_merge_pr(&self, msg: &str) {
        *self.error_on_merge_pr.lock().unwrap() = Some(msg.to_string());
    }

    /// Set the response for `merge_pr` (defaults to merged with `merged_sha_<n>`)
    pub fn set_merge_response(&self, result: MergeResult) {
        *self.merge_response.lock().unwrap() = Some(result);
    }

    // === Call verification methods ===

    /// Names of every remote operation, in call order
    pub fn get_call_log(&self) -> Vec<&'static str> {
        self.call_log.lock().unwrap().clone()
    }

    /// Get all `create_ref` calls
    pub fn get_create_ref_calls(&self) -> Vec<RefCall> {
        self.create_ref_calls.lock().unwrap().clone()
    }

    /// Get all `update_ref` calls
    pub fn get_update_ref_calls(&self) -> Vec<RefCall> {
        self.update_ref_calls.lock().unwrap().clone()
    }

    /// Get all `create_pr` calls
    pub fn get_create_pr_calls(&self) -> Vec<CreatePrCall> {
        self.create_pr_calls.lock().unwrap().clone()
    }

    /// Get all `add_assignees` calls
    pub fn get_add_assignees_calls(&self) -> Vec<ListCall> {
        self.add_assignees_calls.lock().unwrap().clone()
    }

    /// Get all `add_labels` calls
    pub fn get_add_labels_calls(&self) -> Vec<ListCall> {
        self.add_labels_calls.lock().unwrap().clone()
    }

    /// Get all `request_reviewers` calls
    pub fn get_request_reviewers_calls(&self) -> Vec<ReviewersCall> {
        self.request_reviewers_calls.lock().unwrap().clone()
    }

    /// Get all `merge_pr` calls
    pub fn get_merge_pr_calls(&self) -> Vec<MergePrCall> {
        self.merge_pr_calls.lock().unwrap().clone()
    }

    /// Assert that no remote operation was performed
    pub fn assert_no_calls(&self) {
        let calls = self.get_call_log();
        assert!(calls.is_empty(), "Expected no remote calls but got: {calls:?}");
    }

    /// Assert that `create_pr` was called with specific head and base
    pub fn assert_create_pr_called(&self, head: &str, base: &str) {
        let calls = self.get_create_pr_calls();
        assert!(
            calls.iter().any(|c| c.head == head && c.base == base),
            "Expected create_pr({head}, {base}) but got: {calls:?}"
        );
    }

    /// Assert that `merge_pr` was called for a specific PR
    pub fn assert_merge_called(&self, pr_number: u64) {
        let calls = self.get_merge_pr_calls();
        assert!(
            calls.iter().any(|c| c.pr_number == pr_number),
            "Expected merge_pr({pr_number}) but got: {calls:?}"
        );
    }

    /// Assert that `merge_pr` was NOT called
    pub fn assert_merge_not_called(&self) {
        let calls = self.get_merge_pr_calls();
        assert!(
            calls.is_empty(),
            "Expected merge_pr NOT to be called but it was: {calls:?}"
        );
    }

    /// Assert that `merge_pr` was called with a specific method
    pub fn assert_merge_called_with_method(&self, pr_number: u64, method: MergeMethod) {
        let calls = self.get_merge_pr_calls();
        assert!(
            calls.iter().any(|c| c.pr_number == pr_number && c.method == method),
            "Expected merge_pr({pr_number}, {method:?}) but got: {calls:?}"
        );
    }

    fn log(&self, op: &'static str) {
        self.call_log.lock().unwrap().push(op);
    }

    fn injected(slot: &Mutex<Option<String>>) -> Result<()> {
        match slot.lock().unwrap().as_ref() {
            Some(msg) => Err(Error::Platform(msg.clone())),
            None => Ok(()),
        }
    }

    fn branch_ref(&self, branch: &str, sha: &str) -> BranchRef {
        BranchRef {
            ref_name: format!("refs/heads/{branch}"),
            sha: sha.to_string(),
            url: format!(
                "https://api.github.com/repos/{}/git/refs/heads/{branch}",
                self.config.slug
            ),
        }
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn create_ref(&self, branch: &str, sha: &str) -> Result<BranchRef> {
        self.log("create_ref");
        self.create_ref_calls.lock().unwrap().push(RefCall {
            branch: branch.to_string(),
            sha: sha.to_string(),
            force: None,
        });
        Self::injected(&self.error_on_create_ref)?;
        Ok(self.branch_ref(branch, sha))
    }

    async fn update_ref(&self, branch: &str, sha: &str, force: bool) -> Result<BranchRef> {
        self.log("update_ref");
        self.update_ref_calls.lock().unwrap().push(RefCall {
            branch: branch.to_string(),
            sha: sha.to_string(),
            force: Some(force),
        });
        Self::injected(&self.error_on_update_ref)?;
        Ok(self.branch_ref(branch, sha))
    }

    async fn create_pr(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: Option<&str>,
        draft: bool,
    ) -> Result<PullRequest> {
        self.log("create_pr");
        self.create_pr_calls.lock().unwrap().push(CreatePrCall {
            head: head.to_string(),
            base: base.to_string(),
            title: title.to_string(),
            body: body.map(ToString::to_string),
            draft,
        });
        Self::injected(&self.error_on_create_pr)?;

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        Ok(PullRequest {
            number,
            html_url: format!("https://github.com/{}/pull/{number}", self.config.slug),
            base_ref: base.to_string(),
            head_ref: head.to_string(),
            title: title.to_string(),
            node_id: Some(format!("PR_node_{number}")),
            is_draft: draft,
            merged: false,
        })
    }

    async fn add_assignees(&self, pr_number: u64, assignees: &[String]) -> Result<()> {
        self.log("add_assignees");
        self.add_assignees_calls.lock().unwrap().push(ListCall {
            pr_number,
            values: assignees.to_vec(),
        });
        Self::injected(&self.error_on_add_assignees)
    }

    async fn add_labels(&self, pr_number: u64, labels: &[String]) -> Result<()> {
        self.log("add_labels");
        self.add_labels_calls.lock().unwrap().push(ListCall {
            pr_number,
            values: labels.to_vec(),
        });
        Self::injected(&self.error_on_add_labels)
    }

    async fn request_reviewers(
        &self,
        pr_number: u64,
        reviewers: &[String],
        team_reviewers: &[String],
    ) -> Result<()> {
        self.log("request_reviewers");
        self.request_reviewers_calls
            .lock()
            .unwrap()
            .push(ReviewersCall {
                pr_number,
                reviewers: reviewers.to_vec(),
                team_reviewers: team_reviewers.to_vec(),
            });
        Self::injected(&self.error_on_request_reviewers)
    }

    async fn merge_pr(&self, pr_number: u64, method: MergeMethod) -> Result<MergeResult> {
        self.log("merge_pr");
        self.merge_pr_calls
            .lock()
            .unwrap()
            .push(MergePrCall { pr_number, method });
        Self::injected(&self.error_on_merge_pr)?;

        Ok(self
            .merge_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| MergeResult {
                merged: true,
                sha: Some(format!("merged_sha_{pr_number}")),
                message: None,
            }))
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
