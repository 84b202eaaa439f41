//! Layered input resolution
//!
//! Every input is looked up in a fixed order:
//! 1. the direct input (CLI flag or the runner's `INPUT_<NAME>` variable)
//! 2. a plain environment variable fallback
//! 3. an ambient default taken from the invoking workflow's context
//!
//! A value that is empty (or whitespace only) at any layer counts as absent,
//! so the runner's habit of exporting `INPUT_FOO=""` for unset inputs falls
//! through to the next layer.

use crate::error::{Error, Result};
use std::collections::HashMap;
use tracing::debug;

/// Read-only view of process environment variables
pub trait Environment {
    /// Look up a variable, `None` if unset or not valid unicode
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl<S: std::hash::BuildHasher> Environment for HashMap<String, String, S> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Layer a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Direct step input
    Input,
    /// Plain environment variable fallback
    Environment,
    /// Ambient workflow context
    Ambient,
}

/// Values supplied directly to the step, before any fallback is applied
///
/// Field names follow the action's input names with `-` replaced by `_`.
#[derive(Debug, Clone, Default)]
pub struct RawInputs {
    /// `token`
    pub token: Option<String>,
    /// `base`
    pub base: Option<String>,
    /// `head`
    pub head: Option<String>,
    /// `title`
    pub title: Option<String>,
    /// `body`
    pub body: Option<String>,
    /// `base-sha`
    pub base_sha: Option<String>,
    /// `head-sha`
    pub head_sha: Option<String>,
    /// `assignees`
    pub assignees: Option<String>,
    /// `labels`
    pub labels: Option<String>,
    /// `reviewers`
    pub reviewers: Option<String>,
    /// `team-reviewers`
    pub team_reviewers: Option<String>,
    /// `owner`
    pub owner: Option<String>,
    /// `repository`
    pub repository: Option<String>,
    /// `draft`
    pub draft: Option<String>,
    /// `merge`
    pub merge: Option<String>,
    /// `merge-method`
    pub merge_method: Option<String>,
    /// `fail-on-add-assignees-failure`
    pub fail_on_add_assignees_failure: Option<String>,
    /// `fail-on-add-labels-failure`
    pub fail_on_add_labels_failure: Option<String>,
    /// `fail-on-request-reviewers-failure`
    pub fail_on_request_reviewers_failure: Option<String>,
    /// `fail-on-merge-failure`
    pub fail_on_merge_failure: Option<String>,
    /// `force-head`
    pub force_head: Option<String>,
    /// `api-url`
    pub api_url: Option<String>,
}

/// Trim surrounding whitespace; blank values count as absent
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve one input through the input → environment → ambient layers.
///
/// `fallback_var` is the plain environment variable consulted when the
/// direct input is absent; `ambient` is the last-resort default.
pub fn resolve(
    name: &str,
    direct: Option<&str>,
    fallback_var: Option<&str>,
    ambient: Option<String>,
    env: &dyn Environment,
) -> Option<(String, Layer)> {
    let resolved = non_empty(direct.map(ToString::to_string))
        .map(|v| (v, Layer::Input))
        .or_else(|| {
            fallback_var
                .and_then(|key| non_empty(env.var(key)))
                .map(|v| (v, Layer::Environment))
        })
        .or_else(|| non_empty(ambient).map(|v| (v, Layer::Ambient)));

    if let Some((_, layer)) = &resolved {
        debug!(input = name, ?layer, "resolved input");
    }
    resolved
}

/// Like [`resolve`] but discards the layer
pub fn resolve_value(
    name: &str,
    direct: Option<&str>,
    fallback_var: Option<&str>,
    env: &dyn Environment,
) -> Option<String> {
    resolve(name, direct, fallback_var, None, env).map(|(v, _)| v)
}

/// Parse a boolean input the way the Actions toolkit does.
///
/// Accepts `true | True | TRUE | false | False | FALSE`; `None` yields
/// `default`.
pub fn parse_bool(name: &'static str, value: Option<&str>, default: bool) -> Result<bool> {
    match value.map(str::trim) {
        None => Ok(default),
        Some("true" | "True" | "TRUE") => Ok(true),
        Some("false" | "False" | "FALSE") => Ok(false),
        Some(other) => Err(Error::InvalidInput {
            name,
            value: other.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

/// Split a multi-line input into entries.
///
/// Lines are trimmed and blank lines dropped, so an input consisting only of
/// whitespace yields an empty list.
pub fn parse_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}
