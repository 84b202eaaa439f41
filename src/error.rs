//! Error types for open-pr

use crate::workflow::Step;
use thiserror::Error;

/// Errors that can occur while running the pull request workflow
#[derive(Debug, Error)]
pub enum Error {
    /// One or more required inputs were not supplied by any layer
    #[error("missing required input(s): {}", .0.join(", "))]
    MissingInputs(Vec<&'static str>),

    /// An input was supplied but could not be interpreted
    #[error("invalid value '{value}' for input '{name}': {reason}")]
    InvalidInput {
        /// Input name as it appears in the action manifest
        name: &'static str,
        /// Raw value that was rejected
        value: String,
        /// What was expected instead
        reason: String,
    },

    /// Configuration could not be completed
    #[error("configuration error: {0}")]
    Config(String),

    /// GitHub API error
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Generic platform error
    #[error("platform error: {0}")]
    Platform(String),

    /// A workflow step failed under a fatal policy
    #[error("{}", describe_step_failure(*step, pull_request.as_ref(), source))]
    StepFailed {
        /// Step that failed
        step: Step,
        /// Pull request opened before the failure, as `(number, url)`
        pull_request: Option<(u64, String)>,
        /// Underlying failure
        #[source]
        source: Box<Self>,
    },

    /// Step outputs could not be written
    #[error("failed to write step output: {0}")]
    Output(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn describe_step_failure(step: Step, pull_request: Option<&(u64, String)>, source: &Error) -> String {
    match pull_request {
        Some((number, url)) => format!(
            "Couldn't {step} for pull-request #{number}: {source} (pull-request #{number} was opened and remains at {url})"
        ),
        None => format!("Couldn't {step}: {source}"),
    }
}

impl From<octocrab::Error> for Error {
    fn from(e: octocrab::Error) -> Self {
        match e {
            octocrab::Error::GitHub { source, .. } => {
                let mut message = source.message.clone();
                if let Some(errors) = source.errors.as_ref() {
                    let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
                    if !details.is_empty() {
                        message = format!("{message} ({})", details.join(", "));
                    }
                }
                Self::GitHubApi(message)
            }
            other => Self::GitHubApi(other.to_string()),
        }
    }
}

impl Error {
    /// Whether this error was raised before any remote call could be made
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingInputs(_) | Self::InvalidInput { .. } | Self::Config(_)
        )
    }
}

/// Result type alias for open-pr operations
pub type Result<T> = std::result::Result<T, Error>;
