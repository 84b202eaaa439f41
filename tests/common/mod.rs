//! Shared test fixtures

#![allow(dead_code)]

mod mock_platform;

pub use mock_platform::*;

use open_pr::config::WorkflowConfig;
use open_pr::error::{Error, Result};
use open_pr::inputs::RawInputs;
use open_pr::output::OutputSink;
use std::collections::HashMap;
use std::io;

/// Output sink that keeps everything in memory
#[derive(Debug, Default)]
pub struct RecordingOutput {
    pub outputs: Vec<(String, String)>,
    pub warnings: Vec<String>,
    /// Output name whose write fails
    pub fail_on: Option<String>,
}

impl RecordingOutput {
    /// Sink that fails when `name` is written
    pub fn failing_on(name: &str) -> Self {
        Self {
            fail_on: Some(name.to_string()),
            ..Self::default()
        }
    }

    /// Last value published under `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.outputs
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Names of every published output, in order
    pub fn names(&self) -> Vec<&str> {
        self.outputs.iter().map(|(n, _)| n.as_str()).collect()
    }
}

impl OutputSink for RecordingOutput {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
        if self.fail_on.as_deref() == Some(name) {
            return Err(Error::Output(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "output file is read-only",
            )));
        }
        self.outputs.push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }
}

/// Inputs with every required field set
pub fn required_inputs() -> RawInputs {
    RawInputs {
        token: Some("ghs_test_token".to_string()),
        base: Some("main".to_string()),
        head: Some("feature".to_string()),
        title: Some("Add feature".to_string()),
        ..RawInputs::default()
    }
}

/// Environment of a workflow running in `acme/widgets`
pub fn actions_env() -> HashMap<String, String> {
    HashMap::from([("GITHUB_REPOSITORY".to_string(), "acme/widgets".to_string())])
}

/// Build a config from inputs inside the `acme/widgets` workflow
pub fn config_from(raw: &RawInputs) -> WorkflowConfig {
    WorkflowConfig::from_inputs(raw, &actions_env()).expect("valid config")
}
