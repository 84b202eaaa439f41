//! Step outputs and workflow-command annotations
//!
//! Outputs go to the file named by `$GITHUB_OUTPUT` using the heredoc form
//! (`name<<delimiter`), which is safe for multi-line values such as JSON.
//! Annotations are printed to stdout where the runner picks them up.

use crate::error::{Error, Result};
use crate::inputs::Environment;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Destination for step outputs and warnings
pub trait OutputSink: Send {
    /// Publish a named output
    fn set_output(&mut self, name: &str, value: &str) -> Result<()>;

    /// Surface a non-fatal problem to the user
    fn warning(&mut self, message: &str);
}

/// Publish `value` as a compact JSON output
pub fn set_json_output<T: Serialize>(
    sink: &mut dyn OutputSink,
    name: &str,
    value: &T,
) -> Result<()> {
    let json = serde_json::to_string(value)?;
    sink.set_output(name, &json)
}

/// Escape a message for use in a workflow command
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Format a `::warning::` workflow command
pub fn warning_command(message: &str) -> String {
    format!("::warning::{}", escape_data(message))
}

/// Format an `::error::` workflow command
pub fn error_command(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}

/// Output sink for a GitHub Actions step
#[derive(Debug, Clone, Default)]
pub struct GitHubOutput {
    file: Option<PathBuf>,
}

impl GitHubOutput {
    /// Use `$GITHUB_OUTPUT` if set, otherwise print outputs to stdout
    pub fn from_env(env: &dyn Environment) -> Self {
        Self {
            file: env
                .var("GITHUB_OUTPUT")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        }
    }

    /// Append outputs to `path`
    pub fn to_file(path: impl AsRef<Path>) -> Self {
        Self {
            file: Some(path.as_ref().to_path_buf()),
        }
    }

    /// Output file in use, if any
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }
}

/// Render one output in the heredoc form.
///
/// Fails if the value contains the delimiter, which would let it terminate
/// the block early.
fn heredoc_entry(name: &str, value: &str, delimiter: &str) -> Result<String> {
    if name.contains(delimiter) || value.contains(delimiter) {
        return Err(Error::Output(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("output '{name}' contains the output delimiter"),
        )));
    }
    Ok(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
}

impl OutputSink for GitHubOutput {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
        let Some(path) = &self.file else {
            println!("{name}={value}");
            return Ok(());
        };

        let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
        let entry = heredoc_entry(name, value, &delimiter)?;

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(entry.as_bytes())?;
        debug!(output = name, path = %path.display(), "wrote step output");
        Ok(())
    }

    fn warning(&mut self, message: &str) {
        println!("{}", warning_command(message));
    }
}
