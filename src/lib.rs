//! open-pr: open, annotate and merge a GitHub pull request from a CI step
//!
//! The library resolves the step's inputs into a [`config::WorkflowConfig`],
//! plans the remote operations, and executes them through a
//! [`platform::PlatformService`].

pub mod config;
pub mod error;
pub mod inputs;
pub mod output;
pub mod platform;
pub mod types;
pub mod workflow;
