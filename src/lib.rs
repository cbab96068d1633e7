use clap::ValueEnum;

pub mod capture;
pub mod config;
pub mod environment;
pub mod error;
pub mod harness;
pub mod memory;
pub mod registry;
pub mod report;
pub mod schema;
pub mod workloads;

pub use error::{HarnessError, Result};
pub use harness::{Harness, RunState};
pub use registry::Registry;

/// How the report is rendered.
#[derive(Clone, Copy, Debug, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputMode {
    /// Plain-text tables for a terminal.
    #[default]
    Text,
    /// A self-contained HTML document (the default under CGI).
    Html,
    /// The full report as pretty-printed JSON.
    Json,
}
