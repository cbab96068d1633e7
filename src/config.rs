//! Ambient configuration.
//!
//! The harness takes no flags and reads no config file. The few knobs it has
//! come from the process environment:
//!
//! - `MICROBENCH_FORMAT`: `text`, `html` or `json`
//! - `MICROBENCH_PROFILE`: `full` (default) or `quick`
//! - `GATEWAY_INTERFACE`: when set the harness runs as a CGI program and
//!   renders HTML

use clap::ValueEnum;
use tracing::warn;

use crate::OutputMode;

pub const FORMAT_VAR: &str = "MICROBENCH_FORMAT";
pub const PROFILE_VAR: &str = "MICROBENCH_PROFILE";
pub const CGI_VAR: &str = "GATEWAY_INTERFACE";

/// Scale applied to the built-in workloads' iteration counts.
#[derive(Clone, Copy, Debug, Default, ValueEnum, PartialEq, Eq)]
pub enum Profile {
    /// Iteration counts as registered.
    #[default]
    Full,
    /// One tenth of the registered iteration counts (at least 1).
    Quick,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Full => "full",
            Profile::Quick => "quick",
        }
    }

    pub fn scale(&self, iterations: u64) -> u64 {
        match self {
            Profile::Full => iterations,
            Profile::Quick => (iterations / 10).max(1),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchConfig {
    pub profile: Profile,
    pub output: OutputMode,
    /// Running under a CGI gateway; the report needs response headers.
    pub cgi: bool,
}

impl BenchConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let cgi = lookup(CGI_VAR).is_some_and(|v| !v.is_empty());

        let output = lookup(FORMAT_VAR)
            .and_then(|raw| parse_value::<OutputMode>(FORMAT_VAR, &raw))
            .unwrap_or(if cgi { OutputMode::Html } else { OutputMode::Text });

        let profile = lookup(PROFILE_VAR)
            .and_then(|raw| parse_value::<Profile>(PROFILE_VAR, &raw))
            .unwrap_or_default();

        Self {
            profile,
            output,
            cgi,
        }
    }
}

fn parse_value<T: ValueEnum>(var: &str, raw: &str) -> Option<T> {
    match T::from_str(raw.trim(), true) {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(var, value = raw, "ignoring unrecognized value");
            None
        }
    }
}
