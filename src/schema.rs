use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMeta {
    pub schema_version: u32,
    pub bench_version: String,
    /// `full` or `quick`.
    pub profile: String,
    /// RFC 3339, UTC, second precision.
    pub timestamp_utc: String,
    /// Short commit hash of the build, when it was built from a checkout.
    pub git_sha: Option<String>,
}

/// Measurement of one test definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub iterations: u64,
    pub elapsed: Duration,
    /// Heap growth attributable to the test, clamped at zero.
    pub memory_delta: u64,
}

/// Run-wide figures, produced once per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunTotals {
    pub total_elapsed: Duration,
    /// High-water mark for the whole run, not per test.
    pub peak_memory: u64,
    pub baseline_memory: u64,
    pub captured_output: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentFact {
    pub label: String,
    pub value: String,
}

/// Host facts shown alongside the results, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvironmentFacts(Vec<EnvironmentFact>);

impl EnvironmentFacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.0.push(EnvironmentFact {
            label: label.into(),
            value: value.into(),
        });
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnvironmentFact> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<L: Into<String>, V: Into<String>> FromIterator<(L, V)> for EnvironmentFacts {
    fn from_iter<I: IntoIterator<Item = (L, V)>>(iter: I) -> Self {
        let mut facts = Self::new();
        for (label, value) in iter {
            facts.push(label, value);
        }
        facts
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchReport {
    pub run: RunMeta,
    pub environment: EnvironmentFacts,
    pub totals: RunTotals,
    pub results: Vec<TestResult>,
}
