//! Ordered registry of test definitions.

use std::fmt;
use std::hint::black_box;
use std::io;

use crate::error::{HarnessError, Result};

/// A workload as the harness sees it: takes the iteration count, runs to
/// completion, and has already released whatever it computed.
pub type Workload = Box<dyn Fn(u64) -> io::Result<()>>;

/// A named workload with its iteration count. Immutable once registered.
pub struct TestDefinition {
    name: String,
    iterations: u64,
    workload: Workload,
}

impl TestDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub(crate) fn invoke(&self) -> io::Result<()> {
        (self.workload)(self.iterations)
    }
}

impl fmt::Debug for TestDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestDefinition")
            .field("name", &self.name)
            .field("iterations", &self.iterations)
            .finish_non_exhaustive()
    }
}

/// Test definitions in registration order.
///
/// Duplicate names are accepted; each registration is run and reported on
/// its own.
#[derive(Debug, Default)]
pub struct Registry {
    tests: Vec<TestDefinition>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a workload. Its return value is passed through
    /// [`black_box`] and dropped before the harness reads memory again.
    pub fn add_test<F, T>(&mut self, name: impl Into<String>, iterations: u64, workload: F)
    where
        F: Fn(u64) -> T + 'static,
        T: 'static,
    {
        self.push(
            name.into(),
            iterations,
            Box::new(move |n: u64| -> io::Result<()> {
                drop(black_box(workload(n)));
                Ok(())
            }),
        );
    }

    /// Registers a workload that can fail. An `Err` aborts the run.
    pub fn add_fallible_test<F, T>(
        &mut self,
        name: impl Into<String>,
        iterations: u64,
        workload: F,
    ) where
        F: Fn(u64) -> io::Result<T> + 'static,
        T: 'static,
    {
        self.push(
            name.into(),
            iterations,
            Box::new(move |n: u64| -> io::Result<()> {
                drop(black_box(workload(n)?));
                Ok(())
            }),
        );
    }

    fn push(&mut self, name: String, iterations: u64, workload: Workload) {
        self.tests.push(TestDefinition {
            name,
            iterations,
            workload,
        });
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TestDefinition> {
        self.tests.iter()
    }

    /// Checks every definition, reporting the first one that cannot run.
    pub fn validate(&self) -> Result<()> {
        for (index, test) in self.tests.iter().enumerate() {
            let reason = if test.name.trim().is_empty() {
                "name must not be empty"
            } else if test.iterations == 0 {
                "iteration count must be positive"
            } else {
                continue;
            };
            return Err(HarnessError::InvalidDefinition {
                index,
                name: test.name.clone(),
                reason,
            });
        }
        Ok(())
    }
}
