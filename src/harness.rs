use std::io::Write;
use std::time::Instant;

use tracing::{debug, info, trace};

use crate::capture;
use crate::config::Profile;
use crate::error::{HarnessError, Result};
use crate::memory;
use crate::registry::{Registry, TestDefinition};
use crate::report;
use crate::schema::{EnvironmentFacts, RunTotals, TestResult};
use crate::OutputMode;

/// Lifecycle of a [`Harness`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Reported,
    /// A definition was invalid or a workload failed; nothing is reported.
    Aborted,
}

/// Snapshot taken on either side of a measurement. Deterministic destruction
/// has already released the previous test's allocations, so re-reading the
/// counter is all the isolation there is to do.
fn isolate(phase: &'static str) -> i64 {
    // Log first: the subscriber may allocate.
    trace!(phase, "isolating");
    memory::live_bytes()
}

/// Runs one definition and measures it.
///
/// Nothing between the baseline snapshot and the final reading allocates on
/// behalf of the harness, so the delta belongs to the workload alone.
pub fn run_test(test: &TestDefinition) -> Result<TestResult> {
    let baseline = isolate("pre");

    let start = Instant::now();
    let outcome = test.invoke();
    let elapsed = start.elapsed();
    let after = memory::live_bytes();

    outcome.map_err(|source| HarnessError::Workload {
        name: test.name().to_string(),
        source,
    })?;

    let memory_delta = memory::delta(baseline, after);
    let settled = isolate("post");
    debug!(
        test = test.name(),
        iterations = test.iterations(),
        elapsed_ns = elapsed.as_nanos() as u64,
        memory_delta,
        retained = settled - baseline,
        "test recorded"
    );

    Ok(TestResult {
        name: test.name().to_string(),
        iterations: test.iterations(),
        elapsed,
        memory_delta,
    })
}

/// Runs every definition in registration order and computes the run totals.
///
/// A fault in any test aborts the run; earlier results are discarded along
/// with the captured output.
pub fn run_all(registry: &Registry) -> Result<(Vec<TestResult>, RunTotals)> {
    registry.validate()?;

    let capture = capture::begin();
    let run_start = Instant::now();
    let baseline_memory = memory::live_bytes().max(0) as u64;
    memory::reset_peak();
    info!(tests = registry.len(), "benchmark run started");

    let mut results = Vec::with_capacity(registry.len());
    for test in registry.iter() {
        results.push(run_test(test)?);
    }

    let total_elapsed = run_start.elapsed();
    let peak_memory = memory::peak_resident_bytes().unwrap_or_else(memory::peak_live_bytes);
    let captured_output = capture.finish();
    info!(
        tests = results.len(),
        total_ms = total_elapsed.as_millis() as u64,
        peak_memory,
        captured_bytes = captured_output.len(),
        "benchmark run completed"
    );

    Ok((
        results,
        RunTotals {
            total_elapsed,
            peak_memory,
            baseline_memory,
            captured_output,
        },
    ))
}

/// One benchmark run: owns the registry and, once run, its results.
///
/// Independent instances never share state, so several runs can coexist in
/// one process.
#[derive(Debug)]
pub struct Harness {
    registry: Registry,
    profile: Profile,
    state: RunState,
    results: Vec<TestResult>,
    totals: Option<RunTotals>,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    pub fn new() -> Self {
        Self::with_registry(Registry::new())
    }

    /// An empty harness whose report is labelled with `profile`.
    pub fn with_profile(profile: Profile) -> Self {
        Self {
            profile,
            ..Self::new()
        }
    }

    pub fn with_registry(registry: Registry) -> Self {
        Self {
            registry,
            profile: Profile::default(),
            state: RunState::Idle,
            results: Vec::new(),
            totals: None,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn add_test<F, T>(&mut self, name: impl Into<String>, iterations: u64, workload: F)
    where
        F: Fn(u64) -> T + 'static,
        T: 'static,
    {
        self.registry.add_test(name, iterations, workload);
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn totals(&self) -> Option<&RunTotals> {
        self.totals.as_ref()
    }

    /// Runs all registered tests. Only valid once, from [`RunState::Idle`].
    pub fn run(&mut self) -> Result<()> {
        if self.state != RunState::Idle {
            return Err(HarnessError::InvalidState {
                expected: "Idle",
                found: self.state,
            });
        }

        self.state = RunState::Running;
        match run_all(&self.registry) {
            Ok((results, totals)) => {
                self.results = results;
                self.totals = Some(totals);
                self.state = RunState::Completed;
                Ok(())
            }
            Err(e) => {
                self.state = RunState::Aborted;
                Err(e)
            }
        }
    }

    /// Renders the completed run into `sink`.
    pub fn report<W: Write>(
        &mut self,
        facts: &EnvironmentFacts,
        format: OutputMode,
        sink: &mut W,
    ) -> Result<()> {
        let totals = match (&self.totals, self.state) {
            (Some(totals), RunState::Completed | RunState::Reported) => totals,
            _ => {
                return Err(HarnessError::InvalidState {
                    expected: "Completed",
                    found: self.state,
                })
            }
        };

        report::render(facts, &self.results, totals, self.profile, format, sink)?;
        self.state = RunState::Reported;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn noop_scenario() {
        let mut harness = Harness::new();
        harness.add_test("noop", 1, |_| 0u8);
        harness.run().unwrap();

        let results = harness.results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "noop");
        assert_eq!(results[0].iterations, 1);
        assert_eq!(results[0].memory_delta, 0);
        let totals = harness.totals().unwrap();
        assert!(totals.total_elapsed >= results[0].elapsed);
        assert_eq!(harness.state(), RunState::Completed);
    }

    #[test]
    fn results_follow_registration_order() {
        let mut harness = Harness::new();
        harness.add_test("a", 1, |_| thread::sleep(Duration::from_millis(15)));
        harness.add_test("b", 1, |_| ());
        harness.run().unwrap();

        let names: Vec<&str> = harness.results().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert!(harness.results()[0].elapsed >= Duration::from_millis(15));
    }

    #[test]
    fn result_count_matches_registrations() {
        for n in [0usize, 1, 7] {
            let mut registry = Registry::new();
            for i in 0..n {
                registry.add_test(format!("t{i}"), 1 + i as u64, |n| n.wrapping_mul(3));
            }
            let (results, totals) = run_all(&registry).unwrap();
            assert_eq!(results.len(), n);
            for (i, r) in results.iter().enumerate() {
                assert_eq!(r.name, format!("t{i}"));
            }
            let longest = results.iter().map(|r| r.elapsed).max().unwrap_or_default();
            assert!(totals.total_elapsed >= longest);
        }
    }

    #[test]
    fn duplicate_names_are_each_measured() {
        let mut harness = Harness::new();
        harness.add_test("same", 1, |_| ());
        harness.add_test("same", 2, |_| ());
        harness.run().unwrap();

        assert_eq!(harness.results().len(), 2);
        assert_eq!(harness.results()[1].iterations, 2);
    }

    #[test]
    fn captured_output_is_run_scoped() {
        let mut harness = Harness::new();
        harness.add_test("chatty", 2, |n| crate::emit!("ran {n} iterations"));
        harness.add_test("quiet", 1, |_| ());
        harness.run().unwrap();

        assert_eq!(harness.totals().unwrap().captured_output, "ran 2 iterations\n");
    }

    #[test]
    fn invalid_definition_aborts_before_running() {
        use std::cell::Cell;
        use std::rc::Rc;

        let ran = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ran);
        let mut harness = Harness::new();
        harness.add_test("first", 1, move |_| flag.set(true));
        harness.add_test("broken", 0, |_| ());

        let err = harness.run().unwrap_err();
        assert!(matches!(err, HarnessError::InvalidDefinition { index: 1, .. }));
        assert!(!ran.get());
        assert_eq!(harness.state(), RunState::Aborted);
    }

    #[test]
    fn workload_error_discards_results() {
        let mut harness = Harness::new();
        harness.add_test("fine", 1, |_| ());
        harness
            .registry_mut()
            .add_fallible_test("broken", 1, |_| -> io::Result<()> {
                Err(io::Error::other("boom"))
            });

        let err = harness.run().unwrap_err();
        match err {
            HarnessError::Workload { name, .. } => assert_eq!(name, "broken"),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(harness.results().is_empty());
        assert!(harness.totals().is_none());
    }

    #[test]
    #[should_panic(expected = "workload exploded")]
    fn workload_panic_propagates() {
        let mut harness = Harness::new();
        harness.add_test("panics", 1, |_| -> u8 { panic!("workload exploded") });
        let _ = harness.run();
    }

    #[test]
    fn lifecycle_is_enforced() {
        let mut harness = Harness::new();
        let mut sink = Vec::new();
        let facts = EnvironmentFacts::new();

        assert!(matches!(
            harness.report(&facts, OutputMode::Text, &mut sink),
            Err(HarnessError::InvalidState { found: RunState::Idle, .. })
        ));

        harness.add_test("x", 1, |_| ());
        harness.run().unwrap();
        assert!(matches!(
            harness.run(),
            Err(HarnessError::InvalidState { found: RunState::Completed, .. })
        ));

        harness.report(&facts, OutputMode::Text, &mut sink).unwrap();
        assert_eq!(harness.state(), RunState::Reported);
        assert!(!sink.is_empty());
    }
}
