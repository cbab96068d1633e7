//! End-to-end runs with the tracking allocator installed, so memory deltas
//! are real readings.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use microbench_suite::config::{BenchConfig, Profile};
use microbench_suite::memory::{self, TrackingAllocator};
use microbench_suite::workloads::alloc::allocation_churn;
use microbench_suite::schema::{BenchReport, EnvironmentFacts};
use microbench_suite::{environment, Harness, OutputMode, RunState};

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

#[test]
fn noop_reports_zero_memory() {
    let mut harness = Harness::new();
    harness.add_test("noop", 1, |_| 42u32);
    harness.run().unwrap();

    let results = harness.results();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "noop");
    assert_eq!(results[0].memory_delta, 0);
    assert!(harness.totals().unwrap().total_elapsed >= results[0].elapsed);
}

#[test]
fn returned_value_is_released_before_measuring() {
    let mut harness = Harness::new();
    harness.add_test("temporary", 1, |_| vec![7u8; 256 * 1024]);
    harness.run().unwrap();

    assert_eq!(harness.results()[0].memory_delta, 0);
}

#[test]
fn retained_allocations_are_attributed() {
    let stash: Rc<RefCell<Vec<Vec<u8>>>> = Rc::new(RefCell::new(Vec::with_capacity(4)));
    let keep = Rc::clone(&stash);

    let mut harness = Harness::new();
    harness.add_test("retains", 1, move |_| keep.borrow_mut().push(vec![1u8; 64 * 1024]));
    harness.add_test("after", 1, |_| ());
    harness.run().unwrap();

    let results = harness.results();
    assert!(results[0].memory_delta >= 64 * 1024);
    // The next test starts from a fresh baseline.
    assert_eq!(results[1].memory_delta, 0);
    assert!(memory::tracking_active());
    assert_eq!(stash.borrow().len(), 1);
}

#[test]
fn freed_baseline_memory_clamps_to_zero() {
    let preexisting = Rc::new(RefCell::new(Some(vec![0u8; 128 * 1024])));
    let victim = Rc::clone(&preexisting);

    let mut harness = Harness::new();
    harness.add_test("frees", 1, move |_| victim.borrow_mut().take().map(|v| v.len()));
    harness.run().unwrap();

    assert_eq!(harness.results()[0].memory_delta, 0);
    assert!(preexisting.borrow().is_none());
}

#[test]
fn emitted_output_is_not_charged_to_the_test() {
    let mut harness = Harness::new();
    harness.add_test("emit_only", 1, |_| microbench_suite::emit!("hello"));
    harness.add_test("emit_formatted", 3, |n| microbench_suite::emit!("ran {n} times"));
    harness.run().unwrap();

    for result in harness.results() {
        assert_eq!(result.memory_delta, 0, "{}", result.name);
    }
    assert_eq!(harness.totals().unwrap().captured_output, "hello\nran 3 times\n");
}

#[test]
fn memory_workload_caps_its_growth() {
    let limit = 1_000_000;
    let filled = Rc::new(Cell::new(0usize));
    let seen = Rc::clone(&filled);

    let mut harness = Harness::new();
    harness.add_test("churn", limit, move |n| {
        let data = allocation_churn(n);
        seen.set(data.len());
        data
    });
    harness.run().unwrap();

    assert!(filled.get() > 0);
    assert!((filled.get() as u64) < limit);
    let captured = &harness.totals().unwrap().captured_output;
    assert!(captured.contains("memory workload capped at"), "{captured:?}");
    assert!(captured.contains(&format!("of {limit} slots")));
    // The slots are dropped with the returned value.
    assert_eq!(harness.results()[0].memory_delta, 0);
}

#[test]
fn peak_memory_covers_the_run() {
    let mut harness = Harness::new();
    harness.add_test("spike", 1, |_| vec![3u8; 2 * 1024 * 1024].len());
    harness.run().unwrap();

    assert!(harness.totals().unwrap().peak_memory >= 2 * 1024 * 1024);
}

#[test]
fn order_is_registration_order() {
    let mut harness = Harness::new();
    harness.add_test("a", 1, |_| std::thread::sleep(std::time::Duration::from_millis(5)));
    harness.add_test("b", 1, |_| ());
    harness.run().unwrap();

    let names: Vec<&str> = harness.results().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["a", "b"]);
}

#[test]
fn quick_suite_runs_and_reports_json() {
    let cfg = BenchConfig {
        profile: Profile::Quick,
        output: OutputMode::Json,
        cgi: false,
    };

    let mut harness = Harness::with_profile(cfg.profile);
    microbench_suite::workloads::register_all(harness.registry_mut(), cfg.profile);
    harness.run().unwrap();
    assert_eq!(harness.results().len(), 17);

    let facts = environment::collect(&cfg);
    let mut out = Vec::new();
    harness.report(&facts, cfg.output, &mut out).unwrap();
    assert_eq!(harness.state(), RunState::Reported);

    let report: BenchReport = serde_json::from_slice(&out).unwrap();
    assert_eq!(report.run.profile, "quick");
    assert_eq!(report.results.len(), 17);
    assert_eq!(report.results[0].name, "Math (Trigonometry & Powers)");
    assert_eq!(report.results[0].iterations, 20_000);
    assert_eq!(report.environment.get("Alloc Tracking"), Some("On"));
    let longest = report.results.iter().map(|r| r.elapsed).max().unwrap();
    assert!(report.totals.total_elapsed >= longest);
}

#[test]
fn independent_harnesses_do_not_share_state() {
    let mut first = Harness::new();
    first.add_test("one", 1, |_| microbench_suite::emit!("from first"));
    let mut second = Harness::new();
    second.add_test("two", 1, |_| ());
    second.add_test("three", 1, |_| ());

    first.run().unwrap();
    second.run().unwrap();

    assert_eq!(first.results().len(), 1);
    assert_eq!(second.results().len(), 2);
    assert_eq!(first.totals().unwrap().captured_output, "from first\n");
    assert_eq!(second.totals().unwrap().captured_output, "");

    let mut text = Vec::new();
    second
        .report(&EnvironmentFacts::new(), OutputMode::Text, &mut text)
        .unwrap();
    let text = String::from_utf8(text).unwrap();
    assert!(text.contains("two") && text.contains("three"));
}
