use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use microbench_suite::config::BenchConfig;
use microbench_suite::environment::{self, MIN_RUSTC_VERSION, RUSTC_VERSION};
use microbench_suite::memory::TrackingAllocator;
use microbench_suite::report;
use microbench_suite::{workloads, Harness, OutputMode};
use tracing::info;

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

#[derive(Parser, Debug)]
#[command(name = "microbench-suite", version)]
#[command(about = "Runs the built-in micro-benchmarks once and prints a report")]
#[command(after_help = ENVIRONMENT_HELP)]
struct Args {}

const ENVIRONMENT_HELP: &str = "\
Environment:
  MICROBENCH_FORMAT   text | html | json (default: html under CGI, text otherwise)
  MICROBENCH_PROFILE  full | quick
  RUST_LOG            log filter (default: info)";

fn run(cfg: &BenchConfig) -> microbench_suite::Result<()> {
    environment::check_toolchain(RUSTC_VERSION, MIN_RUSTC_VERSION)?;

    let mut harness = Harness::with_profile(cfg.profile);
    workloads::register_all(harness.registry_mut(), cfg.profile);
    info!(
        tests = harness.registry().len(),
        profile = cfg.profile.as_str(),
        "registered workloads"
    );

    harness.run()?;

    let facts = environment::collect(cfg);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cfg.cgi && cfg.output == OutputMode::Html {
        report::write_cgi_headers(&mut out)?;
    }
    harness.report(&facts, cfg.output, &mut out)?;
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .try_init();

    let _args = Args::parse();
    let cfg = BenchConfig::from_env();

    match run(&cfg) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
