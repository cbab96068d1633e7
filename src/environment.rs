//! Host facts for the report header and the startup toolchain check.

use tracing::warn;

use crate::config::BenchConfig;
use crate::error::{HarnessError, Result};
use crate::memory;
use crate::report::format_size;
use crate::schema::EnvironmentFacts;
use crate::OutputMode;

/// Oldest rustc the harness supports.
pub const MIN_RUSTC_VERSION: &str = "1.74.0";

/// Version of the compiler that built this binary, as captured by `build.rs`.
pub const RUSTC_VERSION: &str = env!("MICROBENCH_RUSTC_VERSION");

fn parse_version(raw: &str) -> Option<(u64, u64, u64)> {
    // Drop pre-release/build suffixes: `1.86.0-nightly` -> `1.86.0`.
    let core = raw.trim().split(['-', '+']).next()?;
    let mut parts = core.split('.').map(|p| p.parse::<u64>());
    let major = parts.next()?.ok()?;
    let minor = parts.next().unwrap_or(Ok(0)).ok()?;
    let patch = parts.next().unwrap_or(Ok(0)).ok()?;
    Some((major, minor, patch))
}

/// Fails when `found` is older than `required`.
///
/// A version that cannot be parsed is let through with a warning.
pub fn check_toolchain(found: &str, required: &str) -> Result<()> {
    let (Some(have), Some(need)) = (parse_version(found), parse_version(required)) else {
        warn!(found, required, "cannot determine toolchain version, skipping check");
        return Ok(());
    };

    if have < need {
        return Err(HarnessError::Precondition {
            required: required.to_string(),
            found: found.to_string(),
        });
    }
    Ok(())
}

/// Soft limit from a `/proc/self/limits` table, `None` when unlimited or absent.
fn parse_limit(limits: &str, name: &str) -> Option<u64> {
    limits.lines().find_map(|line| {
        let rest = line.strip_prefix(name)?;
        let soft = rest.split_whitespace().next()?;
        soft.parse::<u64>().ok()
    })
}

fn read_limits() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/self/limits").ok()
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

fn kernel_release() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/sys/kernel/osrelease")
            .ok()
            .map(|s| s.trim().to_string())
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

fn os_description() -> String {
    let os = std::env::consts::OS;
    let arch = std::env::consts::ARCH;
    match kernel_release() {
        Some(release) => format!("{os} {release} ({arch})"),
        None => format!("{os} ({arch})"),
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "On"
    } else {
        "Off"
    }
}

fn mode_label(mode: OutputMode, cgi: bool) -> String {
    let name = match mode {
        OutputMode::Text => "text",
        OutputMode::Html => "html",
        OutputMode::Json => "json",
    };
    if cgi {
        format!("cgi/{name}")
    } else {
        format!("cli/{name}")
    }
}

/// Gathers the facts shown in the System Info table.
pub fn collect(cfg: &BenchConfig) -> EnvironmentFacts {
    let limits = read_limits().unwrap_or_default();
    let mem_limit = parse_limit(&limits, "Max address space")
        .map(format_size)
        .unwrap_or_else(|| "unlimited".to_string());
    let time_limit = parse_limit(&limits, "Max cpu time")
        .map(|secs| format!("{secs}s"))
        .unwrap_or_else(|| "unlimited".to_string());
    let server = std::env::var("SERVER_SOFTWARE").unwrap_or_else(|_| "CLI".to_string());

    let mut facts = EnvironmentFacts::new();
    facts.push("Rust", RUSTC_VERSION);
    facts.push("OS", os_description());
    facts.push("Mode", mode_label(cfg.output, cfg.cgi));
    facts.push("Server", server);
    facts.push("Mem Limit", mem_limit);
    facts.push("Time Limit", time_limit);
    facts.push("Profile", cfg.profile.as_str());
    facts.push("Build", if cfg!(debug_assertions) { "debug" } else { "release" });
    facts.push("Alloc Tracking", on_off(memory::tracking_active()));
    facts
}
