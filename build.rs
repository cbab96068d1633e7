use std::path::Path;
use std::process::Command;

/// Token `nth` of a command's stdout, or the whole trimmed output when `nth`
/// is `None`.
fn command_output(program: &str, args: &[&str], nth: Option<usize>) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let value = match nth {
        Some(n) => stdout.split_whitespace().nth(n)?.to_string(),
        None => stdout.trim().to_string(),
    };
    (!value.is_empty()).then_some(value)
}

fn main() {
    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());

    // `rustc 1.85.0 (4d91de4e4 2025-02-17)` -> `1.85.0`
    let version =
        command_output(&rustc, &["--version"], Some(1)).unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=MICROBENCH_RUSTC_VERSION={}", version);

    // CI checkouts may lack `.git`; they export the commit instead.
    let sha = command_output("git", &["rev-parse", "--short=12", "HEAD"], None)
        .or_else(|| std::env::var("GIT_SHA").ok())
        .or_else(|| std::env::var("GITHUB_SHA").ok())
        .map(|s| s.chars().take(12).collect::<String>());
    if let Some(sha) = sha {
        println!("cargo:rustc-env=MICROBENCH_GIT_SHA={}", sha);
    }

    println!("cargo:rerun-if-changed=build.rs");
    if Path::new(".git/HEAD").exists() {
        println!("cargo:rerun-if-changed=.git/HEAD");
    }
    println!("cargo:rerun-if-env-changed=RUSTC");
    println!("cargo:rerun-if-env-changed=GIT_SHA");
    println!("cargo:rerun-if-env-changed=GITHUB_SHA");
}
