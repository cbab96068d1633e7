//! Report rendering.
//!
//! A report has a header summarizing the run totals, a System Info table
//! built from the environment facts (in their given order) and a Test Results
//! table with one row per result. Rendering never touches the results.

use std::io::{self, Write};
use std::time::Duration;

use chrono::{SecondsFormat, Utc};

use crate::config::Profile;
use crate::error::Result;
use crate::schema::{BenchReport, EnvironmentFacts, RunMeta, RunTotals, TestResult};
use crate::OutputMode;

pub const SCHEMA_VERSION: u32 = 1;
pub const TITLE: &str = "Microbench Suite";

const RULE_WIDTH: usize = 80;

const STYLE: &str = "\
body { font-family: ui-monospace, monospace; font-size: 13px; color: #333; }
.report { max-width: 900px; margin: 10px auto; padding: 15px; border: 1px solid #ddd; border-radius: 6px; }
.header { display: flex; justify-content: space-between; padding: 16px 20px; background: #f8f9fa; font-weight: bold; }
.columns { display: flex; gap: 20px; align-items: flex-start; }
.info { flex: 1; min-width: 260px; }
.results { flex: 2; }
table { width: 100%; border-collapse: collapse; }
td, th { padding: 6px 0; border-bottom: 1px solid #f1f1f1; }
td.value, th.value { text-align: right; }
";

/// Formats seconds with four decimals, e.g. `1.2346 s`.
///
/// Rounds half away from zero and groups thousands with `,`.
pub fn format_time(seconds: f64) -> String {
    let rounded = (seconds * 10_000.0).round() / 10_000.0;
    format!("{} s", group_thousands(&format!("{rounded:.4}")))
}

pub fn format_duration(d: Duration) -> String {
    format_time(d.as_secs_f64())
}

/// Formats a byte count as `B`, `KB` or `MB` with up to two decimals.
pub fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;

    match bytes {
        0 => "0 B".to_string(),
        b if b < KIB => format!("{b} B"),
        b if b < MIB => format!("{} KB", round2(b as f64 / KIB as f64)),
        b => format!("{} MB", round2(b as f64 / MIB as f64)),
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(number.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Commit the binary was built from, as recorded by `build.rs`.
const BUILD_GIT_SHA: Option<&str> = option_env!("MICROBENCH_GIT_SHA");

impl RunMeta {
    /// Metadata for a report rendered now.
    pub fn capture(profile: Profile) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            bench_version: env!("CARGO_PKG_VERSION").to_string(),
            profile: profile.as_str().to_string(),
            timestamp_utc: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            git_sha: BUILD_GIT_SHA.filter(|sha| !sha.is_empty()).map(str::to_string),
        }
    }
}

/// Writes the report for `results` and `totals` in the requested format.
pub fn render<W: Write>(
    facts: &EnvironmentFacts,
    results: &[TestResult],
    totals: &RunTotals,
    profile: Profile,
    format: OutputMode,
    sink: &mut W,
) -> Result<()> {
    match format {
        OutputMode::Text => render_text(facts, results, totals, sink)?,
        OutputMode::Html => render_html(facts, results, totals, sink)?,
        OutputMode::Json => {
            render_json(RunMeta::capture(profile), facts, results, totals, sink)?
        }
    }
    sink.flush()?;
    Ok(())
}

fn render_text<W: Write>(
    facts: &EnvironmentFacts,
    results: &[TestResult],
    totals: &RunTotals,
    out: &mut W,
) -> io::Result<()> {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    let half = RULE_WIDTH / 2;

    writeln!(out, "{heavy}")?;
    writeln!(out, "{} v{}", TITLE.to_uppercase(), env!("CARGO_PKG_VERSION"))?;
    writeln!(
        out,
        "Total Time: {} | Peak Mem: {}",
        format_duration(totals.total_elapsed),
        format_size(totals.peak_memory)
    )?;
    writeln!(out, "{heavy}")?;

    writeln!(out, "\nSystem Info")?;
    writeln!(out, "{light}")?;
    for fact in facts.iter() {
        writeln!(out, "{:<half$}{:>half$}", fact.label, fact.value)?;
    }

    writeln!(out, "\nTest Results")?;
    writeln!(out, "{light}")?;
    writeln!(out, "{:<half$}{:>half$}", "Test Name", "Time")?;
    for result in results {
        writeln!(out, "{:<half$}{:>half$}", result.name, format_duration(result.elapsed))?;
    }
    writeln!(out, "{heavy}")?;
    Ok(())
}

fn render_html<W: Write>(
    facts: &EnvironmentFacts,
    results: &[TestResult],
    totals: &RunTotals,
    out: &mut W,
) -> io::Result<()> {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{TITLE}</title>\n"));
    html.push_str(&format!("<style>\n{STYLE}</style>\n</head>\n<body>\n"));
    html.push_str("<div class=\"report\">\n");

    html.push_str("<div class=\"header\">\n");
    html.push_str(&format!(
        "<span>{} <small>v{}</small></span>\n",
        TITLE,
        env!("CARGO_PKG_VERSION")
    ));
    html.push_str(&format!(
        "<span>Total Time: <span class=\"time\">{}</span> | Peak Mem: <span class=\"mem\">{}</span></span>\n",
        format_duration(totals.total_elapsed),
        format_size(totals.peak_memory)
    ));
    html.push_str("</div>\n<div class=\"columns\">\n");

    html.push_str("<div class=\"info\">\n<h4>System Info</h4>\n<table>\n");
    for fact in facts.iter() {
        html.push_str(&format!(
            "<tr><td>{}</td><td class=\"value\">{}</td></tr>\n",
            escape_html(&fact.label),
            escape_html(&fact.value)
        ));
    }
    html.push_str("</table>\n</div>\n");

    html.push_str("<div class=\"results\">\n<h4>Test Results</h4>\n<table>\n");
    html.push_str("<tr><th>Test Name</th><th class=\"value\">Time</th></tr>\n");
    for result in results {
        html.push_str(&format!(
            "<tr><td>{}</td><td class=\"value\">{}</td></tr>\n",
            escape_html(&result.name),
            format_duration(result.elapsed)
        ));
    }
    html.push_str("</table>\n</div>\n");

    html.push_str("</div>\n</div>\n</body>\n</html>\n");
    out.write_all(html.as_bytes())
}

fn render_json<W: Write>(
    run: RunMeta,
    facts: &EnvironmentFacts,
    results: &[TestResult],
    totals: &RunTotals,
    out: &mut W,
) -> Result<()> {
    let report = BenchReport {
        run,
        environment: facts.clone(),
        totals: totals.clone(),
        results: results.to_vec(),
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

/// Response headers sent before an HTML report when running under CGI.
pub fn write_cgi_headers<W: Write>(out: &mut W) -> io::Result<()> {
    write!(
        out,
        "Content-Type: text/html; charset=utf-8\r\n\
         Expires: Wed, 11 Jan 1984 05:00:00 GMT\r\n\
         Cache-Control: no-cache, must-revalidate, max-age=0\r\n\r\n"
    )
}
