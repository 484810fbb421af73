//! Repository status report.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use mobi_admin::Changelog;
use serde::Serialize;

use super::ReportArgs;
use crate::context::Context;

/// Result of one external command.
#[derive(Debug, Clone)]
struct Probe {
    ok: bool,
    stdout: String,
    stderr: String,
}

impl Probe {
    fn run(program: &str, args: &[&str], cwd: &Path) -> Self {
        tracing::debug!(program, ?args, "running");
        match Command::new(program).args(args).current_dir(cwd).output() {
            Ok(out) => Self {
                ok: out.status.success(),
                stdout: String::from_utf8_lossy(&out.stdout).trim_end().to_string(),
                stderr: String::from_utf8_lossy(&out.stderr).trim_end().to_string(),
            },
            Err(e) => Self {
                ok: false,
                stdout: String::new(),
                stderr: e.to_string(),
            },
        }
    }

    /// Trimmed stdout when the command succeeded.
    fn value(&self) -> Option<String> {
        (self.ok && !self.stdout.is_empty()).then(|| self.stdout.trim().to_string())
    }

    fn lines(&self) -> Vec<String> {
        if !self.ok {
            return Vec::new();
        }
        self.stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.to_string())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
enum BuildCheck {
    Skipped,
    Passed,
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
struct StatusReport {
    generated_at: DateTime<Utc>,
    branch: Option<String>,
    commit: Option<String>,
    changed_files: Vec<String>,
    recent_commits: Vec<String>,
    toolchain: Option<String>,
    build: BuildCheck,
    changelog_version: Option<String>,
}

/// Run the report command.
pub async fn run(args: ReportArgs, ctx: &Context) -> Result<()> {
    let steps = if args.skip_build { 5 } else { 6 };
    let progress = ctx.output.progress(steps);
    let cwd = ctx.cwd.as_path();

    progress.set_message("git rev-parse");
    let commit = Probe::run("git", &["rev-parse", "HEAD"], cwd).value();
    let branch = Probe::run("git", &["rev-parse", "--abbrev-ref", "HEAD"], cwd).value();
    progress.inc(1);

    progress.set_message("git status");
    let status = Probe::run("git", &["status", "--porcelain"], cwd);
    if !status.ok {
        ctx.output.debug(&format!("git status failed: {}", status.stderr));
    }
    progress.inc(1);

    progress.set_message("git log");
    let count = format!("-n{}", args.commits);
    let log = Probe::run("git", &["log", "--oneline", &count], cwd);
    progress.inc(1);

    progress.set_message("cargo --version");
    let toolchain = Probe::run("cargo", &["--version"], cwd).value();
    progress.inc(1);

    let build = if args.skip_build {
        BuildCheck::Skipped
    } else {
        progress.set_message("cargo build");
        let probe = Probe::run("cargo", &["build", "--workspace", "--quiet"], cwd);
        progress.inc(1);
        if probe.ok {
            BuildCheck::Passed
        } else {
            BuildCheck::Failed(last_lines(&probe.stderr, 20))
        }
    };

    progress.set_message("changelog");
    let changelog_version = match Changelog::bundled() {
        Ok(changelog) => changelog.latest().map(|r| r.version.clone()),
        Err(e) => {
            ctx.output.warn(&format!("Changelog unavailable: {}", e));
            None
        }
    };
    progress.inc(1);
    progress.finish_and_clear();

    let report = StatusReport {
        generated_at: Utc::now(),
        branch,
        commit,
        changed_files: status.lines(),
        recent_commits: log.lines(),
        toolchain,
        build,
        changelog_version,
    };

    let path = ctx.resolve_path(&args.output);
    fs::write(&path, render(&report))
        .with_context(|| format!("Failed to write report: {}", path.display()))?;

    if ctx.output.is_json() {
        ctx.output.json(&report);
        return Ok(());
    }

    ctx.output.success(&format!("Wrote {}", path.display()));
    if let BuildCheck::Failed(_) = report.build {
        ctx.output.warn("cargo build failed; see the report for details");
    }
    Ok(())
}

fn last_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    lines[lines.len().saturating_sub(n)..].join("\n")
}

fn render(report: &StatusReport) -> String {
    let mut md = String::new();
    let unknown = "unknown";

    let _ = writeln!(md, "# MobiStore status\n");
    let _ = writeln!(
        md,
        "Generated {}\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    let _ = writeln!(md, "| | |\n|---|---|");
    let _ = writeln!(md, "| Branch | {} |", report.branch.as_deref().unwrap_or(unknown));
    let _ = writeln!(md, "| Commit | {} |", report.commit.as_deref().unwrap_or(unknown));
    let _ = writeln!(
        md,
        "| Release | {} |",
        report.changelog_version.as_deref().unwrap_or(unknown)
    );
    let _ = writeln!(md, "| Toolchain | {} |", report.toolchain.as_deref().unwrap_or(unknown));
    let build = match report.build {
        BuildCheck::Skipped => "skipped",
        BuildCheck::Passed => "passing",
        BuildCheck::Failed(_) => "failing",
    };
    let _ = writeln!(md, "| Build | {} |", build);

    let _ = writeln!(md, "\n## Working tree\n");
    if report.changed_files.is_empty() {
        let _ = writeln!(md, "Clean.");
    } else {
        for file in &report.changed_files {
            let _ = writeln!(md, "- `{}`", file.trim());
        }
    }

    let _ = writeln!(md, "\n## Recent commits\n");
    if report.recent_commits.is_empty() {
        let _ = writeln!(md, "None found.");
    } else {
        for commit in &report.recent_commits {
            let _ = writeln!(md, "- {}", commit);
        }
    }

    if let BuildCheck::Failed(ref output) = report.build {
        let _ = writeln!(md, "\n## Build output\n\n```text\n{}\n```", output);
    }

    md
}
