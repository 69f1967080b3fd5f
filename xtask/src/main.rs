//! Workspace automation for Courier.
//!
//! Run with: `cargo xtask <task>`. Output goes to the terminal, so
//! `println!`/`eprintln!` are allowed here.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::process::{Command, ExitCode};

use anyhow::{bail, Context, Result};

mod features;

type TaskFn = fn() -> Result<()>;

/// Every task, in the order `ci` runs them.
const TASKS: &[(&str, &str, TaskFn)] = &[
    ("fmt", "rustfmt check over the workspace", fmt),
    ("clippy", "lint all targets and features, warnings denied", clippy),
    ("test", "unit, integration and doc tests", test),
    ("test-features", "courier-infra tests per feature set", features::test_feature_matrix),
    ("deny", "license and advisory policy (cargo-deny)", deny),
    ("audit", "RustSec advisories (cargo-audit)", audit),
];

fn main() -> ExitCode {
    let task = std::env::args().nth(1);

    let result = match task.as_deref() {
        None | Some("help" | "-h" | "--help") => {
            usage();
            Ok(())
        }
        Some("ci") => ci(),
        Some(name) => match TASKS.iter().find(|(task, _, _)| *task == name) {
            Some((_, _, run)) => run(),
            None => {
                usage();
                Err(anyhow::anyhow!("no task named `{name}`"))
            }
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("xtask: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn usage() {
    println!("usage: cargo xtask <task>\n");
    println!("  {:<14} every task below, stopping at the first failure", "ci");
    for (name, about, _) in TASKS {
        println!("  {name:<14} {about}");
    }
}

fn ci() -> Result<()> {
    for (index, (name, _, run)) in TASKS.iter().enumerate() {
        println!("[ci {}/{}] {name}", index + 1, TASKS.len());
        run().with_context(|| format!("ci stopped at `{name}`"))?;
    }
    println!("ci: all {} tasks passed", TASKS.len());
    Ok(())
}

/// Run `cargo <args>` and fail with `what` if it exits non-zero.
fn cargo(args: &[&str], what: &str) -> Result<()> {
    let status = Command::new("cargo")
        .args(args)
        .status()
        .with_context(|| format!("could not spawn `cargo {}`", args.join(" ")))?;
    if !status.success() {
        bail!("{what}");
    }
    Ok(())
}

fn fmt() -> Result<()> {
    cargo(&["fmt", "--all", "--", "--check"], "unformatted code; run `cargo fmt --all`")
}

fn clippy() -> Result<()> {
    cargo(
        &["clippy", "--workspace", "--all-targets", "--all-features", "--", "-D", "warnings"],
        "clippy reported warnings",
    )
}

fn test() -> Result<()> {
    cargo(&["test", "--workspace", "--all-features"], "tests failed")
}

fn deny() -> Result<()> {
    require_subcommand("deny")?;
    cargo(&["deny", "check"], "cargo-deny rejected the dependency graph")
}

fn audit() -> Result<()> {
    require_subcommand("audit")?;
    cargo(&["audit"], "cargo-audit found vulnerable dependencies")
}

fn require_subcommand(name: &str) -> Result<()> {
    let installed = Command::new("cargo")
        .args([name, "--version"])
        .output()
        .is_ok_and(|output| output.status.success());
    if !installed {
        bail!("`cargo {name}` is unavailable; install it with `cargo install cargo-{name}`");
    }
    Ok(())
}
