use std::process::{Command, Output};

use anyhow::Context as _;

fn status_code(status: std::process::ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

fn dbload(args: &[&str]) -> anyhow::Result<Output> {
    let exe = env!("CARGO_BIN_EXE_dbload");
    Command::new(exe)
        .args(args)
        .env_remove("DBLOAD_HOST")
        .env_remove("DBLOAD_PORT")
        .env_remove("RUST_LOG")
        .output()
        .context("run dbload binary")
}

fn expect_code(out: &Output, expected: i32) -> anyhow::Result<()> {
    anyhow::ensure!(
        status_code(out.status) == expected,
        "expected exit code {expected}, got {}\nstdout:\n{}\nstderr:\n{}",
        status_code(out.status),
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );
    Ok(())
}

#[test]
fn help_and_version_exit_0() -> anyhow::Result<()> {
    expect_code(&dbload(&["--help"])?, 0)?;
    expect_code(&dbload(&["--version"])?, 0)?;
    expect_code(&dbload(&["bench", "--help"])?, 0)?;
    Ok(())
}

#[test]
fn invalid_flags_exit_30() -> anyhow::Result<()> {
    expect_code(&dbload(&["bench", "--duration", "10x"])?, 30)?;
    expect_code(&dbload(&["bench", "--threads", "many"])?, 30)?;
    expect_code(&dbload(&["rw", "--no-such-flag"])?, 30)?;
    Ok(())
}

#[test]
fn min_greater_than_max_exits_30_before_connecting() -> anyhow::Result<()> {
    // Port 1 would fail with 40 if a connection were attempted.
    let out = dbload(&[
        "bench", "--min", "5", "--max", "2", "--iterations", "1", "--port", "1",
    ])?;
    expect_code(&out, 30)?;

    let stderr = String::from_utf8_lossy(&out.stderr);
    anyhow::ensure!(stderr.contains("`min` (5s)"), "stderr:\n{stderr}");
    anyhow::ensure!(stderr.contains("Usage:"), "stderr:\n{stderr}");
    Ok(())
}

#[test]
fn unknown_operation_lists_choices_and_exits_30() -> anyhow::Result<()> {
    let out = dbload(&["bench", "--op", "bogus", "--iterations", "1", "--port", "1"])?;
    expect_code(&out, 30)?;

    let stderr = String::from_utf8_lossy(&out.stderr);
    anyhow::ensure!(
        stderr.contains("simple, indexed_find, nonindexed_find"),
        "stderr:\n{stderr}"
    );

    let out = dbload(&["rw", "--op", "simple", "--port", "1"])?;
    expect_code(&out, 30)?;
    let stderr = String::from_utf8_lossy(&out.stderr);
    anyhow::ensure!(stderr.contains("read, write"), "stderr:\n{stderr}");
    Ok(())
}

#[test]
fn unbounded_bench_exits_30() -> anyhow::Result<()> {
    let out = dbload(&["bench", "--duration", "0", "--iterations", "0", "--port", "1"])?;
    expect_code(&out, 30)
}

#[test]
fn zero_threads_exits_30() -> anyhow::Result<()> {
    let out = dbload(&["bench", "--threads", "0", "--iterations", "1", "--port", "1"])?;
    expect_code(&out, 30)
}

#[test]
fn unreachable_database_exits_40() -> anyhow::Result<()> {
    let out = dbload(&[
        "bench",
        "--host",
        "127.0.0.1",
        "--port",
        "1",
        "--connect-timeout",
        "300ms",
        "--iterations",
        "1",
    ])?;
    expect_code(&out, 40)?;

    let stderr = String::from_utf8_lossy(&out.stderr);
    anyhow::ensure!(
        stderr.contains("cannot reach the database"),
        "stderr:\n{stderr}"
    );
    Ok(())
}
