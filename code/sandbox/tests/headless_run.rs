use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

const RUN_LIMIT: Duration = Duration::from_secs(30);

async fn run_sandbox(args: &[&str]) -> Result<std::process::ExitStatus, Box<dyn std::error::Error>> {
    let status = timeout(
        RUN_LIMIT,
        Command::new(env!("CARGO_BIN_EXE_sandbox"))
            .args(args)
            .env("RUST_LOG", "warn")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status(),
    )
    .await??;
    Ok(status)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn bounded_run_exits_cleanly() -> Result<(), Box<dyn std::error::Error>> {
    let status = run_sandbox(&["--equipment", "tank", "--tick-hz", "120", "--ticks", "240"]).await?;
    assert!(status.success(), "sandbox exited with {status}");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn every_equipment_kind_runs() -> Result<(), Box<dyn std::error::Error>> {
    for equipment in ["rifle", "pistol", "fighter", "artillery"] {
        let status = run_sandbox(&["-e", equipment, "--ticks", "60", "--seed", "3"]).await?;
        assert!(status.success(), "{equipment} run exited with {status}");
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn invalid_arguments_fail() -> Result<(), Box<dyn std::error::Error>> {
    let status = run_sandbox(&["--tick-hz", "0", "--ticks", "10"]).await?;
    assert!(!status.success(), "zero tick rate must be rejected");

    let status = run_sandbox(&["--equipment", "submarine"]).await?;
    assert!(!status.success(), "unknown equipment must be rejected");
    Ok(())
}
