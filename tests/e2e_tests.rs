//! End-to-end tests for the tbench CLI
//!
//! The transfer tool is replaced by small shell scripts that log their
//! arguments, so these tests run without network access or credentials.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Variables that would otherwise leak into the child configuration
const CONFIG_VARS: &[&str] = &[
    "SOURCE_DIR",
    "ITERATIONS",
    "BASELINE_BIN",
    "CANDIDATE_BIN",
    "BASELINE_BUCKET",
    "BUCKETS",
    "REGIONS",
    "MANIFEST_DIR",
    "TOKEN_LENGTH",
    "CLEANUP_POLICY",
    "REGION_ENV_VAR",
    "ENABLE_COLOR",
    "AWS_DEFAULT_REGION",
];

fn tbench(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tbench").unwrap();
    cmd.current_dir(dir.path());
    for var in CONFIG_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_env_help() {
    let dir = TempDir::new().unwrap();
    tbench(&dir)
        .arg("--env-help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Supported Environment Variables:"))
        .stdout(predicate::str::contains("CLEANUP_POLICY"))
        .stdout(predicate::str::contains("# BUCKETS="));
}

#[test]
fn test_version_flag() {
    let dir = TempDir::new().unwrap();
    tbench(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tbench"));
}

#[test]
fn test_conflicting_color_flags() {
    let dir = TempDir::new().unwrap();
    tbench(&dir)
        .args(["--color", "--no-color"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--no-color"));
}

#[test]
fn test_invalid_cleanup_policy_is_rejected_by_parser() {
    let dir = TempDir::new().unwrap();
    tbench(&dir)
        .args(["--cleanup", "eventually"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("eventually"));
}

#[test]
fn test_mismatched_buckets_and_regions() {
    let dir = TempDir::new().unwrap();
    tbench(&dir)
        .args(["--no-color", "--buckets", "s3://a,s3://b", "--regions", "us-east-1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("pair up"));
}

#[test]
fn test_invalid_environment_value() {
    let dir = TempDir::new().unwrap();
    tbench(&dir)
        .env("TOKEN_LENGTH", "lots")
        .arg("--no-color")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("TOKEN_LENGTH"));
}

#[test]
fn test_missing_source_directory() {
    let dir = TempDir::new().unwrap();
    tbench(&dir)
        .args(["--no-color", "--source", "does-not-exist", "--cleanup", "skip"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("does-not-exist"));
}

#[cfg(unix)]
mod with_stub_tool {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    /// Payload of three files, one of them nested
    fn payload(dir: &TempDir) -> PathBuf {
        let source = dir.path().join("blob");
        fs::create_dir_all(source.join("sub")).unwrap();
        fs::write(source.join("a.bin"), b"aaaa").unwrap();
        fs::write(source.join("b.bin"), b"bbbb").unwrap();
        fs::write(source.join("sub/c.bin"), b"cccc").unwrap();
        source
    }

    /// Stub that appends `<region> <args>` to `<name>.log`; `run` fails from
    /// call number `fail_from` on when given
    fn stub(dir: &TempDir, name: &str, fail_from: Option<u32>) -> PathBuf {
        let path = dir.path().join(name);
        let log = dir.path().join(format!("{}.log", name));
        let counter = dir.path().join(format!("{}.count", name));
        let threshold = fail_from.map(|n| n.to_string()).unwrap_or_else(|| "0".to_string());

        let script = format!(
            r#"#!/bin/sh
echo "${{AWS_DEFAULT_REGION:--}} $*" >> "{log}"
if [ "$1" = "run" ]; then
    count=$(cat "{counter}" 2>/dev/null || echo 0)
    count=$((count + 1))
    echo "$count" > "{counter}"
    if [ {threshold} -gt 0 ] && [ "$count" -ge {threshold} ]; then
        echo "upload failed" >&2
        exit 3
    fi
fi
exit 0
"#,
            log = log.display(),
            counter = counter.display(),
            threshold = threshold,
        );

        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn calls(dir: &TempDir, name: &str) -> Vec<String> {
        fs::read_to_string(dir.path().join(format!("{}.log", name)))
            .unwrap_or_default()
            .lines()
            .map(String::from)
            .collect()
    }

    fn run_args<'a>(source: &'a Path, baseline: &'a Path, candidate: &'a Path) -> Vec<String> {
        vec![
            "--no-color".to_string(),
            "--quiet".to_string(),
            "--seed".to_string(),
            "42".to_string(),
            "--source".to_string(),
            source.display().to_string(),
            "--baseline-bin".to_string(),
            baseline.display().to_string(),
            "--candidate-bin".to_string(),
            candidate.display().to_string(),
        ]
    }

    #[test]
    fn test_two_iterations_report_both_means() {
        let dir = TempDir::new().unwrap();
        let source = payload(&dir);
        let baseline = stub(&dir, "old", None);
        let candidate = stub(&dir, "new", None);

        tbench(&dir)
            .args(run_args(&source, &baseline, &candidate))
            .args(["-n", "2"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Transfer Benchmark Results"))
            .stdout(predicate::str::contains(format!("baseline ({})", baseline.display())))
            .stdout(predicate::str::contains(format!("candidate ({})", candidate.display())))
            .stdout(predicate::str::contains("over 2 run(s)").count(2))
            .stdout(predicate::str::contains("Comparison:"));

        let baseline_calls = calls(&dir, "old");
        assert_eq!(baseline_calls.iter().filter(|c| c.contains(" run ")).count(), 2);

        // Manifests hold one line per file
        let manifest = fs::read_to_string(dir.path().join("commands.txt")).unwrap();
        assert_eq!(manifest.lines().count(), 3);
        assert!(manifest.lines().all(|l| l.starts_with("cp ") && l.contains(" s3://bucket-faru-1/")));
        let paired = fs::read_to_string(dir.path().join("commandsWithRegion.txt")).unwrap();
        assert!(paired.lines().all(|l| l.starts_with("cp --region=us-east-")));
    }

    #[test]
    fn test_cleanup_passes_region_to_each_delete() {
        let dir = TempDir::new().unwrap();
        let source = payload(&dir);
        let baseline = stub(&dir, "old", None);
        let candidate = stub(&dir, "new", None);

        tbench(&dir)
            .args(run_args(&source, &baseline, &candidate))
            .args(["-n", "1"])
            .assert()
            .success();

        let deletes: Vec<String> = calls(&dir, "new")
            .into_iter()
            .filter(|c| c.contains(" rm "))
            .collect();
        assert!(!deletes.is_empty());
        for delete in &deletes {
            let (region, command) = delete.split_once(' ').unwrap();
            let expected = if command.contains("s3://bucket-faru-1/") { "us-east-1" } else { "us-east-2" };
            assert_eq!(region, expected);
            assert!(command.ends_with("/*"));
        }
    }

    #[test]
    fn test_candidate_failure_in_second_iteration_aborts() {
        let dir = TempDir::new().unwrap();
        let source = payload(&dir);
        let baseline = stub(&dir, "old", None);
        let candidate = stub(&dir, "new", Some(2));

        tbench(&dir)
            .args(run_args(&source, &baseline, &candidate))
            .args(["-n", "3"])
            .assert()
            .code(6)
            .stdout(predicate::str::contains("Transfer Benchmark Results").not())
            .stderr(predicate::str::contains("candidate run failed in iteration 2"));

        // Baseline ran twice, nothing was deleted
        let baseline_calls = calls(&dir, "old");
        assert_eq!(baseline_calls.len(), 2);
        assert!(calls(&dir, "new").iter().all(|c| !c.contains(" rm ")));
    }

    #[test]
    fn test_verbose_report_lists_iterations() {
        let dir = TempDir::new().unwrap();
        let source = payload(&dir);
        let baseline = stub(&dir, "old", None);
        let candidate = stub(&dir, "new", None);

        tbench(&dir)
            .args(run_args(&source, &baseline, &candidate))
            .args(["-n", "2", "--verbose", "--cleanup", "skip"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Iterations:"))
            .stdout(predicate::str::contains("Baseline prefix"));

        assert!(calls(&dir, "new").iter().all(|c| !c.contains(" rm ")));
    }

    #[test]
    fn test_child_stderr_is_streamed_to_stdout() {
        let dir = TempDir::new().unwrap();
        let source = payload(&dir);
        let baseline = stub(&dir, "old", None);
        let candidate = dir.path().join("chatty");
        fs::write(&candidate, "#!/bin/sh\necho CHATTY_STDERR_LINE >&2\nexit 0\n").unwrap();
        fs::set_permissions(&candidate, fs::Permissions::from_mode(0o755)).unwrap();

        let mut args = run_args(&source, &baseline, &candidate);
        args.retain(|arg| arg != "--quiet");

        tbench(&dir)
            .args(args)
            .args(["-n", "1", "--cleanup", "skip"])
            .assert()
            .success()
            .stdout(predicate::str::contains("CHATTY_STDERR_LINE"))
            .stderr(predicate::str::contains("CHATTY_STDERR_LINE").not());
    }

    #[test]
    fn test_quiet_discards_child_output() {
        let dir = TempDir::new().unwrap();
        let source = payload(&dir);
        let baseline = stub(&dir, "old", None);
        let candidate = dir.path().join("chatty");
        fs::write(&candidate, "#!/bin/sh\necho CHATTY_STDOUT_LINE\necho CHATTY_STDERR_LINE >&2\n").unwrap();
        fs::set_permissions(&candidate, fs::Permissions::from_mode(0o755)).unwrap();

        tbench(&dir)
            .args(run_args(&source, &baseline, &candidate))
            .args(["-n", "1", "--cleanup", "skip"])
            .assert()
            .success()
            .stdout(predicate::str::contains("CHATTY_").not())
            .stderr(predicate::str::contains("CHATTY_").not());
    }

    #[test]
    fn test_log_entries_stay_off_stdout() {
        let dir = TempDir::new().unwrap();
        let source = payload(&dir);
        let baseline = stub(&dir, "old", None);
        let candidate = stub(&dir, "new", None);

        tbench(&dir)
            .args(run_args(&source, &baseline, &candidate))
            .args(["-n", "1", "--verbose", "--cleanup", "skip"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Transfer Benchmark Results"))
            .stdout(predicate::str::contains("[BENCH]").not())
            .stdout(predicate::str::contains("[PERF]").not())
            .stderr(predicate::str::contains("[BENCH] Starting 1 iteration(s)"))
            .stderr(predicate::str::contains("[PERF] Iteration 1 done"));
    }

    #[test]
    fn test_missing_candidate_binary() {
        let dir = TempDir::new().unwrap();
        let source = payload(&dir);
        let baseline = stub(&dir, "old", None);
        let missing = dir.path().join("not-installed");

        tbench(&dir)
            .args(run_args(&source, &baseline, &missing))
            .args(["-n", "1"])
            .assert()
            .code(6)
            .stderr(predicate::str::contains("failed to launch"));
    }
}
