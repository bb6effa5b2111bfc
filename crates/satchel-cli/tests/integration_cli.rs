//! End-to-end tests for the satchel binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn satchel() -> Command {
    let mut cmd = Command::cargo_bin("satchel").expect("binary builds");
    // Start from a clean environment contract.
    cmd.env_remove("NODE_ENV")
        .env_remove("WATCH")
        .env_remove("CRITICAL")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn help_lists_subcommands() {
    satchel()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("watch"));
}

#[test]
fn watch_without_signal_fails_with_guidance() {
    satchel()
        .arg("watch")
        .assert()
        .failure()
        .stderr(predicate::str::contains("WATCH"));
}

#[test]
fn verbose_and_quiet_conflict() {
    satchel()
        .args(["--verbose", "--quiet", "build"])
        .assert()
        .failure();
}

#[test]
fn missing_compiler_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    satchel()
        .current_dir(dir.path())
        .args(["build", "--compiler", "satchel-test-no-such-compiler"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("satchel-test-no-such-compiler"));
}

#[cfg(unix)]
mod with_fake_compiler {
    use super::*;
    use std::fs;

    const CLEAN_STATS: &str =
        r#"cat > /dev/null; echo '{"errors":[],"warnings":[],"startTime":0,"endTime":125}'"#;

    fn project_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("public/js")).unwrap();
        fs::create_dir_all(dir.path().join("public/css")).unwrap();
        dir
    }

    fn build_cmd(dir: &tempfile::TempDir, script: &str) -> Command {
        let mut cmd = satchel();
        cmd.current_dir(dir.path()).args([
            "build",
            "--compiler",
            "sh",
            "--compiler-arg",
            "-c",
            "--compiler-arg",
            script,
        ]);
        cmd
    }

    #[test]
    fn build_cleans_stale_output_and_reports_success() {
        let dir = project_dir();
        let stale = dir.path().join("public/js/app-old.js");
        fs::write(&stale, "stale").unwrap();

        build_cmd(&dir, CLEAN_STATS)
            .assert()
            .success()
            .stderr(predicate::str::contains("build finished"));

        assert!(!stale.exists());
    }

    #[test]
    fn diagnostics_surface_but_do_not_fail_the_process() {
        let dir = project_dir();
        let script = r#"cat > /dev/null; echo '{"errors":["boom"],"warnings":[],"startTime":0,"endTime":5}'"#;

        build_cmd(&dir, script)
            .assert()
            .success()
            .stderr(predicate::str::contains("1 error(s)"));
    }

    #[test]
    fn compiler_crash_fails_the_process() {
        let dir = project_dir();
        let script = "cat > /dev/null; echo broken >&2; exit 2";

        build_cmd(&dir, script)
            .assert()
            .failure()
            .stderr(predicate::str::contains("status 2"));
    }

    #[test]
    fn production_flag_reaches_the_compiler_spec() {
        let dir = project_dir();
        // The compiler echoes its spec to a file so the test can inspect it.
        let script = r#"tee spec.json > /dev/null; echo '{"errors":[],"warnings":[],"startTime":0,"endTime":1}'"#;

        let mut cmd = build_cmd(&dir, script);
        cmd.arg("--production").assert().success();

        let spec = fs::read_to_string(dir.path().join("spec.json")).unwrap();
        assert!(spec.contains(r#""variant":"production""#));
        assert!(spec.contains(r#""name":"minify""#));
    }
}
