//! End-to-end tests of the `jv` binary in a sandboxed environment.
//!
//! The platform JDK directories are scanned too, so fixtures use versions no
//! real JDK reports and assertions only look for what the sandbox added.

#![allow(clippy::unwrap_used)]

mod common;

use std::fs;

use common::JvSandbox;
use jv_lib::core::testing::JdkFixture;
use predicates::prelude::*;

#[test]
fn version_flag() {
    let sandbox = JvSandbox::new();
    sandbox
        .jv()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn add_list_remove_custom_jdk() {
    let sandbox = JvSandbox::new();
    let jdk = sandbox.root().join("custom").join("jdk-99");
    JdkFixture::new("99.0.1").create(&jdk);

    sandbox
        .jv()
        .arg("add")
        .arg(&jdk)
        .assert()
        .success()
        .stdout(predicate::str::contains("Added Java 99.0.1"));

    let saved = fs::read_to_string(sandbox.registry_file()).unwrap();
    assert!(saved.contains("jdk-99"));

    sandbox
        .jv()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("99.0.1").and(predicate::str::contains("(custom)")));

    // Adding again is a no-op
    sandbox
        .jv()
        .arg("add")
        .arg(&jdk)
        .assert()
        .success()
        .stdout(predicate::str::contains("already registered"));

    sandbox
        .jv()
        .args(["rm"])
        .arg(&jdk)
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed"));

    sandbox
        .jv()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("99.0.1").not());
}

#[test]
fn add_rejects_non_jdk() {
    let sandbox = JvSandbox::new();
    let dir = sandbox.root().join("not-a-jdk");
    fs::create_dir_all(&dir).unwrap();

    sandbox
        .jv()
        .arg("add")
        .arg(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a JDK"));
    assert!(!sandbox.registry_file().exists());
}

#[test]
fn search_path_is_scanned_and_listed() {
    let sandbox = JvSandbox::new();
    let dir = sandbox.root().join("jdks");
    JdkFixture::new("99.0.2").create(&dir.join("vendor-99"));

    sandbox
        .jv()
        .arg("add-path")
        .arg(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 JDK(s) found"));

    sandbox
        .jv()
        .arg("list-paths")
        .assert()
        .success()
        .stdout(predicate::str::contains("search path"));

    sandbox
        .jv()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("99.0.2").and(predicate::str::contains("(auto)")));

    sandbox
        .jv()
        .arg("remove-path")
        .arg(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed search path"));
}

#[test]
fn add_path_rejects_missing_directory() {
    let sandbox = JvSandbox::new();
    sandbox
        .jv()
        .arg("add-path")
        .arg(sandbox.root().join("missing"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a directory"));
}

#[test]
fn use_without_privileges_is_denied() {
    let sandbox = JvSandbox::new();
    let jdk = sandbox.root().join("jdk-99");
    JdkFixture::new("99.0.1").create(&jdk);
    sandbox.jv().arg("add").arg(&jdk).assert().success();

    sandbox
        .jv()
        .args(["use", "99.0.1", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Permission denied").and(predicate::str::contains("elevated shell")));

    assert!(!sandbox.env_file().exists());
}

#[cfg(unix)]
#[test]
fn use_with_privileges_writes_profile() {
    let sandbox = JvSandbox::new();
    let jdk = sandbox.root().join("jdk-99");
    JdkFixture::new("99.0.1").create(&jdk);
    sandbox.jv().arg("add").arg(&jdk).assert().success();

    sandbox
        .jv_privileged()
        .args(["use", "99.0.1", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("JAVA_HOME set to"));

    let profile = fs::read_to_string(sandbox.env_file()).unwrap();
    assert!(profile.contains(&format!("export JAVA_HOME=\"{}\"", jdk.display())));
    assert!(profile.contains("export PATH=\"$JAVA_HOME/bin:$PATH\""));

    // Switching again keeps a single PATH entry
    sandbox
        .jv_privileged()
        .args(["use", "99.0.1", "-y"])
        .assert()
        .success();
    let profile = fs::read_to_string(sandbox.env_file()).unwrap();
    assert_eq!(profile.matches("$JAVA_HOME/bin").count(), 1);

    sandbox
        .jv()
        .arg("current")
        .assert()
        .success()
        .stdout(predicate::str::contains("System-wide JAVA_HOME is"));
}

#[test]
fn use_unknown_version_fails() {
    let sandbox = JvSandbox::new();
    let jdk = sandbox.root().join("jdk-99");
    JdkFixture::new("99.0.1").create(&jdk);
    sandbox.jv().arg("add").arg(&jdk).assert().success();

    sandbox
        .jv_privileged()
        .args(["use", "98.7.6", "-y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No installed Java matches '98.7.6'"));
    assert!(!sandbox.env_file().exists());
}

#[test]
fn install_with_unknown_distributor() {
    let sandbox = JvSandbox::new();
    sandbox
        .jv()
        .args(["install", "21", "--distributor", "nope", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown distributor 'nope'").and(predicate::str::contains("adoptium")));
}

#[test]
fn install_without_yes_needs_terminal() {
    let sandbox = JvSandbox::new();
    sandbox
        .jv()
        .args(["install", "21", "--arch", "x64"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));
}

#[test]
fn malformed_registry_points_to_repair() {
    let sandbox = JvSandbox::new();
    fs::create_dir_all(sandbox.config_dir()).unwrap();
    fs::write(sandbox.registry_file(), "{ not json").unwrap();

    sandbox
        .jv()
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Registry error").and(predicate::str::contains("jv repair")));

    sandbox
        .jv_privileged()
        .args(["repair", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reset the configuration"));

    assert!(sandbox.config_dir().join("jv.json.bak").exists());
    sandbox.jv().arg("list").assert().success();
}

#[test]
fn current_reports_shell_java_home() {
    let sandbox = JvSandbox::new();
    let jdk = sandbox.root().join("jdk-99");
    JdkFixture::new("99.0.3").create(&jdk);

    sandbox
        .jv()
        .env("JAVA_HOME", &jdk)
        .arg("current")
        .assert()
        .success()
        .stdout(predicate::str::contains("99.0.3"));
}

#[test]
fn current_without_java_home() {
    let sandbox = JvSandbox::new();
    sandbox
        .jv()
        .arg("current")
        .assert()
        .success()
        .stdout(predicate::str::contains("JAVA_HOME is not set"));
}

#[test]
fn doctor_reports_without_failing() {
    let sandbox = JvSandbox::new();
    sandbox
        .jv()
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("JAVA_HOME is not set"));
}

#[test]
fn completions_for_bash() {
    let sandbox = JvSandbox::new();
    sandbox
        .jv()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_jv"));
}
