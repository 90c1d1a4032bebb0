//! Command line behavior of the `appnera` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// `appnera` confined to a temporary home.
fn appnera(root: &Path) -> Command {
    let config = root.join("config.toml");
    if !config.exists() {
        std::fs::write(&config, "").unwrap();
    }
    let mut cmd = Command::cargo_bin("appnera").unwrap();
    cmd.env_remove("APPNERA_TEMPLATE_DIR")
        .env_remove("APPNERA_CONFIG")
        .env("NO_COLOR", "1")
        .arg("--config")
        .arg(&config)
        .arg("--base-dir")
        .arg(root.join("apps"))
        .arg("--applications-dir")
        .arg(root.join("applications"))
        .arg("--icons-dir")
        .arg(root.join("icons"))
        .arg("--template-dir")
        .arg(root.join("template"))
        .arg("--lock-dir")
        .arg(root.join("locks"));
    cmd
}

#[test]
fn list_on_fresh_home_is_empty() {
    let tmp = TempDir::new().unwrap();
    appnera(tmp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No apps installed"));
}

#[test]
fn list_json_prints_records() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("apps/My App");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("app.py"), "").unwrap();
    std::fs::write(dir.join("run.sh"), "").unwrap();

    appnera(tmp.path())
        .args(["list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""name": "My App""#))
        .stdout(predicate::str::contains(r#""id": "my-app""#));
}

#[test]
fn create_with_empty_url_fails_without_side_effects() {
    let tmp = TempDir::new().unwrap();
    let icon = tmp.path().join("icon.png");
    std::fs::write(&icon, "png").unwrap();

    appnera(tmp.path())
        .args(["create", "--url", "", "--name", "X", "--icon"])
        .arg(&icon)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid url"))
        .stderr(predicate::str::contains("hint:"));
    assert!(!tmp.path().join("apps/X").exists());
}

#[test]
fn show_unknown_app_fails() {
    let tmp = TempDir::new().unwrap();
    appnera(tmp.path())
        .args(["show", "Ghost"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No app named 'Ghost'"));
}

#[test]
fn uninstall_unknown_app_fails() {
    let tmp = TempDir::new().unwrap();
    appnera(tmp.path())
        .args(["uninstall", "Ghost"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no app wrapper named 'Ghost'"));
}

#[test]
fn uninstall_refuses_directory_that_is_not_an_app() {
    let tmp = TempDir::new().unwrap();
    let fonts = tmp.path().join("apps/share/fonts");
    std::fs::create_dir_all(&fonts).unwrap();
    std::fs::write(fonts.join("user.ttf"), "ttf").unwrap();

    appnera(tmp.path())
        .args(["uninstall", "share"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not found"));
    assert!(fonts.join("user.ttf").is_file());
}

#[test]
fn unknown_config_key_is_reported() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("config.toml"), "colour = \"blue\"\n").unwrap();
    appnera(tmp.path())
        .arg("list")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid config file"));
}
