use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SHOP: &str = r#"{
    "system": { "name": "shop" },
    "components": [
        { "key": "api", "kind": "service", "dependencies": { "database": "db", "cache": "cache" } },
        { "key": "db", "kind": "service" },
        { "key": "cache", "dependencies": ["db"] }
    ]
}"#;

fn write_manifest(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("Failed to write manifest");
    path
}

#[test]
fn test_order_prints_dependencies_first() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let manifest = write_manifest(&dir, "shop.json", SHOP);

    Command::cargo_bin("gantry")?
        .arg("order")
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::eq("db\ncache\napi\n"));

    Command::cargo_bin("gantry")?
        .args(["order", "--reverse"])
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::eq("api\ncache\ndb\n"));
    Ok(())
}

#[test]
fn test_check_accepts_valid_manifest() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let manifest = write_manifest(&dir, "shop.json", SHOP);

    Command::cargo_bin("gantry")?
        .arg("check")
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("System 'shop' is valid (3 components)"));
    Ok(())
}

#[test]
fn test_check_rejects_cycle() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let manifest = write_manifest(
        &dir,
        "cycle.json",
        r#"{ "components": [
            { "key": "a", "dependencies": ["b"] },
            { "key": "b", "dependencies": ["a"] }
        ] }"#,
    );

    Command::cargo_bin("gantry")?
        .arg("check")
        .arg(&manifest)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dependency cycle detected"));
    Ok(())
}

#[test]
fn test_run_starts_then_stops() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let manifest = write_manifest(&dir, "shop.json", SHOP);

    Command::cargo_bin("gantry")?
        .arg("run")
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("started db\nstarted cache\nstarted api\n"))
        .stdout(predicate::str::contains("stopped api\nstopped cache\nstopped db\n"));
    Ok(())
}

#[test]
fn test_disabled_component_is_left_out() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let manifest = write_manifest(
        &dir,
        "partial.json",
        r#"{ "components": [
            { "key": "db", "kind": "service" },
            { "key": "metrics", "kind": "service", "enabled": false }
        ] }"#,
    );

    Command::cargo_bin("gantry")?
        .arg("check")
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid (1 components)"));

    Command::cargo_bin("gantry")?
        .arg("run")
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::eq("started db\nstopped db\n"));
    Ok(())
}

#[test]
fn test_run_reports_component_failure() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let manifest = write_manifest(
        &dir,
        "broken.json",
        r#"{ "components": [
            { "key": "db", "kind": "service" },
            { "key": "api", "kind": "service", "dependencies": ["db"],
              "settings": { "fail_on_start": true } }
        ] }"#,
    );

    Command::cargo_bin("gantry")?
        .arg("run")
        .arg(&manifest)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error in component 'api'"))
        .stdout(predicate::str::contains("started").not());
    Ok(())
}

#[test]
fn test_unsupported_manifest_format() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let manifest = write_manifest(&dir, "shop.ini", "key = value");

    Command::cargo_bin("gantry")?
        .arg("order")
        .arg(&manifest)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported manifest format"));
    Ok(())
}
