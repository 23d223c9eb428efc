//! Integration tests for corpus index commands

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const COOKBOOK: &str = "\
Minestrone Soup
Serves 4
Ingredients: beans, celery, tomato
Simmer everything for an hour.

Falafel Wrap
Ingredients: chickpeas, parsley, flatbread
Blend, fry, wrap.
";

fn ladle_cmd(workspace: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ladle").unwrap();
    cmd.env("LADLE_WORKSPACE", workspace.path());
    cmd.env_remove("LADLE_CONFIG");
    cmd.env_remove("LADLE_PROVIDER");
    cmd.env_remove("LADLE_MODEL");
    cmd
}

#[test]
fn test_help_runs() {
    Command::cargo_bin("ladle")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("recipe"));
}

#[test]
fn test_corpus_learn_and_stats() {
    let workspace = TempDir::new().unwrap();
    let cookbook = workspace.path().join("cookbook.txt");
    fs::write(&cookbook, COOKBOOK).unwrap();

    ladle_cmd(&workspace)
        .arg("corpus")
        .arg("learn")
        .arg(&cookbook)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 chunks"));

    ladle_cmd(&workspace)
        .arg("corpus")
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 sources, 2 chunks"));
}

#[test]
fn test_corpus_learn_missing_source_fails() {
    let workspace = TempDir::new().unwrap();

    ladle_cmd(&workspace)
        .arg("corpus")
        .arg("learn")
        .arg(workspace.path().join("no-such-cookbook.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_corpus_stats_unbuilt_index() {
    let workspace = TempDir::new().unwrap();

    ladle_cmd(&workspace)
        .arg("corpus")
        .arg("stats")
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"chunksCount\": 0"));
}

#[test]
fn test_corpus_clean() {
    let workspace = TempDir::new().unwrap();
    let cookbook = workspace.path().join("cookbook.txt");
    fs::write(&cookbook, COOKBOOK).unwrap();

    ladle_cmd(&workspace)
        .arg("corpus")
        .arg("learn")
        .arg(&cookbook)
        .assert()
        .success();

    ladle_cmd(&workspace)
        .arg("corpus")
        .arg("clean")
        .assert()
        .success()
        .stdout(predicate::str::contains("removed"));

    ladle_cmd(&workspace)
        .arg("corpus")
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 sources, 0 chunks"));
}

#[test]
fn test_query_without_catalog_key_is_config_error() {
    let workspace = TempDir::new().unwrap();

    ladle_cmd(&workspace)
        .env_remove("CATALOG_API_KEY")
        .arg("query")
        .arg("chicken soup")
        .assert()
        .failure()
        .stderr(predicate::str::contains("CATALOG_API_KEY"));
}
