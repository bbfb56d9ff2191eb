//! End-to-end CLI tests for the harvester binary.

use std::path::Path;
use std::process::Output;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

mod support;
use support::socket_guard::start_mock_server_or_skip;

/// Binary command isolated from the user's config and log settings.
fn harvester(config_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("harvester").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home).env_remove("RUST_LOG");
    cmd
}

fn write_config(config_home: &Path, contents: &str) {
    let dir = config_home.join("harvester");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), contents).unwrap();
}

fn crossref_page(range: std::ops::Range<usize>, total: u64) -> Value {
    let items: Vec<Value> = range
        .map(|i| {
            json!({
                "DOI": format!("10.4242/cli.{i}"),
                "title": [format!("CLI Paper {i}")],
                "is-referenced-by-count": i,
                "type": "journal-article"
            })
        })
        .collect();
    json!({"message": {"total-results": total, "items": items}})
}

async fn run_blocking(mut cmd: Command) -> Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

#[test]
fn test_binary_help_displays_usage() {
    let tempdir = TempDir::new().unwrap();
    harvester(tempdir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Harvest bibliographic records"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("metrics"));
}

#[test]
fn test_binary_version_displays_version() {
    let tempdir = TempDir::new().unwrap();
    harvester(tempdir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("harvester"));
}

#[test]
fn test_binary_without_subcommand_fails() {
    let tempdir = TempDir::new().unwrap();
    harvester(tempdir.path()).assert().failure();
}

#[test]
fn test_binary_invalid_flag_returns_error() {
    let tempdir = TempDir::new().unwrap();
    harvester(tempdir.path())
        .args(["search", "x", "--invalid-flag"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_metrics_command_prints_indices() {
    let tempdir = TempDir::new().unwrap();
    harvester(tempdir.path())
        .args(["metrics", "10", "8", "5", "4", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("h_index         = 4"))
        .stdout(predicate::str::contains("g_index         = 5"))
        .stdout(predicate::str::contains("total_citations = 30"));
}

#[test]
fn test_metrics_command_json() {
    let tempdir = TempDir::new().unwrap();
    let output = harvester(tempdir.path())
        .args(["metrics", "--json", "3", "0", "6", "1", "5"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let metrics: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(metrics["h_index"], 3);
    assert_eq!(metrics["total_publications"], 5);
}

#[test]
fn test_config_show_without_file() {
    let tempdir = TempDir::new().unwrap();
    harvester(tempdir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config_path"))
        .stdout(predicate::str::contains("not found (using defaults)"))
        .stdout(predicate::str::contains("provider = crossref"))
        .stdout(predicate::str::contains("max_results = 100"));
}

#[test]
fn test_config_show_reads_file() {
    let tempdir = TempDir::new().unwrap();
    write_config(
        tempdir.path(),
        "provider = \"openalex\"\nmax_results = 40\nverbosity = \"quiet\"\n",
    );
    harvester(tempdir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config_file = loaded"))
        .stdout(predicate::str::contains("provider = openalex"))
        .stdout(predicate::str::contains("max_results = 40"))
        .stdout(predicate::str::contains("verbosity = quiet"));
}

#[test]
fn test_invalid_config_fails_with_key_name() {
    let tempdir = TempDir::new().unwrap();
    write_config(tempdir.path(), "max_results = 9000\n");
    harvester(tempdir.path())
        .args(["config", "show"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("max_results"));
}

#[test]
fn test_search_without_terms_fails() {
    let tempdir = TempDir::new().unwrap();
    harvester(tempdir.path())
        .args(["search", "--open-access"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("A search query is required"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_search_json_output_against_mock_provider() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/works"))
        .and(query_param("query.title", "parsers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(crossref_page(0..3, 3)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let tempdir = TempDir::new().unwrap();
    let mut cmd = harvester(tempdir.path());
    cmd.args([
        "-q",
        "search",
        "parsers",
        "--field",
        "title",
        "--format",
        "json",
        "--base-url",
        mock_server.uri().as_str(),
    ]);
    let output = run_blocking(cmd).await;

    assert_eq!(output.status.code(), Some(0));
    let records: Value = serde_json::from_slice(&output.stdout).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["doi"], "10.4242/cli.0");
    assert_eq!(records[0]["source"], "CrossRef");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_search_min_citations_post_filter() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/works"))
        .respond_with(ResponseTemplate::new(200).set_body_json(crossref_page(0..5, 5)))
        .mount(&mock_server)
        .await;

    let tempdir = TempDir::new().unwrap();
    let mut cmd = harvester(tempdir.path());
    cmd.args([
        "-q",
        "search",
        "x",
        "--min-citations",
        "3",
        "--format",
        "json",
        "--base-url",
        mock_server.uri().as_str(),
    ]);
    let output = run_blocking(cmd).await;

    assert_eq!(output.status.code(), Some(0));
    let records: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(records.as_array().unwrap().len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_search_partial_failure_exits_two_and_keeps_results() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/works"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(crossref_page(0..100, 400)))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/works"))
        .and(query_param("offset", "100"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let tempdir = TempDir::new().unwrap();
    write_config(tempdir.path(), "crossref_page_delay_ms = 0\n");
    let mut cmd = harvester(tempdir.path());
    cmd.args([
        "-q",
        "search",
        "x",
        "--max-results",
        "400",
        "--base-url",
        mock_server.uri().as_str(),
    ]);
    let output = run_blocking(cmd).await;

    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("CLI Paper 0"));
    assert!(stdout.contains("CLI Paper 99"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_search_failure_with_nothing_collected_exits_one() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/works"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let tempdir = TempDir::new().unwrap();
    let mut cmd = harvester(tempdir.path());
    cmd.args(["-q", "search", "x", "--base-url", mock_server.uri().as_str()]);
    let output = run_blocking(cmd).await;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Harvest failed"), "stderr: {stderr}");
    assert!(stderr.contains("404"), "stderr: {stderr}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_search_dublin_core_output_file_and_metrics() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/works"))
        .respond_with(ResponseTemplate::new(200).set_body_json(crossref_page(1..4, 3)))
        .mount(&mock_server)
        .await;

    let tempdir = TempDir::new().unwrap();
    let output_path = tempdir.path().join("records.json");
    let mut cmd = harvester(tempdir.path());
    cmd.args([
        "-q",
        "search",
        "x",
        "--format",
        "dublin-core",
        "--metrics",
        "--base-url",
        mock_server.uri().as_str(),
        "--output",
    ])
    .arg(&output_path);
    let output = run_blocking(cmd).await;

    assert_eq!(output.status.code(), Some(0));
    let written: Value =
        serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(written.as_array().unwrap().len(), 3);
    assert_eq!(written[0]["dc:identifier"], "https://doi.org/10.4242/cli.1");
    assert_eq!(written[0]["dc:type"], "Text");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("h_index         = 2"), "stdout: {stdout}");
}
