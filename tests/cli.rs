//! End-to-end tests of the command line binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn idm_rest(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("idm-rest").expect("binary is built");
    cmd.arg("--config-dir")
        .arg(config_dir.path())
        .env_remove("IDM_REST_TOKEN");
    cmd
}

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("idm-rest")
        .expect("binary is built")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("auth"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("user"))
        .stdout(predicate::str::contains("group"));
}

#[test]
fn test_config_set_then_show() {
    let dir = TempDir::new().expect("temp dir");

    idm_rest(&dir)
        .args(["config", "set", "url", "https://sso.example.test"])
        .assert()
        .success();
    idm_rest(&dir)
        .args(["config", "set", "provider", "keycloak"])
        .assert()
        .success();
    idm_rest(&dir)
        .args(["config", "set", "realm", "corp"])
        .assert()
        .success();

    assert!(dir.path().join("config.toml").exists());

    idm_rest(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Default Profile: default"))
        .stdout(predicate::str::contains("URL: https://sso.example.test"))
        .stdout(predicate::str::contains("Provider: keycloak"))
        .stdout(predicate::str::contains("Realm: corp"));
}

#[test]
fn test_config_set_rejects_bad_url() {
    let dir = TempDir::new().expect("temp dir");

    idm_rest(&dir)
        .args(["config", "set", "url", "not a url"])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_partial_window_fails() {
    let dir = TempDir::new().expect("temp dir");

    idm_rest(&dir)
        .args(["config", "set", "url", "http://127.0.0.1:9"])
        .assert()
        .success();

    idm_rest(&dir)
        .args(["--token", "t0k3n", "user", "search", "--start", "10"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("--start and --count"));
}

#[test]
fn test_unknown_profile_fails() {
    let dir = TempDir::new().expect("temp dir");

    idm_rest(&dir)
        .args(["--profile", "ghost", "--token", "t0k3n", "user", "search"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("ghost"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_user_search_json_against_keycloak() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/realms/corp/users"))
        .and(query_param("first", "0"))
        .and(query_param("max", "2"))
        .and(header("authorization", "Bearer t0k3n"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "1", "username": "fred"},
            {"id": "2", "username": "wilma"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    let url = server.uri();

    let output = tokio::task::spawn_blocking(move || {
        for (key, value) in [("url", url.as_str()), ("provider", "keycloak"), ("realm", "corp")] {
            idm_rest(&dir)
                .args(["config", "set", key, value])
                .assert()
                .success();
        }
        idm_rest(&dir)
            .args([
                "--token", "t0k3n", "user", "search", "--start", "0", "--count", "2", "--json",
            ])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone()
    })
    .await
    .expect("blocking task completes");

    let page: serde_json::Value = serde_json::from_slice(&output).expect("stdout is JSON");
    assert_eq!(page["items"], json!(-1));
    assert_eq!(page["resources"][0]["username"], json!("fred"));
    assert_eq!(page["resources"][1]["username"], json!("wilma"));
}
