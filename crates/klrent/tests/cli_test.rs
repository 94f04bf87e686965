//! Integration tests for the `klrent` CLI binary.
//!
//! Argument parsing, help output, completions, and error exit codes run
//! without a backend; the catalog tests point the binary at a wiremock
//! server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `klrent` binary with env isolation.
///
/// Clears all `KLRENT_*` env vars and points the config and data
/// directories into `home` so tests never touch the user's real files.
fn klrent_cmd(home: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("klrent");
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env_remove("KLRENT_PROFILE")
        .env_remove("KLRENT_API_URL")
        .env_remove("KLRENT_OUTPUT")
        .env_remove("KLRENT_INSECURE")
        .env_remove("KLRENT_TIMEOUT")
        .env_remove("KLRENT_EMAIL")
        .env_remove("KLRENT_PASSWORD");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

fn vehicle_json(id: u64) -> serde_json::Value {
    json!({
        "id": id,
        "nome": format!("Grupo {id}"),
        "valorLocacao": "120.00",
        "seguroBasico": "10",
        "seguroPlus": "25",
        "estado": "Amazonas",
        "estadoId": 13
    })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = klrent_cmd(&home).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    klrent_cmd(&home).arg("--help").assert().success().stdout(
        predicate::str::contains("KL Rent a Car")
            .and(predicate::str::contains("fleet"))
            .and(predicate::str::contains("quote"))
            .and(predicate::str::contains("reservations")),
    );
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    klrent_cmd(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("klrent"));
}

#[test]
fn test_invalid_subcommand() {
    let home = TempDir::new().unwrap();
    klrent_cmd(&home)
        .arg("teleport")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    klrent_cmd(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let home = TempDir::new().unwrap();
    klrent_cmd(&home)
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("klrent"));
}

// ── Errors without a backend ────────────────────────────────────────

#[test]
fn test_reservations_need_login() {
    let home = TempDir::new().unwrap();
    let output = klrent_cmd(&home)
        .args(["reservations", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("klrent login"));
}

#[test]
fn test_invalid_offer_token() {
    let home = TempDir::new().unwrap();
    klrent_cmd(&home)
        .args(["plans", "not-a-token"])
        .assert()
        .code(2);
}

#[test]
fn test_invalid_pickup_date_is_a_usage_error() {
    let home = TempDir::new().unwrap();
    klrent_cmd(&home)
        .args(["quote", "NC0xMw==", "--pickup", "17/10/2026"])
        .assert()
        .code(2);
}

#[test]
fn test_unknown_profile() {
    let home = TempDir::new().unwrap();
    let output = klrent_cmd(&home)
        .args(["--profile", "nope", "fleet", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("nope"));
}

#[test]
fn test_config_set_then_show() {
    let home = TempDir::new().unwrap();
    klrent_cmd(&home)
        .args(["config", "set", "api_url", "https://api.example.com"])
        .assert()
        .success();
    klrent_cmd(&home)
        .args(["config", "set", "timeout", "12"])
        .assert()
        .success();
    klrent_cmd(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("https://api.example.com")
                .and(predicate::str::contains("timeout")),
        );
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let home = TempDir::new().unwrap();
    klrent_cmd(&home)
        .args(["config", "set", "colour", "red"])
        .assert()
        .code(2);
}

// ── Against a mock portal ───────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_fleet_list_plain_prints_links() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/frota"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([vehicle_json(1), vehicle_json(2)])),
        )
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let mut cmd = klrent_cmd(&home);
    cmd.args(["--api-url", &server.uri(), "-o", "plain", "fleet", "list"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().collect::<Vec<_>>(), vec!["MS0xMw==", "Mi0xMw=="]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fleet_states_and_groups_are_distinct_and_sorted() {
    let server = MockServer::start().await;
    let mut second = vehicle_json(2);
    second["estado"] = json!("Acre");
    Mock::given(method("GET"))
        .and(path("/frota"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([vehicle_json(1), second, vehicle_json(1)])),
        )
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let mut cmd = klrent_cmd(&home);
    cmd.args(["--api-url", &server.uri(), "-o", "plain", "fleet", "states"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().collect::<Vec<_>>(), vec!["Acre", "Amazonas"]);

    let mut cmd = klrent_cmd(&home);
    cmd.args(["--api-url", &server.uri(), "-o", "plain", "fleet", "groups"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().collect::<Vec<_>>(), vec!["Grupo 1", "Grupo 2"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_quote_json_from_friday() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/frota/4"))
        .and(query_param("estado", "13"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vehicle_json(4)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/loja"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "id": 1, "nome": "Centro", "cidade": "Manaus" }])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/planos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "planos": [] })))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let mut cmd = klrent_cmd(&home);
    cmd.args([
        "--api-url",
        &server.uri(),
        "-o",
        "json",
        "quote",
        "NC0xMw==",
        "--today",
        "2026-10-16",
    ]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let quote: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(quote["pickup"], "2026-10-17");
    assert_eq!(quote["return"], "2026-10-19");
    assert_eq!(quote["billable_days"], 2);
    assert_eq!(quote["store"], "Centro");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_register_from_file_fills_blank_address_from_cep() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ws/69005010/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "logradouro": "Rua Saldanha Marinho",
            "bairro": "Centro",
            "localidade": "Manaus",
            "uf": "AM"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/clientes"))
        .and(body_partial_json(json!({
            "cep_cli": "69005010",
            "endereco_rua_cli": "Rua Saldanha Marinho",
            "bairro_cli": "Centro",
            "cidade_cli": "Manaus",
            "endereco_uf_cli": "AM"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 77,
            "nome_cli": "Ana Souza",
            "cpf_cli": "12345678901"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let form = home.path().join("form.json");
    std::fs::write(
        &form,
        json!({
            "kind": "individual",
            "document": "123.456.789-01",
            "full_name": "Ana Souza",
            "licence_number": "01234567890",
            "licence_state": "AM",
            "licence_expiry": "15/08/2030",
            "cep": "69005-010",
            "street": "",
            "number": "42",
            "district": "",
            "city": "",
            "state": "",
            "password": "segredo1",
            "password_confirmation": "segredo1"
        })
        .to_string(),
    )
    .unwrap();

    klrent_cmd(&home)
        .args(["config", "set", "cep_url", &server.uri()])
        .assert()
        .success();

    let mut cmd = klrent_cmd(&home);
    cmd.args(["--api-url", &server.uri(), "--yes", "-o", "plain", "register", "individual"])
        .arg("--from-file")
        .arg(&form);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "77");
}

#[test]
fn test_backend_down_is_a_connection_error() {
    // Bind then release a port so nothing is listening on it.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let home = TempDir::new().unwrap();
    let output = klrent_cmd(&home)
        .args(["--api-url", &format!("http://127.0.0.1:{port}"), "fleet", "categories"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7), "{}", combined_output(&output));
}
