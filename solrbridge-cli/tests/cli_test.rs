#![allow(deprecated)] // Command::cargo_bin

use assert_cmd::Command;
use predicates::str::contains;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn solrbridge_cmd(migrations: &Path) -> Command {
    let mut cmd = Command::cargo_bin("solrbridge").unwrap();
    cmd.env_remove("SOLR_URL")
        .env_remove("SOLR_TIMEOUT_SECS")
        .env("RUST_LOG", "warn")
        .arg("--migrations-dir")
        .arg(migrations);
    cmd
}

/// Paths printed on stdout, one per generated file.
fn generated(output: &[u8]) -> Vec<PathBuf> {
    String::from_utf8_lossy(output)
        .lines()
        .map(PathBuf::from)
        .collect()
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn create_core_writes_migration_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = solrbridge_cmd(dir.path())
        .args(["create-core", "products"])
        .assert()
        .success()
        .stdout(contains("_create_products_solr_core.json"))
        .get_output()
        .stdout
        .clone();

    let files = generated(&out);
    assert_eq!(files.len(), 1);
    let file = read_json(&files[0]);
    assert_eq!(file["migration"], json!({"kind": "create_core", "core": "products"}));
    assert!(file["created_at"].is_string());
}

#[test]
fn create_fields_parses_field_specs() {
    let dir = tempfile::tempdir().unwrap();
    let out = solrbridge_cmd(dir.path())
        .args([
            "create-fields",
            "products",
            "--field",
            "title:text_general:required",
            "--field",
            "tags:strings:multivalued,!stored",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let file = read_json(&generated(&out)[0]);
    let fields = &file["migration"]["fields"];
    assert_eq!(fields[0]["name"], "title");
    assert_eq!(fields[0]["required"], true);
    assert_eq!(fields[1]["type"], "strings");
    assert_eq!(fields[1]["multiValued"], true);
    assert_eq!(fields[1]["stored"], false);
}

#[test]
fn update_core_names_both_cores() {
    let dir = tempfile::tempdir().unwrap();
    solrbridge_cmd(dir.path())
        .args(["update-core", "old", "new"])
        .assert()
        .success()
        .stdout(contains("_update_old_to_new_solr_core.json"));
}

#[test]
fn rejects_unknown_field_flag() {
    let dir = tempfile::tempdir().unwrap();
    solrbridge_cmd(dir.path())
        .args(["create-fields", "products", "--field", "sku:string:unique"])
        .assert()
        .failure()
        .stderr(contains("Unknown flag 'unique'"));
    assert_eq!(std::fs::read_dir(dir.path()).map_or(0, |d| d.count()), 0);
}

#[test]
fn delete_fields_requires_names() {
    let dir = tempfile::tempdir().unwrap();
    solrbridge_cmd(dir.path())
        .args(["delete-fields", "products"])
        .assert()
        .failure();
}

#[tokio::test(flavor = "multi_thread")]
async fn migrate_and_rollback_against_solr() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/solr/admin/cores"))
        .and(query_param("action", "STATUS"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responseHeader": {"status": 0},
            "status": {"products": {}}
        })))
        .mount(&server)
        .await;
    for action in ["CREATE", "UNLOAD"] {
        Mock::given(path("/solr/admin/cores"))
            .and(query_param("action", action))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "responseHeader": {"status": 0}
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let dir = tempfile::tempdir().unwrap();
    let solr_url = format!("{}/solr", server.uri());
    let out = solrbridge_cmd(dir.path())
        .args(["create-core", "products"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let file = generated(&out).remove(0);

    solrbridge_cmd(dir.path())
        .arg("--solr-url")
        .arg(&solr_url)
        .arg("migrate")
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("Migrated:"));

    solrbridge_cmd(dir.path())
        .arg("--solr-url")
        .arg(&solr_url)
        .arg("rollback")
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("Rolled back:"));
}

#[tokio::test(flavor = "multi_thread")]
async fn migrate_reports_solr_failure() {
    let server = MockServer::start().await;
    Mock::given(path("/solr/admin/cores"))
        .and(query_param("action", "STATUS"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responseHeader": {"status": 0},
            "status": {"products": {"name": "products"}}
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let out = solrbridge_cmd(dir.path())
        .args(["create-core", "products"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let file = generated(&out).remove(0);

    solrbridge_cmd(dir.path())
        .arg("--solr-url")
        .arg(format!("{}/solr", server.uri()))
        .arg("migrate")
        .arg(&file)
        .assert()
        .failure()
        .stderr(contains("already exists"));
}

#[test]
fn remaining_generators_write_expected_plans() {
    let dir = tempfile::tempdir().unwrap();
    let cases: [(&[&str], &str, Value); 3] = [
        (
            &["update-fields", "products", "--field", "price:pdouble"],
            "_update_products_solr_fields.json",
            json!({"kind": "update_fields", "core": "products", "fields": [{
                "name": "price", "type": "pdouble", "required": false,
                "indexed": true, "stored": true, "multiValued": false
            }]}),
        ),
        (
            &["delete-core", "products"],
            "_delete_products_solr_core.json",
            json!({"kind": "delete_core", "core": "products"}),
        ),
        (
            &["delete-fields", "products", "title", "tags"],
            "_delete_fields_from_products_solr_core.json",
            json!({"kind": "delete_fields", "core": "products", "fields": ["title", "tags"]}),
        ),
    ];

    for (args, suffix, expected) in cases {
        let out = solrbridge_cmd(dir.path())
            .args(args)
            .assert()
            .success()
            .stdout(contains(suffix))
            .get_output()
            .stdout
            .clone();
        let file = read_json(&generated(&out)[0]);
        assert_eq!(file["migration"], expected);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn show_fields_prints_core_schema() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/solr/products/schema/fields"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responseHeader": {"status": 0},
            "fields": [
                {"name": "id", "type": "string"},
                {"name": "title", "type": "text_general"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let out = solrbridge_cmd(dir.path())
        .arg("--solr-url")
        .arg(format!("{}/solr", server.uri()))
        .args(["show-fields", "products"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let printed: Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(
        printed,
        json!([
            {"name": "id", "type": "string"},
            {"name": "title", "type": "text_general"}
        ])
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn show_fields_reports_unknown_core() {
    let server = MockServer::start().await;
    Mock::given(path("/solr/ghost/schema/fields"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "responseHeader": {"status": 404},
            "error": {"msg": "Core not found", "code": 404}
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    solrbridge_cmd(dir.path())
        .arg("--solr-url")
        .arg(format!("{}/solr", server.uri()))
        .args(["show-fields", "ghost"])
        .assert()
        .failure()
        .stderr(contains("Core not found"));
}
