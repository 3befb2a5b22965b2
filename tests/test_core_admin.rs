mod common;

use common::{mount_status, ok, solr_error, spawn_solr};
use serde_json::json;
use solrbridge::{CoreAdmin, SolrError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_core_exists_true() {
    let (server, client) = spawn_solr().await;
    mount_status(&server, "products", true).await;

    assert!(CoreAdmin::new(client).core_exists("products").await);
}

#[tokio::test]
async fn test_core_exists_false_for_empty_status_entry() {
    let (server, client) = spawn_solr().await;
    mount_status(&server, "products", false).await;

    assert!(!CoreAdmin::new(client).core_exists("products").await);
}

#[tokio::test]
async fn test_core_exists_false_when_solr_unreachable() {
    let (server, client) = spawn_solr().await;
    drop(server);

    assert!(!CoreAdmin::new(client).core_exists("products").await);
}

#[tokio::test]
async fn test_create_core() {
    let (server, client) = spawn_solr().await;
    mount_status(&server, "products", false).await;
    Mock::given(method("GET"))
        .and(path("/solr/admin/cores"))
        .and(query_param("action", "CREATE"))
        .and(query_param("name", "products"))
        .and(query_param("configSet", "_default"))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    CoreAdmin::new(client).create_core("products").await.unwrap();
}

#[tokio::test]
async fn test_create_core_already_exists() {
    let (server, client) = spawn_solr().await;
    mount_status(&server, "products", true).await;
    Mock::given(query_param("action", "CREATE"))
        .respond_with(ok())
        .expect(0)
        .mount(&server)
        .await;

    let err = CoreAdmin::new(client)
        .create_core("products")
        .await
        .unwrap_err();
    assert!(matches!(err, SolrError::CoreExists(_)));
    assert_eq!(err.to_string(), "Core 'products' already exists in Solr.");
}

#[tokio::test]
async fn test_create_core_failure_carries_solr_message() {
    let (server, client) = spawn_solr().await;
    mount_status(&server, "products", false).await;
    Mock::given(query_param("action", "CREATE"))
        .respond_with(solr_error(400, "Can't find resource 'solrconfig.xml'"))
        .mount(&server)
        .await;

    let err = CoreAdmin::new(client)
        .create_core("products")
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Failed to create core 'products'. Can't find resource 'solrconfig.xml'"
    );
}

#[tokio::test]
async fn test_create_core_if_not_exists_skips_existing() {
    let (server, client) = spawn_solr().await;
    mount_status(&server, "products", true).await;
    Mock::given(query_param("action", "CREATE"))
        .respond_with(ok())
        .expect(0)
        .mount(&server)
        .await;

    assert!(CoreAdmin::new(client)
        .create_core_if_not_exists("products")
        .await
        .unwrap());
}

#[tokio::test]
async fn test_create_core_if_not_exists_creates() {
    let (server, client) = spawn_solr().await;
    mount_status(&server, "products", false).await;
    Mock::given(query_param("action", "CREATE"))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    assert!(CoreAdmin::new(client)
        .create_core_if_not_exists("products")
        .await
        .unwrap());
}

#[tokio::test]
async fn test_rename_core() {
    let (server, client) = spawn_solr().await;
    mount_status(&server, "oldCore", true).await;
    Mock::given(method("GET"))
        .and(path("/solr/admin/cores"))
        .and(query_param("action", "RENAME"))
        .and(query_param("core", "oldCore"))
        .and(query_param("other", "newCore"))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    CoreAdmin::new(client)
        .rename_core("oldCore", "newCore")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_rename_missing_core() {
    let (server, client) = spawn_solr().await;
    mount_status(&server, "oldCore", false).await;

    let err = CoreAdmin::new(client)
        .rename_core("oldCore", "newCore")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Core 'oldCore' does not exist in Solr.");
}

#[tokio::test]
async fn test_delete_core_returns_decoded_body() {
    let (server, client) = spawn_solr().await;
    Mock::given(method("GET"))
        .and(path("/solr/admin/cores"))
        .and(query_param("action", "UNLOAD"))
        .and(query_param("core", "testCore"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"responseHeader": {"status": 0}})))
        .expect(1)
        .mount(&server)
        .await;

    let body = CoreAdmin::new(client).delete_core("testCore").await.unwrap();
    assert_eq!(body, json!({"responseHeader": {"status": 0}}));
}

#[tokio::test]
async fn test_delete_core_empty_response() {
    let (server, client) = spawn_solr().await;
    Mock::given(query_param("action", "UNLOAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = CoreAdmin::new(client)
        .delete_core("testCore")
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Empty response received while deleting core 'testCore'."
    );
}

#[tokio::test]
async fn test_delete_core_invalid_json() {
    let (server, client) = spawn_solr().await;
    Mock::given(query_param("action", "UNLOAD"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = CoreAdmin::new(client)
        .delete_core("testCore")
        .await
        .unwrap_err();
    assert!(matches!(err, SolrError::Decode(msg) if msg.contains("Invalid JSON response")));
}

#[tokio::test]
async fn test_delete_unknown_core() {
    let (server, client) = spawn_solr().await;
    Mock::given(query_param("action", "UNLOAD"))
        .respond_with(solr_error(400, "Cannot unload non-existent core [ghost]"))
        .mount(&server)
        .await;

    let err = CoreAdmin::new(client).delete_core("ghost").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Failed to delete core 'ghost'. Cannot unload non-existent core [ghost]"
    );
}
