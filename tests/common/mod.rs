use serde_json::{json, Value};
use solrbridge::{SolrClient, SolrConfig};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A fake Solr listening under `<mock>/solr`.
pub async fn spawn_solr() -> (MockServer, SolrClient) {
    let server = MockServer::start().await;
    let config = SolrConfig::new(format!("{}/solr", server.uri())).unwrap();
    let client = SolrClient::new(config).unwrap();
    (server, client)
}

#[allow(dead_code)]
pub fn ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"responseHeader": {"status": 0, "QTime": 1}}))
}

#[allow(dead_code)]
pub fn solr_error(code: u16, msg: &str) -> ResponseTemplate {
    ResponseTemplate::new(code).set_body_json(json!({
        "responseHeader": {"status": code, "QTime": 0},
        "error": {"msg": msg, "code": code}
    }))
}

#[allow(dead_code)]
pub fn core_status(core: &str, exists: bool) -> Value {
    let entry = if exists {
        json!({"name": core, "instanceDir": format!("/var/solr/data/{}", core)})
    } else {
        json!({})
    };
    let mut status = serde_json::Map::new();
    status.insert(core.to_string(), entry);
    json!({
        "responseHeader": {"status": 0, "QTime": 0},
        "initFailures": {},
        "status": status
    })
}

#[allow(dead_code)]
pub async fn mount_status(server: &MockServer, core: &str, exists: bool) {
    Mock::given(method("GET"))
        .and(path("/solr/admin/cores"))
        .and(query_param("action", "STATUS"))
        .and(query_param("core", core))
        .respond_with(ResponseTemplate::new(200).set_body_json(core_status(core, exists)))
        .mount(server)
        .await;
}
