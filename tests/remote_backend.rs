use std::time::Duration;

use mockito::Matcher;
use serde_json::json;
use svctrack::backend::{Backend, RemoteDocumentBackend};
use svctrack::config::RemoteConfig;
use svctrack::store::RecordStore;

const KEY_HEADER: &str = "X-Master-Key";

fn stored_document() -> String {
    json!({
        "record": {
            "technicians": [
                {"id": 1, "name": "Alice", "phone": "555", "email": "a@x"}
            ],
            "tasks": []
        },
        "metadata": {"id": "b1", "private": true}
    })
    .to_string()
}

fn backend_for(server: &mockito::Server) -> RemoteDocumentBackend {
    RemoteDocumentBackend::new(format!("{}/b/1", server.url()), Duration::from_secs(5))
        .with_api_key(KEY_HEADER, "secret")
}

#[test]
fn reads_unwrap_record_envelope() {
    let mut server = mockito::Server::new();
    let get = server
        .mock("GET", "/b/1")
        .match_header(KEY_HEADER, "secret")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(stored_document())
        .create();

    let technicians = backend_for(&server).read_technicians().unwrap();
    assert_eq!(technicians.len(), 1);
    assert_eq!(technicians[0].name, "Alice");
    get.assert();
}

#[test]
fn create_task_puts_whole_document_with_key() {
    let mut server = mockito::Server::new();
    // create_task reads the tasks, then the write fetches again before PUT.
    let get = server
        .mock("GET", "/b/1")
        .match_header(KEY_HEADER, "secret")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(stored_document())
        .expect(2)
        .create();
    let put = server
        .mock("PUT", "/b/1")
        .match_header(KEY_HEADER, "secret")
        .match_body(Matcher::PartialJson(json!({
            "technicians": [{"id": 1, "name": "Alice", "phone": "555", "email": "a@x"}],
            "tasks": [{"id": 1, "technician_id": 1, "description": "Fix printer", "done": false}]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .create();

    let store = RecordStore::new(backend_for(&server));
    let task = store.create_task(1, "Fix printer").unwrap();
    assert_eq!(task.id, 1);

    get.assert();
    put.assert();
}

#[test]
fn rejected_put_is_a_backend_error() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/b/1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"technicians": [], "tasks": []}"#)
        .create();
    server
        .mock("PUT", "/b/1")
        .with_status(500)
        .with_body("boom")
        .create();

    let store = RecordStore::new(backend_for(&server));
    let err = store.upsert_technician("Bob", "", "").unwrap_err();
    assert!(err.is_backend());
}

#[test]
fn api_key_comes_from_configured_env_var() {
    let mut server = mockito::Server::new();
    let get = server
        .mock("GET", "/b/1")
        .match_header("X-Access-Key", "from-env")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"technicians": [], "tasks": []}"#)
        .create();

    std::env::set_var("SVCTRACK_REMOTE_TEST_KEY", "from-env");
    let config = RemoteConfig {
        url: Some(format!("{}/b/1", server.url())),
        api_key_header: Some("X-Access-Key".to_string()),
        api_key_env: Some("SVCTRACK_REMOTE_TEST_KEY".to_string()),
        timeout_secs: 5,
    };
    let backend = RemoteDocumentBackend::from_config(&config).unwrap();

    assert!(backend.read_tasks().unwrap().is_empty());
    get.assert();
}
