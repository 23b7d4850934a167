//! HTTP-level behavior of the reqwest gateway: URL shapes, fault
//! classification from real responses, empty-body handling.

use machina_client::{ApiError, HttpGateway, RestGateway};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn list_hits_the_collection_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/disks/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "entries": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = HttpGateway::new(server.uri());
    let raw = gateway.list("disks").await.expect("list");
    assert_eq!(raw, json!({ "entries": [] }));
}

#[tokio::test]
async fn trailing_slashes_in_the_base_url_are_tolerated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/networks/0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "uid": "0", "name": "default", "kind": "shared" })),
        )
        .mount(&server)
        .await;

    let gateway = HttpGateway::new(format!("{}//", server.uri()));
    let raw = gateway.fetch("networks", "0").await.expect("fetch");
    assert_eq!(raw["name"], "default");
}

#[tokio::test]
async fn fault_body_discriminator_decides_the_error_kind() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/disks/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": 404,
            "msg": "no disk with uid missing",
            "kind": "not-found"
        })))
        .mount(&server)
        .await;

    let gateway = HttpGateway::new(server.uri());
    let err = gateway.fetch("disks", "missing").await.expect_err("fault");
    assert_eq!(
        err,
        ApiError::NotFound {
            status: 404,
            msg: "no disk with uid missing".into()
        }
    );
}

#[tokio::test]
async fn invariant_violations_survive_the_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/disks/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": 400,
            "msg": "disk size must be positive",
            "kind": "invariant-violation"
        })))
        .mount(&server)
        .await;

    let gateway = HttpGateway::new(server.uri());
    let err = gateway
        .create("disks", json!({ "name": "bad" }))
        .await
        .expect_err("fault");
    assert_eq!(
        err,
        ApiError::InvariantViolation {
            status: 400,
            msg: "disk size must be positive".into()
        }
    );
}

#[tokio::test]
async fn non_json_failure_bodies_become_service_faults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/instances/"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let gateway = HttpGateway::new(server.uri());
    let err = gateway.list("instances").await.expect_err("fault");
    assert_eq!(
        err,
        ApiError::Service {
            status: 502,
            msg: "bad gateway".into()
        }
    );
}

#[tokio::test]
async fn delete_accepts_an_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/identities/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = HttpGateway::new(server.uri());
    gateway.remove("identities", "3").await.expect("remove");
}

#[tokio::test]
async fn modify_sends_the_payload_as_json() {
    let server = MockServer::start().await;
    let payload = json!({ "name": "renamed", "size": { "value": 4, "scale": "Gigabytes" } });
    Mock::given(method("PUT"))
        .and(path("/api/disks/0"))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uid": "0",
            "name": "renamed",
            "size": { "value": 4, "scale": "Gigabytes" },
            "disk_format": "qcow2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = HttpGateway::new(server.uri());
    let raw = gateway.modify("disks", "0", payload).await.expect("modify");
    assert_eq!(raw["name"], "renamed");
}
