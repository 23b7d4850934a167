//! End-to-end flows through a [`Session`] over real HTTP: read-through
//! caching, synchronous and asynchronous creation, and task promotion.

use machina_client::Session;
use machina_protocol::{BinarySizedValue, DiskCreate, DiskModify, ImageCreate, TaskState};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn disk_json(uid: &str, name: &str, gigabytes: u64) -> serde_json::Value {
    json!({
        "uid": uid,
        "name": name,
        "path": format!("/var/lib/machina/disks/{uid}.qcow2"),
        "size": { "value": gigabytes, "scale": "Gigabytes" },
        "disk_format": "qcow2"
    })
}

#[tokio::test]
async fn get_after_list_never_touches_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/disks/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [disk_json("0", "root", 10), disk_json("1", "data", 50)]
        })))
        .expect(1)
        .mount(&server)
        .await;
    // No mock for GET /api/disks/0: a fetch would 404.

    let session = Session::connect(server.uri());
    let listed = session.disks.list().await.expect("list");
    assert_eq!(listed.len(), 2);

    let disk = session.disks.get("0").await.expect("get");
    assert_eq!(disk.name, "root");
    assert_eq!(disk.size, BinarySizedValue::gigabytes(10));
}

#[tokio::test]
async fn synchronous_create_lands_in_the_cache() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/disks/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(disk_json("7", "scratch", 4)))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::connect(server.uri());
    let created = session
        .disks
        .create(DiskCreate::new("scratch", BinarySizedValue::gigabytes(4)))
        .await
        .expect("create");
    assert_eq!(created.uid, "7");
    assert!(session.disks.cached("7").is_some());
    assert_eq!(session.disks.pending_len(), 0);
}

#[tokio::test]
async fn modify_updates_the_cached_record() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/disks/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(disk_json("7", "renamed", 8)))
        .mount(&server)
        .await;

    let session = Session::connect(server.uri());
    let updated = session
        .disks
        .modify(
            "7",
            DiskModify {
                name: "renamed".into(),
                size: BinarySizedValue::gigabytes(8),
            },
        )
        .await
        .expect("modify");
    assert_eq!(updated.name, "renamed");
    assert_eq!(
        session.disks.cached("7").expect("cached").size,
        BinarySizedValue::gigabytes(8)
    );
}

#[tokio::test]
async fn asynchronous_create_is_promoted_when_the_task_finishes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/images/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "uid": "task-1",
            "name": "download image",
            "relation": "images",
            "state": "running",
            "msg": "downloading",
            "percent_complete": 0
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/task-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uid": "task-1",
            "name": "download image",
            "relation": "images",
            "state": "done",
            "msg": "downloaded",
            "percent_complete": 100,
            "outcome": { "uid": "img-9" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/images/img-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uid": "img-9",
            "name": "ubuntu-noble",
            "path": "/var/lib/machina/images/ubuntu-noble.qcow2",
            "url": "https://cloud-images.example/noble.img",
            "min_vcpu": 1,
            "min_ram": { "value": 1, "scale": "Gigabytes" },
            "min_disk": { "value": 4, "scale": "Gigabytes" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::connect(server.uri());
    let task = session
        .images
        .create(ImageCreate::new(
            "ubuntu-noble",
            "https://cloud-images.example/noble.img",
        ))
        .await
        .expect("create");
    assert_eq!(task.state, TaskState::Running);
    assert_eq!(session.images.pending_len(), 1);
    assert!(session.images.is_empty());

    let done = session.tasks.refresh("task-1").await.expect("refresh");
    assert_eq!(done.state, TaskState::Done);

    session.promote(&done).await.expect("promote");
    assert_eq!(session.images.pending_len(), 0);
    let image = session.images.cached("img-9").expect("promoted");
    assert_eq!(image.name, "ubuntu-noble");
}

#[tokio::test]
async fn failed_remove_leaves_the_cache_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/disks/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [disk_json("0", "root", 10)]
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/disks/0"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": 400,
            "msg": "disk is attached to an instance",
            "kind": "invariant-violation"
        })))
        .mount(&server)
        .await;

    let session = Session::connect(server.uri());
    session.disks.list().await.expect("list");
    session.disks.remove("0").await.expect_err("refused");
    assert!(session.disks.cached("0").is_some());
}
