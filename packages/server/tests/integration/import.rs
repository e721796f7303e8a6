use ::common::fingerprint::{asset_name, asset_path};
use ::common::metadata::MetadataStore;
use ::common::storage::ObjectStore;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{CDN_BUCKET, TASK_SECRET, TestApp, routes};

async fn media_server(body: Vec<u8>) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/ep1.mp3"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "audio/mpeg")
                .set_body_bytes(body),
        )
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn import_task_stores_the_asset_and_records_it() {
    let app = TestApp::spawn().await;
    let body = vec![7u8; 2048];
    let server = media_server(body.clone()).await;

    let source = format!("{}/media/ep1.mp3", server.uri());
    let dest = asset_path("g1", &source);
    let payload = json!({"source": source, "dest": dest}).to_string();
    let res = app
        .post_task(routes::IMPORT_TASK, &payload, Some(TASK_SECRET))
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["state"], "committed");
    assert_eq!(app.store.get(CDN_BUCKET, &dest).await.unwrap(), body);

    let record = app
        .metadata
        .get_asset("g1", &asset_name("g1", &source))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.size, 2048);
    assert_eq!(record.content_type, "audio/mpeg");
}

#[tokio::test]
async fn failed_import_is_acknowledged_and_reported() {
    let mut app = TestApp::spawn().await;
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let source = format!("{}/missing.mp3", server.uri());
    let payload = json!({"source": source, "dest": asset_path("g1", &source)}).to_string();
    let res = app
        .post_task(routes::IMPORT_TASK, &payload, Some(TASK_SECRET))
        .await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["state"], "failed");
    let reports = app.drain_reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].context, "import");
    assert!(app.metadata.list_assets("g1").await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_import_task_is_acknowledged_and_reported() {
    let mut app = TestApp::spawn().await;

    let res = app
        .post_task(routes::IMPORT_TASK, "{not json", Some(TASK_SECRET))
        .await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["state"], "failed");
    assert_eq!(app.drain_reports().len(), 1);
}

#[tokio::test]
async fn import_task_requires_the_task_token() {
    let app = TestApp::spawn().await;
    let server = media_server(vec![1u8; 64]).await;
    let source = format!("{}/media/ep1.mp3", server.uri());
    let payload = json!({"source": source, "dest": asset_path("g1", &source)}).to_string();

    let res = app.post_task(routes::IMPORT_TASK, &payload, None).await;
    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_MISSING");

    let res = app
        .post_task(routes::IMPORT_TASK, &payload, Some("not-the-secret"))
        .await;
    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_INVALID");

    // A client token is not a task token.
    let res = app
        .post_with_token(
            routes::IMPORT_TASK,
            &json!({"source": source, "dest": asset_path("g1", &source)}),
            &app.token("client-a"),
        )
        .await;
    assert_eq!(res.status, 401);

    assert!(app.metadata.list_assets("g1").await.unwrap().is_empty());
    assert!(!app.store.exists(CDN_BUCKET, &asset_path("g1", &source)).await.unwrap());
}

#[tokio::test]
async fn import_task_cannot_overwrite_a_published_feed() {
    let mut app = TestApp::spawn().await;
    let token = app.token("client-a");
    let guid = app.create_production(&token, "mypodcast").await;
    let res = app.build_feed(&token, &guid).await;
    assert_eq!(res.status, 200, "{}", res.text);

    let feed_path = format!("{guid}/feed.xml");
    let published = app.store.get(CDN_BUCKET, &feed_path).await.unwrap();
    let server = media_server(b"<rss>hijacked</rss>".to_vec()).await;
    let source = format!("{}/media/ep1.mp3", server.uri());
    let payload = json!({"source": source, "dest": feed_path}).to_string();

    let res = app.post_task(routes::IMPORT_TASK, &payload, None).await;
    assert_eq!(res.status, 401);

    let res = app
        .post_task(routes::IMPORT_TASK, &payload, Some(TASK_SECRET))
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["state"], "failed");
    assert_eq!(app.drain_reports().len(), 1);

    assert_eq!(app.store.get(CDN_BUCKET, &feed_path).await.unwrap(), published);
    assert!(app.metadata.list_assets(&guid).await.unwrap().is_empty());
}
