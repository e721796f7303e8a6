use ::common::fingerprint::asset_path;
use ::common::storage::ObjectStore;

use crate::common::{PRODUCTION_BUCKET, TestApp, episode_yaml, routes};

#[tokio::test]
async fn owner_can_create_and_read_back_an_episode() {
    let app = TestApp::spawn().await;
    let token = app.token("client-a");
    let guid = app.create_production(&token, "mypodcast").await;

    let res = app
        .post_yaml_with_token(
            &routes::resource(&guid, "episode", "e2"),
            &episode_yaml(&guid, "e2", 1, 2),
            &token,
        )
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["path"], format!("{guid}/episode-e2.yaml"));
    assert_eq!(res.body["kind"], "episode");
    assert!(res.body["imports"].as_array().unwrap().is_empty());

    let res = app
        .get_with_token(&routes::resource(&guid, "episode", "e2"), &token)
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["description"]["title"], "Episode 1x2");
    assert_eq!(res.body["metadata"]["labels"]["season"], "1");
}

#[tokio::test]
async fn creating_an_existing_document_conflicts_unless_forced() {
    let app = TestApp::spawn().await;
    let token = app.token("client-a");
    let guid = app.create_production(&token, "mypodcast").await;
    let path = routes::resource(&guid, "episode", "e2");

    let first = app
        .post_yaml_with_token(&path, &episode_yaml(&guid, "e2", 1, 2), &token)
        .await;
    assert_eq!(first.status, 201, "{}", first.text);

    let res = app
        .post_yaml_with_token(&path, &episode_yaml(&guid, "e2", 1, 3), &token)
        .await;
    assert_eq!(res.status, 409);
    assert_eq!(res.body["code"], "CONFLICT");

    let res = app
        .post_yaml_with_token(
            &format!("{path}?force=true"),
            &episode_yaml(&guid, "e2", 1, 3),
            &token,
        )
        .await;
    assert_eq!(res.status, 201, "{}", res.text);

    let stored = app.get_with_token(&path, &token).await;
    assert_eq!(stored.body["metadata"]["labels"]["episode"], "3");
}

#[tokio::test]
async fn updating_a_missing_document_is_not_found_unless_forced() {
    let app = TestApp::spawn().await;
    let token = app.token("client-a");
    let guid = app.create_production(&token, "mypodcast").await;
    let path = routes::resource(&guid, "episode", "e2");

    let res = app
        .put_yaml_with_token(&path, &episode_yaml(&guid, "e2", 1, 2), &token)
        .await;
    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
    assert!(
        !app.store
            .exists(PRODUCTION_BUCKET, &format!("{guid}/episode-e2.yaml"))
            .await
            .unwrap()
    );

    let res = app
        .put_yaml_with_token(
            &format!("{path}?force=true"),
            &episode_yaml(&guid, "e2", 1, 2),
            &token,
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.text);
}

#[tokio::test]
async fn invalid_document_lists_every_violation_and_is_not_written() {
    let app = TestApp::spawn().await;
    let token = app.token("client-a");
    let guid = app.create_production(&token, "mypodcast").await;
    let yaml = episode_yaml(&guid, "e2", 1, 2)
        .replace("season: \"1\"", "season: \"0\"")
        .replace("type: audio/mpeg", "type: \"\"");

    let res = app
        .post_yaml_with_token(&routes::resource(&guid, "episode", "e2"), &yaml, &token)
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
    let message = res.body["message"].as_str().unwrap();
    assert!(message.contains("metadata.labels.season"), "{message}");
    assert!(message.contains("enclosure.type"), "{message}");
    assert!(
        !app.store
            .exists(PRODUCTION_BUCKET, &format!("{guid}/episode-e2.yaml"))
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn unsupported_kind_is_rejected() {
    let app = TestApp::spawn().await;
    let token = app.token("client-a");
    let guid = app.create_production(&token, "mypodcast").await;
    let yaml = episode_yaml(&guid, "e2", 1, 2).replace("kind: episode", "kind: podcast");

    let res = app
        .post_yaml_with_token(&routes::resource(&guid, "episode", "e2"), &yaml, &token)
        .await;

    assert_eq!(res.status, 400);
    assert!(res.body["message"].as_str().unwrap().contains("podcast"));
}

#[tokio::test]
async fn document_identity_must_match_the_path() {
    let app = TestApp::spawn().await;
    let token = app.token("client-a");
    let guid = app.create_production(&token, "mypodcast").await;

    let res = app
        .post_yaml_with_token(
            &routes::resource(&guid, "episode", "other"),
            &episode_yaml(&guid, "e2", 1, 2),
            &token,
        )
        .await;
    assert_eq!(res.status, 400);

    let res = app
        .post_yaml_with_token(
            &routes::resource(&guid, "episode", "e2"),
            &episode_yaml("someone-else", "e2", 1, 2),
            &token,
        )
        .await;
    assert_eq!(res.status, 400);
}

#[tokio::test]
async fn another_client_cannot_write_documents() {
    let app = TestApp::spawn().await;
    let guid = app.create_production(&app.token("client-a"), "mypodcast").await;

    let res = app
        .post_yaml_with_token(
            &routes::resource(&guid, "episode", "e2"),
            &episode_yaml(&guid, "e2", 1, 2),
            &app.token("client-b"),
        )
        .await;

    assert_eq!(res.status, 403);
    assert_eq!(res.body["code"], "PERMISSION_DENIED");
}

#[tokio::test]
async fn imported_enclosure_is_queued() {
    let app = TestApp::spawn().await;
    let token = app.token("client-a");
    let guid = app.create_production(&token, "mypodcast").await;
    let source = format!("http://cdn.test/{guid}/e2.mp3");
    let yaml = episode_yaml(&guid, "e2", 1, 2).replace(
        "  rel: external\n  type: audio/mpeg",
        "  rel: import\n  type: audio/mpeg",
    );

    let res = app
        .post_yaml_with_token(&routes::resource(&guid, "episode", "e2"), &yaml, &token)
        .await;
    assert_eq!(res.status, 201, "{}", res.text);

    let jobs = app.published_jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].source, source);
    assert_eq!(jobs[0].dest, asset_path(&guid, &source));
    assert_eq!(res.body["imports"][0], jobs[0].dest.as_str());
}
