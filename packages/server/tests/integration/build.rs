use ::common::fingerprint::asset_path;
use ::common::metadata::MetadataStore;
use ::common::storage::ObjectStore;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{CDN_BUCKET, PRODUCTION_BUCKET, TASK_SECRET, TestApp, episode_yaml, routes};

#[tokio::test]
async fn build_publishes_the_feed_and_advances_the_build_date() {
    let app = TestApp::spawn().await;
    let token = app.token("client-a");
    let guid = app.create_production(&token, "mypodcast").await;
    for (id, season, episode) in [("e2", 1, 2), ("e3", 2, 1)] {
        let res = app
            .post_yaml_with_token(
                &routes::resource(&guid, "episode", id),
                &episode_yaml(&guid, id, season, episode),
                &token,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
    }

    let res = app
        .post_with_token(&routes::build(&guid), &serde_json::json!({}), &token)
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(
        res.body["feed_alias_url"],
        "http://portal.test/s/mypodcast/feed.xml"
    );
    assert_eq!(res.body["feed_url"], format!("http://cdn.test/{guid}/feed.xml"));
    // Seeded episode plus the two above.
    assert_eq!(res.body["episodes"], 3);

    let feed = app
        .store
        .get(CDN_BUCKET, &format!("{guid}/feed.xml"))
        .await
        .unwrap();
    let feed = String::from_utf8(feed).unwrap();
    assert!(feed.contains("<rss version=\"2.0\""));
    let newest = feed.find(">e3</guid>").unwrap();
    let older = feed.find(">e2</guid>").unwrap();
    assert!(newest < older);

    let production = app.metadata.get_production(&guid).await.unwrap().unwrap();
    assert!(production.build_date > 0);
    assert_eq!(production.build_date, res.body["build_date"].as_i64().unwrap());
}

#[tokio::test]
async fn build_with_an_invalid_document_fails_without_publishing() {
    let app = TestApp::spawn().await;
    let token = app.token("client-a");
    let guid = app.create_production(&token, "mypodcast").await;
    let broken = episode_yaml(&guid, "e9", 1, 9).replace("season: \"1\"", "season: \"zero\"");
    app.store
        .put(
            PRODUCTION_BUCKET,
            &format!("{guid}/episode-e9.yaml"),
            broken.as_bytes(),
            "application/x-yaml",
        )
        .await
        .unwrap();

    let res = app
        .post_with_token(&routes::build(&guid), &serde_json::json!({}), &token)
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
    assert!(
        !app.store
            .exists(CDN_BUCKET, &format!("{guid}/feed.xml"))
            .await
            .unwrap()
    );
    let production = app.metadata.get_production(&guid).await.unwrap().unwrap();
    assert_eq!(production.build_date, 0);
}

#[tokio::test]
async fn another_client_cannot_build() {
    let app = TestApp::spawn().await;
    let guid = app.create_production(&app.token("client-a"), "mypodcast").await;

    let res = app
        .post_with_token(
            &routes::build(&guid),
            &serde_json::json!({}),
            &app.token("client-b"),
        )
        .await;

    assert_eq!(res.status, 403);
}

#[tokio::test]
async fn imported_enclosure_is_published_once_committed() {
    let app = TestApp::spawn().await;
    let token = app.token("client-a");
    let guid = app.create_production(&token, "mypodcast").await;
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "audio/mpeg")
                .set_body_bytes(vec![3u8; 512]),
        )
        .mount(&server)
        .await;

    let source = format!("{}/media/e4.mp3", server.uri());
    let yaml = episode_yaml(&guid, "e4", 1, 4).replace(
        &format!("  uri: http://cdn.test/{guid}/e4.mp3\n  rel: external"),
        &format!("  uri: {source}\n  rel: import"),
    );
    let res = app
        .post_yaml_with_token(&routes::resource(&guid, "episode", "e4"), &yaml, &token)
        .await;
    assert_eq!(res.status, 201, "{}", res.text);

    let res = app.build_feed(&token, &guid).await;
    assert_eq!(res.status, 409, "{}", res.text);
    assert_eq!(res.body["code"], "CONFLICT");

    let jobs = app.published_jobs();
    assert_eq!(jobs.len(), 1);
    let payload = serde_json::to_string(&jobs[0]).unwrap();
    let res = app
        .post_task(routes::IMPORT_TASK, &payload, Some(TASK_SECRET))
        .await;
    assert_eq!(res.body["state"], "committed", "{}", res.text);

    let res = app.build_feed(&token, &guid).await;
    assert_eq!(res.status, 200, "{}", res.text);
    let feed = app
        .store
        .get(CDN_BUCKET, &format!("{guid}/feed.xml"))
        .await
        .unwrap();
    let feed = String::from_utf8(feed).unwrap();
    let cdn_url = format!("http://cdn.test/{}", asset_path(&guid, &source));
    assert!(feed.contains(&format!(
        "<enclosure url=\"{cdn_url}\" length=\"512\" type=\"audio/mpeg\"/>"
    )));
    assert!(!feed.contains(&source));
}
