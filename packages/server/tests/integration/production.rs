use serde_json::json;

use crate::common::{PRODUCTION_BUCKET, TestApp, routes};

mod creation {
    use super::*;
    use ::common::storage::ObjectStore;

    #[tokio::test]
    async fn owner_can_create_a_production_with_seeded_documents() {
        let app = TestApp::spawn().await;
        let token = app.token("client-a");

        let res = app
            .post_with_token(
                routes::PRODUCTIONS,
                &json!({"name": "  MyPodcast ", "title": "My Podcast", "summary": "About"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["name"], "mypodcast");
        assert_eq!(res.body["owner"], "client-a");
        assert_eq!(res.body["build_date"], 0);

        let guid = res.body["guid"].as_str().unwrap();
        assert!(
            app.store
                .exists(PRODUCTION_BUCKET, &format!("{guid}/show-{guid}.yaml"))
                .await
                .unwrap()
        );
        assert!(
            app.store
                .exists(PRODUCTION_BUCKET, &format!("{guid}/episode-{guid}.yaml"))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn cannot_create_a_production_with_a_taken_name() {
        let app = TestApp::spawn().await;
        app.create_production(&app.token("client-a"), "mypodcast").await;

        let res = app
            .post_with_token(
                routes::PRODUCTIONS,
                &json!({"name": "MYPODCAST"}),
                &app.token("client-b"),
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn cannot_create_a_production_with_an_invalid_name() {
        let app = TestApp::spawn().await;

        let res = app
            .post_with_token(
                routes::PRODUCTIONS,
                &json!({"name": "my podcast!"}),
                &app.token("client-a"),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn creating_requires_a_token() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::PRODUCTIONS, &json!({"name": "mypodcast"}))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn a_garbage_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_with_token(routes::PRODUCTIONS, &json!({"name": "mypodcast"}), "not-a-jwt")
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }
}

mod lookup {
    use super::*;

    #[tokio::test]
    async fn list_only_returns_own_productions() {
        let app = TestApp::spawn().await;
        let alice = app.token("client-a");
        app.create_production(&alice, "beta").await;
        app.create_production(&alice, "alpha").await;
        app.create_production(&app.token("client-b"), "other").await;

        let res = app.get_with_token(routes::PRODUCTIONS, &alice).await;

        assert_eq!(res.status, 200);
        let names: Vec<_> = res.body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["alpha", "beta"]);
    }

    #[tokio::test]
    async fn owner_can_fetch_a_production() {
        let app = TestApp::spawn().await;
        let token = app.token("client-a");
        let guid = app.create_production(&token, "mypodcast").await;

        let res = app.get_with_token(&routes::production(&guid), &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["guid"], guid.as_str());
        assert_eq!(res.body["title"], "mypodcast title");
    }

    #[tokio::test]
    async fn another_client_cannot_fetch_a_production() {
        let app = TestApp::spawn().await;
        let guid = app.create_production(&app.token("client-a"), "mypodcast").await;

        let res = app
            .get_with_token(&routes::production(&guid), &app.token("client-b"))
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn unknown_production_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .get_with_token(&routes::production("nope"), &app.token("client-a"))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}
