use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ::common::ImportJob;
use ::common::config::EndpointConfig;
use ::common::metadata::{SeaOrmMetadataStore, init_db};
use ::common::notify::{ChannelNotifier, OperatorReport};
use ::common::storage::FilesystemObjectStore;
use mq::{ImportPublisher, MqError};
use reqwest::Client;
use serde_json::Value;
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;

use server::config::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, MqAppConfig, ServerConfig,
    StorageAppConfig,
};
use server::state::AppState;
use server::extractors::auth::TASK_TOKEN_HEADER;
use server::utils::jwt;

pub const JWT_SECRET: &str = "test-secret-for-integration-tests";
pub const TASK_SECRET: &str = "test-task-secret";
pub const PRODUCTION_BUCKET: &str = "production.test";
pub const CDN_BUCKET: &str = "cdn.test";

pub mod routes {
    pub const PRODUCTIONS: &str = "/api/v1/productions";
    pub const IMPORT_TASK: &str = "/api/_t/import";

    pub fn production(guid: &str) -> String {
        format!("/api/v1/productions/{guid}")
    }

    pub fn build(guid: &str) -> String {
        format!("/api/v1/productions/{guid}/build")
    }

    pub fn resource(guid: &str, kind: &str, id: &str) -> String {
        format!("/api/v1/productions/{guid}/{kind}/{id}")
    }
}

/// Collects import jobs instead of sending them to a queue.
#[derive(Default)]
pub struct RecordingPublisher {
    pub jobs: Mutex<Vec<ImportJob>>,
}

#[async_trait]
impl ImportPublisher for RecordingPublisher {
    async fn publish_import(&self, job: &ImportJob) -> Result<(), MqError> {
        self.jobs.lock().unwrap().push(job.clone());
        Ok(())
    }
}

/// A running test server.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub store: Arc<FilesystemObjectStore>,
    pub metadata: Arc<SeaOrmMetadataStore>,
    pub publisher: Arc<RecordingPublisher>,
    reports: UnboundedReceiver<OperatorReport>,
    _dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = Arc::new(
            FilesystemObjectStore::new(dir.path().to_path_buf())
                .await
                .expect("Failed to create object store"),
        );
        let db = init_db("sqlite::memory:")
            .await
            .expect("Failed to initialize database");
        let metadata = Arc::new(SeaOrmMetadataStore::new(db));
        let publisher = Arc::new(RecordingPublisher::default());
        let (notifier, reports) = ChannelNotifier::new();

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig::default(),
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
            },
            auth: AuthConfig {
                jwt_secret: JWT_SECRET.to_string(),
                task_secret: Some(TASK_SECRET.to_string()),
            },
            storage: StorageAppConfig {
                root: dir.path().to_path_buf(),
                production_bucket: PRODUCTION_BUCKET.to_string(),
                cdn_bucket: CDN_BUCKET.to_string(),
                ..Default::default()
            },
            endpoints: EndpointConfig {
                portal: "http://portal.test".to_string(),
                cdn: "http://cdn.test".to_string(),
                ..Default::default()
            },
            mq: MqAppConfig {
                enabled: false,
                ..Default::default()
            },
        };

        let state = AppState::new(
            app_config,
            store.clone(),
            metadata.clone(),
            Arc::new(notifier),
            Some(publisher.clone() as Arc<dyn ImportPublisher>),
            Client::new(),
        );

        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            store,
            metadata,
            publisher,
            reports,
            _dir: dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// A token for `client_id`, signed with the server's secret.
    pub fn token(&self, client_id: &str) -> String {
        jwt::sign(client_id, JWT_SECRET).expect("Failed to sign token")
    }

    /// Operator reports received so far.
    pub fn drain_reports(&mut self) -> Vec<OperatorReport> {
        let mut reports = Vec::new();
        while let Ok(report) = self.reports.try_recv() {
            reports.push(report);
        }
        reports
    }

    pub fn published_jobs(&self) -> Vec<ImportJob> {
        self.publisher.jobs.lock().unwrap().clone()
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    /// POST a raw JSON body to a task route, presenting `task_token` when given.
    pub async fn post_task(&self, path: &str, body: &str, task_token: Option<&str>) -> TestResponse {
        let mut req = self
            .client
            .post(self.url(path))
            .header("Content-Type", "application/json");
        if let Some(token) = task_token {
            req = req.header(TASK_TOKEN_HEADER, token);
        }
        let res = req
            .body(body.to_string())
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_yaml_with_token(&self, path: &str, yaml: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", "application/x-yaml")
            .body(yaml.to_string())
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn put_yaml_with_token(&self, path: &str, yaml: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", "application/x-yaml")
            .body(yaml.to_string())
            .send()
            .await
            .expect("Failed to send PUT request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    /// Build a production's feed via the API.
    pub async fn build_feed(&self, token: &str, guid: &str) -> TestResponse {
        self.post_with_token(&routes::build(guid), &serde_json::json!({}), token)
            .await
    }

    /// Create a production via the API and return its GUID.
    pub async fn create_production(&self, token: &str, name: &str) -> String {
        let res = self
            .post_with_token(
                routes::PRODUCTIONS,
                &serde_json::json!({
                    "name": name,
                    "title": format!("{name} title"),
                    "summary": format!("{name} summary"),
                }),
                token,
            )
            .await;
        assert_eq!(res.status, 201, "create_production failed: {}", res.text);
        res.body["guid"]
            .as_str()
            .expect("response body should contain 'guid'")
            .to_string()
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }
}

/// An episode document for `parent`, valid unless edited.
pub fn episode_yaml(parent: &str, guid: &str, season: u32, episode: u32) -> String {
    format!(
        r#"apiVersion: v1
kind: episode
metadata:
  name: episode{episode}
  labels:
    guid: {guid}
    parent: {parent}
    date: "Tue, 10 Sep 2024 08:00:00 +0000"
    season: "{season}"
    episode: "{episode}"
    explicit: "no"
    type: Full
    block: "no"
description:
  title: Episode {season}x{episode}
  summary: Notes for {guid}
  link:
    uri: http://portal.test/s/show/{guid}
  duration: 1200
image:
  uri: http://cdn.test/{parent}/{guid}/cover.png
  rel: external
enclosure:
  uri: http://cdn.test/{parent}/{guid}.mp3
  rel: external
  type: audio/mpeg
  size: 1024
"#
    )
}
