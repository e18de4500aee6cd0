#![allow(dead_code)]

use async_trait::async_trait;
use secrecy::Secret;
use service_core::error::AppError;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tour_service::config::PipelineSettings;
use tour_service::models::{RouteOptions, StoredArtifact};
use tour_service::services::providers::huggingface::{HuggingFaceConfig, HuggingFaceProvider};
use tour_service::services::providers::TextProvider;
use tour_service::services::routing::{GoogleRoutesClient, GoogleRoutesConfig, RouteProvider};
use tour_service::services::{ArtifactPersister, ArtifactStore, Storage, TourPipeline};
use wiremock::MockServer;

pub const CHAT_PATH: &str = "/v1/chat/completions";
pub const ROUTES_PATH: &str = "/directions/v2:computeRoutes";
pub const TEST_MODEL: &str = "test/model";

/// Three placemarks around central Athens, wrapped the way models tend to
/// answer.
pub const THREE_PLACEMARKS: &str = r#"Here is the KML:
```xml
<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <name>Athens</name>
    <Placemark>
      <name>Acropolis</name>
      <Point><coordinates>23.7,37.9,0</coordinates></Point>
    </Placemark>
    <Placemark>
      <name>Plaka</name>
      <Point><coordinates>23.75,37.95,0</coordinates></Point>
    </Placemark>
    <Placemark>
      <name>Syntagma</name>
      <Point><coordinates>23.8,38.0,0</coordinates></Point>
    </Placemark>
  </Document>
</kml>
```"#;

pub const ONE_PLACEMARK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <Placemark>
      <name>Acropolis</name>
      <Point><coordinates>23.7,37.9,0</coordinates></Point>
    </Placemark>
  </Document>
</kml>"#;

/// Placemarks written with a namespace prefix, so the literal
/// `</Placemark>` closing tag never appears.
pub const PREFIXED_PLACEMARKS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2" xmlns:k="http://www.opengis.net/kml/2.2">
  <k:Document>
    <k:Placemark>
      <k:name>Acropolis</k:name>
      <k:Point><k:coordinates>23.7,37.9,0</k:coordinates></k:Point>
    </k:Placemark>
    <k:Placemark>
      <k:name>Plaka</k:name>
      <k:Point><k:coordinates>23.75,37.95,0</k:coordinates></k:Point>
    </k:Placemark>
    <k:Placemark>
      <k:name>Syntagma</k:name>
      <k:Point><k:coordinates>23.8,38.0,0</k:coordinates></k:Point>
    </k:Placemark>
  </k:Document>
</kml>"#;

pub fn chat_reply(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-1",
        "model": TEST_MODEL,
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": content }, "finish_reason": "stop" }
        ],
        "usage": { "prompt_tokens": 10, "completion_tokens": 20 }
    })
}

pub fn routes_reply(coordinates: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "routes": [
            {
                "distanceMeters": 1520,
                "duration": "1200s",
                "polyline": { "geoJsonLinestring": { "type": "LineString", "coordinates": coordinates } }
            }
        ]
    })
}

/// Storage that keeps objects in memory.
#[derive(Default)]
pub struct InMemoryStorage {
    objects: Mutex<Vec<(String, Vec<u8>, String)>>,
    fail: bool,
}

impl InMemoryStorage {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Stored `(key, bytes, content_type)` triples in insertion order.
    pub fn objects(&self) -> Vec<(String, Vec<u8>, String)> {
        self.objects.lock().unwrap().clone()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<String, AppError> {
        if self.fail {
            return Err(AppError::StorageError(anyhow::anyhow!("bucket unavailable")));
        }
        self.objects
            .lock()
            .unwrap()
            .push((key.to_string(), data, content_type.to_string()));
        Ok(format!("https://files.test/{}", key))
    }
}

/// Artifact store that keeps rows in memory.
#[derive(Default)]
pub struct InMemoryArtifactStore {
    rows: Mutex<Vec<StoredArtifact>>,
    healthy: bool,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            healthy: true,
        }
    }

    pub fn unhealthy() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Vec<StoredArtifact> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn insert(&self, url: &str) -> Result<StoredArtifact, AppError> {
        let artifact = StoredArtifact::new(url.to_string());
        self.rows.lock().unwrap().push(artifact.clone());
        Ok(artifact)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        if self.healthy {
            Ok(())
        } else {
            Err(AppError::DatabaseError(anyhow::anyhow!("connection refused")))
        }
    }
}

/// A pipeline wired to in-memory persistence with the given upstreams.
pub struct TestPipeline {
    pub pipeline: TourPipeline,
    pub storage: Arc<InMemoryStorage>,
    pub store: Arc<InMemoryArtifactStore>,
}

impl TestPipeline {
    pub fn new(text_provider: Arc<dyn TextProvider>, route_provider: Arc<dyn RouteProvider>) -> Self {
        Self::with_storage(text_provider, route_provider, InMemoryStorage::default())
    }

    pub fn with_storage(
        text_provider: Arc<dyn TextProvider>,
        route_provider: Arc<dyn RouteProvider>,
        storage: InMemoryStorage,
    ) -> Self {
        let storage = Arc::new(storage);
        let store = Arc::new(InMemoryArtifactStore::new());
        let pipeline = TourPipeline::new(
            text_provider,
            route_provider,
            ArtifactPersister::new(storage.clone(), store.clone()),
            PipelineSettings::default(),
            RouteOptions::default(),
        );

        Self {
            pipeline,
            storage,
            store,
        }
    }

    /// Pipeline talking HTTP to wiremock stubs of both upstream APIs.
    pub fn against(server: &MockServer) -> Self {
        Self::new(hugging_face(server), google_routes(server))
    }

    /// The single stored document as text.
    pub fn stored_document(&self) -> String {
        let objects = self.storage.objects();
        assert_eq!(objects.len(), 1, "expected exactly one stored object");
        String::from_utf8(objects[0].1.clone()).unwrap()
    }
}

pub fn hugging_face(server: &MockServer) -> Arc<dyn TextProvider> {
    Arc::new(
        HuggingFaceProvider::new(HuggingFaceConfig {
            api_url: format!("{}{}", server.uri(), CHAT_PATH),
            api_key: Secret::new("hf-test-key".to_string()),
            model: TEST_MODEL.to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap(),
    )
}

pub fn google_routes(server: &MockServer) -> Arc<dyn RouteProvider> {
    Arc::new(
        GoogleRoutesClient::new(GoogleRoutesConfig {
            api_url: format!("{}{}", server.uri(), ROUTES_PATH),
            api_key: Secret::new("maps-test-key".to_string()),
            timeout: Duration::from_secs(5),
        })
        .unwrap(),
    )
}
