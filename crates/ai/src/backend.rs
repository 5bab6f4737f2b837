//! Generation transports: the opaque service boundary and its implementations.

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};

use crate::error::GenerationError;
use crate::schema::GenerationRequest;

/// Opaque transport to the generative model.
///
/// Implementations return the raw structured response; parsing and schema
/// validation happen in [`crate::client::GenerationClient`].
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn infer(&self, request: &GenerationRequest<'_>) -> Result<JsonValue, GenerationError>;
}

#[async_trait]
impl<B: GenerationBackend + ?Sized> GenerationBackend for Box<B> {
    async fn infer(&self, request: &GenerationRequest<'_>) -> Result<JsonValue, GenerationError> {
        (**self).infer(request).await
    }
}

/// HTTP transport: POSTs the request JSON to a configured endpoint.
pub struct HttpGenerationBackend {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpGenerationBackend {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_api_key(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: Some(api_key.into()),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl GenerationBackend for HttpGenerationBackend {
    async fn infer(&self, request: &GenerationRequest<'_>) -> Result<JsonValue, GenerationError> {
        let mut req = self.client.post(&self.endpoint).json(request);
        if let Some(api_key) = &self.api_key {
            req = req.bearer_auth(api_key);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| GenerationError::backend(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(GenerationError::backend(format!(
                "service returned {}: {}",
                status.as_u16(),
                resp.text().await.unwrap_or_default()
            )));
        }

        resp.json::<JsonValue>()
            .await
            .map_err(|e| GenerationError::malformed(e.to_string()))
    }
}

/// Keyword → (item name, tags, unit volume) used by the offline backend.
const CANNED_ITEMS: &[(&str, &str, &[&str], f64)] = &[
    ("sofa", "Sofa", &["living room", "furniture"], 70.0),
    ("couch", "Sofa", &["living room", "furniture"], 70.0),
    ("bed", "Queen bed", &["bedroom", "furniture"], 65.0),
    ("nightstand", "Nightstand", &["bedroom", "furniture"], 8.0),
    ("dresser", "Dresser", &["bedroom", "furniture"], 30.0),
    ("table", "Dining table", &["dining room", "furniture"], 40.0),
    ("chair", "Chair", &["furniture"], 5.0),
    ("desk", "Desk", &["office", "furniture"], 35.0),
    ("bookshelf", "Bookshelf", &["furniture"], 20.0),
    ("tv", "Television", &["electronics", "fragile"], 15.0),
    ("television", "Television", &["electronics", "fragile"], 15.0),
    ("fridge", "Refrigerator", &["kitchen", "appliance"], 60.0),
    ("refrigerator", "Refrigerator", &["kitchen", "appliance"], 60.0),
    ("washer", "Washer", &["appliance"], 25.0),
    ("bike", "Bicycle", &["garage"], 15.0),
    ("lamp", "Floor lamp", &["fragile"], 6.0),
    ("box", "Moving box (medium)", &["boxes"], 3.0),
];

/// Offline deterministic backend.
///
/// Derives a small plausible inventory from keywords in the description so
/// the application can be driven end-to-end without service credentials.
/// The total is emitted as a bare number, matching the sloppiest output the
/// real service produces.
#[derive(Debug, Default, Clone, Copy)]
pub struct CannedGenerationBackend;

impl CannedGenerationBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl GenerationBackend for CannedGenerationBackend {
    async fn infer(&self, request: &GenerationRequest<'_>) -> Result<JsonValue, GenerationError> {
        let lower = request.description.to_lowercase();

        let mut items: Vec<(&str, &[&str], f64)> = Vec::new();
        let mut total = 0.0;
        for (keyword, name, tags, volume) in CANNED_ITEMS {
            if !lower.contains(keyword) || items.iter().any(|(n, ..)| n == name) {
                continue;
            }
            items.push((*name, *tags, *volume));
            total += volume;
        }

        if items.is_empty() {
            const FALLBACK_TAGS: &[&str] = &["boxes"];
            items.push(("Moving box (medium)", FALLBACK_TAGS, 3.0));
            total = 3.0;
        }

        let inventory: Vec<JsonValue> = items
            .iter()
            .map(|(name, tags, volume)| {
                json!({
                    "name": name,
                    "count": 1,
                    "description": format!("{name} mentioned in the walkthrough"),
                    "tags": tags,
                    "estimatedSize": format!("approx. {volume} cubic feet"),
                })
            })
            .collect();

        Ok(json!({
            "inventory": inventory,
            "transcript": format!("Simulated walkthrough: {}", request.description),
            "totalEstimatedSize": format!("{total}"),
        }))
    }
}
