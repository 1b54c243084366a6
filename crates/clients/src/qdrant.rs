//! Qdrant vector index client over the REST API.
//!
//! Implements [`VectorIndex`] against a fixed Qdrant instance. Points are
//! keyed by chunk UUID and carry the `docId`/`chunkId`/`chunkIndex`
//! payload the retrieval pipeline resolves chunk text from.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use querydeck_core::error::IndexError;
use querydeck_core::{IndexPoint, PointPayload, ScoredPoint, VectorIndex};

/// REST client for a Qdrant instance.
pub struct QdrantHttpIndex {
    base_url: String,
    client: reqwest::Client,
}

impl QdrantHttpIndex {
    /// Create a new Qdrant client for the given base URL
    /// (e.g., `http://qdrant:6333`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    async fn collection_exists(&self, collection: &str) -> Result<bool, IndexError> {
        let url = format!("{}/collections/{}", self.base_url, collection);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| IndexError::Unavailable(e.to_string()))?;

        match response.status().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(IndexError::Api {
                    status_code: status,
                    message: body,
                })
            }
        }
    }
}

// ── Wire types ────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct UpsertRequest {
    points: Vec<ApiPoint>,
}

#[derive(Serialize)]
struct ApiPoint {
    id: String,
    vector: Vec<f32>,
    payload: PointPayload,
}

#[derive(Deserialize)]
struct QueryResponse {
    result: QueryResult,
}

#[derive(Deserialize)]
struct QueryResult {
    #[serde(default)]
    points: Vec<ApiScoredPoint>,
}

#[derive(Deserialize)]
struct ApiScoredPoint {
    id: serde_json::Value,
    score: f32,
    #[serde(default)]
    payload: ApiPayload,
    #[serde(default)]
    vector: Option<Vec<f32>>,
}

#[derive(Deserialize, Default)]
struct ApiPayload {
    #[serde(rename = "docId", default = "unknown")]
    doc_id: String,

    #[serde(rename = "chunkId", default = "unknown")]
    chunk_id: String,

    #[serde(rename = "chunkIndex", default)]
    chunk_index: u64,
}

fn unknown() -> String {
    "unknown".into()
}

/// Point ids come back as either strings (UUIDs) or integers.
fn point_id_to_string(id: &serde_json::Value) -> String {
    match id {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ── VectorIndex ───────────────────────────────────────────────────────────

#[async_trait]
impl VectorIndex for QdrantHttpIndex {
    async fn ensure_collection(
        &self,
        collection: &str,
        dimension: usize,
    ) -> Result<(), IndexError> {
        if self.collection_exists(collection).await? {
            debug!(collection, "collection already exists");
            return Ok(());
        }

        let url = format!("{}/collections/{}", self.base_url, collection);
        let body = json!({
            "vectors": { "size": dimension, "distance": "Dot" }
        });

        let response = self
            .client
            .put(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| IndexError::Unavailable(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            warn!(collection, status, "collection creation failed");
            return Err(IndexError::Api {
                status_code: status,
                message: body,
            });
        }

        info!(collection, dimension, "created collection");
        Ok(())
    }

    async fn upsert(&self, collection: &str, points: Vec<IndexPoint>) -> Result<(), IndexError> {
        if points.is_empty() {
            return Ok(());
        }

        // The collection's dimension follows the first batch written to it.
        self.ensure_collection(collection, points[0].vector.len())
            .await?;

        let url = format!("{}/collections/{}/points?wait=true", self.base_url, collection);
        let request = UpsertRequest {
            points: points
                .into_iter()
                .map(|p| ApiPoint {
                    id: p.id,
                    vector: p.vector,
                    payload: p.payload,
                })
                .collect(),
        };

        let response = self
            .client
            .put(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| IndexError::Unavailable(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(IndexError::Api {
                status_code: status,
                message: body,
            });
        }

        debug!(collection, "upserted points");
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        query_vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredPoint>, IndexError> {
        let url = format!("{}/collections/{}/points/query", self.base_url, collection);
        let body = json!({
            "query": query_vector,
            "limit": top_k,
            "with_payload": true,
            "with_vector": true,
        });

        debug!(collection, top_k, "querying collection");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| IndexError::Unavailable(e.to_string()))?;

        let status = response.status().as_u16();
        if status == 404 {
            return Err(IndexError::CollectionMissing(collection.to_string()));
        }
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(IndexError::Api {
                status_code: status,
                message: body,
            });
        }

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| IndexError::MalformedResponse(e.to_string()))?;

        if parsed.result.points.is_empty() {
            warn!(collection, "no results found for the given query");
        } else {
            info!(collection, count = parsed.result.points.len(), "retrieved results");
        }

        Ok(parsed
            .result
            .points
            .into_iter()
            .map(|p| ScoredPoint {
                id: point_id_to_string(&p.id),
                score: p.score,
                payload: PointPayload {
                    doc_id: p.payload.doc_id,
                    chunk_id: p.payload.chunk_id,
                    chunk_index: p.payload.chunk_index,
                },
                vector: p.vector,
            })
            .collect())
    }

    async fn delete_by_filter(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<(), IndexError> {
        let url = format!("{}/collections/{}/points/delete", self.base_url, collection);
        let body = json!({
            "filter": {
                "must": [ { "key": field, "match": { "value": value } } ]
            }
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| IndexError::Unavailable(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(IndexError::Api {
                status_code: status,
                message: body,
            });
        }

        info!(collection, field, value, "deleted points by filter");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scored_point_parses_with_string_id() {
        let json = r#"{
            "id": "8e64cd43-6ee1-4b5a-9d1e-000000000001",
            "score": 0.91,
            "payload": {"docId": "d1", "chunkId": "c1", "chunkIndex": 3},
            "vector": [0.1, 0.2]
        }"#;
        let point: ApiScoredPoint = serde_json::from_str(json).unwrap();
        assert_eq!(point_id_to_string(&point.id), "8e64cd43-6ee1-4b5a-9d1e-000000000001");
        assert_eq!(point.payload.chunk_index, 3);
        assert_eq!(point.vector.as_deref(), Some(&[0.1, 0.2][..]));
    }

    #[test]
    fn scored_point_defaults_missing_payload() {
        let json = r#"{"id": 7, "score": 0.5}"#;
        let point: ApiScoredPoint = serde_json::from_str(json).unwrap();
        assert_eq!(point_id_to_string(&point.id), "7");
        assert_eq!(point.payload.doc_id, "unknown");
        assert_eq!(point.payload.chunk_id, "unknown");
        assert!(point.vector.is_none());
    }

    #[test]
    fn upsert_request_uses_payload_wire_names() {
        let request = UpsertRequest {
            points: vec![ApiPoint {
                id: "c1".into(),
                vector: vec![1.0],
                payload: PointPayload {
                    doc_id: "d1".into(),
                    chunk_id: "c1".into(),
                    chunk_index: 0,
                },
            }],
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"docId\":\"d1\""));
        assert!(json.contains("\"chunkIndex\":0"));
    }
}
