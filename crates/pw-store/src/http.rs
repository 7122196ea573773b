//! HTTP client for a hosted content lake (Sanity-compatible data API).
//!
//! Reads go through `GET /data/query/{dataset}` with a GROQ string, writes
//! through `POST /data/mutate/{dataset}`. A mutate request is atomic on the
//! server, which is what gives batched runs their all-or-nothing behavior.

use crate::error::{StoreError, StoreResult};
use crate::traits::DocumentStore;
use async_trait::async_trait;
use pw_core::{Document, FieldOp, PatchOp, Query, StoreConfig};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;

const API_HOST: &str = "api.sanity.io";
const CDN_HOST: &str = "apicdn.sanity.io";

/// Remote document store over HTTP
pub struct HttpStore {
    config: StoreConfig,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    result: Vec<Value>,
}

impl HttpStore {
    /// Build a client. No request is made until the first fetch or patch.
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                StoreError::ConnectionError(format!("failed to initialize HTTP client: {e}"))
            })?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn base_url(&self, host: &str) -> String {
        format!(
            "https://{}.{}/{}",
            self.config.project_id, host, self.config.api_version
        )
    }

    /// Query endpoint; reads may go through the CDN when configured.
    pub fn query_url(&self) -> String {
        let host = if self.config.use_cdn { CDN_HOST } else { API_HOST };
        format!("{}/data/query/{}", self.base_url(host), self.config.dataset)
    }

    /// Mutations always hit the API host.
    pub fn mutate_url(&self) -> String {
        format!(
            "{}/data/mutate/{}",
            self.base_url(API_HOST),
            self.config.dataset
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a mutation body.
    async fn mutate(&self, body: &Value) -> Result<(), Rejection> {
        let response = self
            .authorized(self.http.post(self.mutate_url()))
            .query(&[("returnIds", "true"), ("visibility", "sync")])
            .json(body)
            .send()
            .await
            .map_err(|e| Rejection {
                status: None,
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await.unwrap_or_default();
        Err(Rejection {
            status: Some(status.as_u16()),
            message: format!("HTTP {}: {}", status.as_u16(), error_message(&text)),
        })
    }
}

/// A mutate request the server (or the transport) refused
#[derive(Debug)]
struct Rejection {
    status: Option<u16>,
    message: String,
}

/// Map a refused single-document patch to a store error.
///
/// A 409 on a guarded patch means `ifRevisionID` no longer matched.
fn patch_error(op: &PatchOp, rejection: Rejection) -> StoreError {
    match (rejection.status, &op.if_revision) {
        (Some(409), Some(expected)) => StoreError::RevisionConflict {
            document_id: op.document_id.to_string(),
            expected: expected.clone(),
            found: format!("a newer revision ({})", rejection.message),
        },
        _ => StoreError::PatchRejected {
            document_id: op.document_id.to_string(),
            message: rejection.message,
        },
    }
}

#[async_trait]
impl DocumentStore for HttpStore {
    async fn fetch(&self, query: &Query) -> StoreResult<Vec<Document>> {
        let groq = query.to_groq();
        log::debug!("GROQ: {groq}");
        if self.config.use_cdn {
            log::warn!("Selecting through the CDN; recently written documents may be stale");
        }

        let response = self
            .authorized(self.http.get(self.query_url()))
            .query(&[("query", groq.as_str()), ("perspective", "raw")])
            .send()
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))?;
        if !status.is_success() {
            return Err(StoreError::QueryError(format!(
                "HTTP {}: {}",
                status.as_u16(),
                error_message(&text)
            )));
        }

        decode_query_response(&text)
    }

    async fn patch(&self, op: &PatchOp) -> StoreResult<()> {
        let transaction_id = uuid::Uuid::new_v4().to_string();
        let body = mutation_body(&transaction_id, std::slice::from_ref(op));
        self.mutate(&body)
            .await
            .map_err(|rejection| patch_error(op, rejection))
    }

    async fn commit(&self, transaction_id: &str, ops: &[PatchOp]) -> StoreResult<()> {
        if ops.is_empty() {
            return Ok(());
        }
        let body = mutation_body(transaction_id, ops);
        self.mutate(&body)
            .await
            .map_err(|rejection| StoreError::TransactionRejected {
                transaction_id: transaction_id.to_string(),
                message: rejection.message,
            })
    }

    fn store_type(&self) -> &'static str {
        "http"
    }
}

/// Build a mutate request body.
///
/// Each PatchOp becomes one or more `patch` mutations: consecutive sets are
/// grouped together and consecutive unsets are grouped together, so the
/// server applies them in the op's original order. The revision guard rides
/// on the first mutation of each document.
pub fn mutation_body(transaction_id: &str, ops: &[PatchOp]) -> Value {
    let mut mutations = Vec::new();

    for op in ops {
        let mut guard = op.if_revision.clone();
        let mut index = 0;
        while index < op.operations.len() {
            let mut patch = Map::new();
            patch.insert("id".to_string(), json!(op.document_id));
            if let Some(rev) = guard.take() {
                patch.insert("ifRevisionID".to_string(), json!(rev));
            }

            match &op.operations[index] {
                FieldOp::Set { .. } => {
                    let mut set = Map::new();
                    while let Some(FieldOp::Set { field, value }) = op.operations.get(index) {
                        set.insert(field.to_string(), value.clone());
                        index += 1;
                    }
                    patch.insert("set".to_string(), Value::Object(set));
                }
                FieldOp::Unset { .. } => {
                    let mut unset = Vec::new();
                    while let Some(FieldOp::Unset { field }) = op.operations.get(index) {
                        unset.push(json!(field));
                        index += 1;
                    }
                    patch.insert("unset".to_string(), Value::Array(unset));
                }
            }

            mutations.push(json!({ "patch": patch }));
        }
    }

    json!({
        "transactionId": transaction_id,
        "mutations": mutations,
    })
}

fn decode_query_response(text: &str) -> StoreResult<Vec<Document>> {
    let response: QueryResponse =
        serde_json::from_str(text).map_err(|e| StoreError::DecodeError(e.to_string()))?;
    response
        .result
        .into_iter()
        .map(|value| Document::from_value(value).map_err(StoreError::from))
        .collect()
}

/// Pull a human-readable message out of an error response body.
fn error_message(text: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(text) else {
        return text.trim().to_string();
    };

    let candidates = [
        value.pointer("/error/description"),
        value.pointer("/message"),
        value.pointer("/error"),
    ];
    let found = candidates
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str().map(str::to_string));
    found.unwrap_or_else(|| text.trim().to_string())
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
