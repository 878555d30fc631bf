//! GraphQL-over-HTTP client for the admin API
//!
//! Thin async wrapper around reqwest: posts `{ query, variables }` with the
//! bearer token, unwraps the `data` / `errors` envelope, and keeps a small
//! result cache that mutations invalidate by root field.

pub mod cache;
pub mod connection;
pub mod error;
pub mod operations;

pub use cache::{CacheKey, QueryCache};
pub use connection::{Connection, PageArgs, Pager};
pub use error::ClientError;
pub use operations::{ListOperation, Operation, OperationKind};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::ApiConfig;

#[derive(Debug, Serialize)]
struct GraphqlRequest<'a, V> {
    query: &'a str,
    #[serde(rename = "operationName")]
    operation_name: &'a str,
    variables: &'a V,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphqlErrorEntry>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorEntry {
    message: String,
    #[serde(default)]
    extensions: Option<Value>,
}

impl GraphqlErrorEntry {
    fn is_unauthenticated(&self) -> bool {
        self.extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .and_then(Value::as_str)
            .map(|code| code == "UNAUTHENTICATED" || code == "FORBIDDEN")
            .unwrap_or(false)
    }
}

/// Unwrap a raw response body and pull out `data.<root>`
fn decode_root(body: &str, root: &'static str) -> Result<Value, ClientError> {
    let response: GraphqlResponse = serde_json::from_str(body)?;

    if let Some(errors) = response.errors.filter(|e| !e.is_empty()) {
        if errors.iter().any(GraphqlErrorEntry::is_unauthenticated) {
            return Err(ClientError::Unauthorized);
        }
        return Err(ClientError::Graphql(
            errors.into_iter().map(|e| e.message).collect(),
        ));
    }

    match response.data {
        Some(Value::Object(mut map)) => map.remove(root).ok_or(ClientError::MissingData(root)),
        _ => Err(ClientError::MissingData(root)),
    }
}

/// Async client; cheap to clone, clones share the cache
#[derive(Clone)]
pub struct GraphqlClient {
    http: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    cache: Arc<Mutex<QueryCache>>,
}

impl GraphqlClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Network(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(endpoint = %config.url, "GraphQL client ready");

        Ok(Self {
            http,
            endpoint: config.url.clone(),
            token: config.token.clone(),
            cache: Arc::new(Mutex::new(QueryCache::new())),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run `op` and decode `data.<op.root>` into `D`
    pub async fn execute<V, D>(&self, op: &Operation, variables: &V) -> Result<D, ClientError>
    where
        V: Serialize,
        D: DeserializeOwned,
    {
        let value = self.execute_raw(op, variables).await?;
        serde_json::from_value(value).map_err(ClientError::from)
    }

    /// Like `execute` but served from the cache when possible
    pub async fn execute_cached<V, D>(
        &self,
        op: &'static Operation,
        variables: &V,
    ) -> Result<D, ClientError>
    where
        V: Serialize,
        D: DeserializeOwned,
    {
        let key = CacheKey::new(op.root, serde_json::to_string(variables)?);

        let cached = self.with_cache(|cache| cache.get(&key).cloned());
        if let Some(value) = cached {
            tracing::trace!(operation = op.name, "Cache hit");
            return serde_json::from_value(value).map_err(ClientError::from);
        }

        let value = self.execute_raw(op, variables).await?;
        self.with_cache(|cache| cache.insert(key, value.clone()));
        serde_json::from_value(value).map_err(ClientError::from)
    }

    /// Fetch one page of a list operation
    pub async fn list<L: ListOperation>(
        &self,
        page: &PageArgs,
    ) -> Result<Connection<L::Node>, ClientError> {
        self.execute_cached(L::OPERATION, page).await
    }

    /// Drop cached results for `root` (also done automatically after mutations)
    pub fn evict(&self, root: &str) {
        self.with_cache(|cache| {
            cache.evict(root);
        });
    }

    fn with_cache<R>(&self, f: impl FnOnce(&mut QueryCache) -> R) -> R {
        // Poisoned map is still consistent
        let mut guard = match self.cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }

    async fn execute_raw<V: Serialize>(
        &self,
        op: &Operation,
        variables: &V,
    ) -> Result<Value, ClientError> {
        let body = GraphqlRequest {
            query: op.document,
            operation_name: op.name,
            variables,
        };

        let mut request = self.http.post(&self.endpoint).json(&body);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        tracing::debug!(operation = op.name, "Sending GraphQL request");

        let response = request.send().await?;
        let status = response.status();

        if status.as_u16() == 401 || status.as_u16() == 403 {
            tracing::warn!(operation = op.name, status = status.as_u16(), "Request rejected");
            return Err(ClientError::Unauthorized);
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(operation = op.name, status = status.as_u16(), "Request failed");
            return Err(ClientError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await?;
        let value = decode_root(&text, op.root)?;

        if op.kind == OperationKind::Mutation {
            for root in op.evicts {
                self.evict(root);
            }
        }

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Customer;

    fn decode_response<D: DeserializeOwned>(body: &str, root: &'static str) -> Result<D, ClientError> {
        let value = decode_root(body, root)?;
        serde_json::from_value(value).map_err(ClientError::from)
    }

    #[test]
    fn decodes_root_field() {
        let body = r#"{
            "data": {
                "customers": {
                    "edges": [{
                        "cursor": "c1",
                        "node": {
                            "customerId": "c-1",
                            "email": "a@b.c",
                            "status": "ACTIVE",
                            "createdAt": "2025-01-01T00:00:00Z"
                        }
                    }],
                    "pageInfo": { "hasNextPage": false, "endCursor": "c1" }
                }
            }
        }"#;
        let page: Connection<Customer> = decode_response(body, "customers").unwrap();
        assert_eq!(page.edges.len(), 1);
        assert_eq!(page.edges[0].node.email, "a@b.c");
        assert!(!page.page_info.has_next_page);
    }

    #[test]
    fn errors_surface_messages() {
        let body = r#"{
            "data": null,
            "errors": [{ "message": "withdrawal already confirmed" }, { "message": "second" }]
        }"#;
        let err = decode_response::<Value>(body, "withdrawalConfirm").unwrap_err();
        assert_eq!(
            err,
            ClientError::Graphql(vec![
                "withdrawal already confirmed".to_string(),
                "second".to_string()
            ])
        );
        assert_eq!(err.summary(), "withdrawal already confirmed");
    }

    #[test]
    fn unauthenticated_code_maps_to_unauthorized() {
        let body = r#"{ "errors": [{ "message": "nope", "extensions": { "code": "UNAUTHENTICATED" } }] }"#;
        assert_eq!(
            decode_response::<Value>(body, "me").unwrap_err(),
            ClientError::Unauthorized
        );
    }

    #[test]
    fn missing_root_is_reported() {
        let body = r#"{ "data": { "other": 1 } }"#;
        assert_eq!(
            decode_response::<Value>(body, "me").unwrap_err(),
            ClientError::MissingData("me")
        );
    }

    #[test]
    fn null_root_decodes_into_option() {
        let body = r#"{ "data": { "creditFacility": null } }"#;
        let detail: operations::CreditFacilityResult =
            decode_response(body, "creditFacility").unwrap();
        assert!(detail.is_none());
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        assert!(matches!(
            decode_response::<Value>("<html>", "me"),
            Err(ClientError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn evict_through_client_clears_shared_cache() {
        let config = ApiConfig::default();
        let client = GraphqlClient::new(&config).unwrap();
        let clone = client.clone();

        client.with_cache(|c| c.insert(CacheKey::new("withdrawals", ""), Value::Null));
        client.with_cache(|c| c.insert(CacheKey::new("committees", ""), Value::Null));
        clone.evict("withdrawals");

        assert_eq!(client.with_cache(|c| c.len()), 1);
    }
}
