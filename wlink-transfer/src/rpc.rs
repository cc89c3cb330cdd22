//! JSON-RPC transport.
//!
//! Providers only see [`RpcClient::request`]; endpoint selection and API
//! keys belong to whoever builds the client.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// A JSON-RPC 2.0 endpoint.
#[async_trait]
pub trait RpcClient: Send + Sync {
    /// Call `method` with `params` and return the `result` member.
    ///
    /// A `null` result is returned as [`Value::Null`]; callers decide whether
    /// that means "not found".
    ///
    /// # Errors
    ///
    /// [`Error::Network`] if the endpoint is unreachable and [`Error::Rpc`] if
    /// it answers with an error object.
    async fn request(&self, method: &str, params: Value) -> Result<Value>;
}

#[async_trait]
impl<T: RpcClient + ?Sized> RpcClient for std::sync::Arc<T> {
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        (**self).request(method, params).await
    }
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Value,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// [`RpcClient`] over HTTPS POST.
#[derive(Debug)]
pub struct HttpRpcClient {
    client: Client,
    url: String,
    next_id: AtomicU64,
}

impl HttpRpcClient {
    /// Create a client for `url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    /// The endpoint URL.
    #[inline]
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RpcClient for HttpRpcClient {
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(method, id, "rpc request");

        let response = self
            .client
            .post(&self.url)
            .json(&RpcRequest {
                jsonrpc: "2.0",
                id,
                method,
                params,
            })
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;
        interpret(method, status, &body)
    }
}

/// Turn an HTTP reply into the call's result.
///
/// A JSON-RPC error object wins over the HTTP status, since nodes often
/// pair one with a 4xx or 5xx. Without one, a non-success status is a
/// network failure.
fn interpret(method: &str, status: StatusCode, body: &[u8]) -> Result<Value> {
    match serde_json::from_slice::<RpcResponse>(body) {
        Ok(RpcResponse {
            error: Some(error), ..
        }) => {
            tracing::debug!(method, code = error.code, %status, "rpc error");
            Err(Error::Rpc {
                code: error.code,
                message: error.message,
            })
        }
        _ if !status.is_success() => Err(Error::Network(format!("{method}: HTTP {status}"))),
        Ok(response) => Ok(response.result),
        Err(err) => Err(Error::invalid_response(method, err)),
    }
}
