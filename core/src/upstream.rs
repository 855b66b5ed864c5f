//! Outbound HTTP seam.
//!
//! Every network call the pipeline makes goes through [`Upstream::send`], so the
//! stages can be exercised against an in-memory double and the credential is
//! always passed in explicitly.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::UpstreamError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One outbound request. Headers are explicit so that per-request header
/// differences survive all the way to the wire.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl UpstreamRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    pub fn bearer(self, token: &str) -> Self {
        self.header("Authorization", format!("Bearer {token}"))
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[async_trait]
pub trait Upstream: Send + Sync {
    /// Issue the request and return the decoded JSON body of a 2xx response.
    /// Anything else (transport failure, non-success status, non-JSON body)
    /// is an `UpstreamError`.
    async fn send(&self, request: UpstreamRequest) -> Result<Value, UpstreamError>;
}

/// `reqwest`-backed transport. Relies on the client's own timeouts; nothing
/// is retried.
#[derive(Debug, Clone, Default)]
pub struct HttpUpstream {
    client: reqwest::Client,
}

impl HttpUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn send(&self, request: UpstreamRequest) -> Result<Value, UpstreamError> {
        let UpstreamRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut req = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        for (k, v) in &headers {
            req = req.header(k.as_str(), v.as_str());
        }
        // Body is written raw: Content-Type is only sent when the caller asked for it.
        if let Some(b) = body {
            let bytes = serde_json::to_vec(&b).map_err(|e| UpstreamError::Decode {
                url: url.clone(),
                message: format!("cannot serialize request body: {e}"),
            })?;
            req = req.body(bytes);
        }

        let resp = req.send().await.map_err(|e| UpstreamError::Transport {
            url: url.clone(),
            message: e.to_string(),
        })?;

        let status = resp.status();
        if !status.is_success() {
            tracing::debug!(url = %url, status = %status, "upstream returned non-success status");
            return Err(UpstreamError::Status {
                url,
                status: status.as_u16(),
            });
        }

        resp.json::<Value>().await.map_err(|e| UpstreamError::Decode {
            url,
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::Value;

    use super::{Upstream, UpstreamRequest};
    use crate::error::UpstreamError;

    /// Scripted response for one route.
    #[derive(Clone)]
    pub enum Reply {
        Json(Value),
        Status(u16),
    }

    /// In-memory `Upstream` that records every request and answers from a
    /// script keyed by URL, or for aggregate queries by `dataTypeName`.
    #[derive(Default)]
    pub struct RecordingUpstream {
        by_url: HashMap<String, Reply>,
        by_data_type: HashMap<String, Reply>,
        calls: Mutex<Vec<UpstreamRequest>>,
    }

    impl RecordingUpstream {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn route(mut self, url: &str, reply: Reply) -> Self {
            self.by_url.insert(url.to_string(), reply);
            self
        }

        pub fn aggregate(mut self, data_type_name: &str, reply: Reply) -> Self {
            self.by_data_type.insert(data_type_name.to_string(), reply);
            self
        }

        pub fn calls(&self) -> Vec<UpstreamRequest> {
            self.calls.lock().expect("calls lock").clone()
        }

        fn reply_for(&self, request: &UpstreamRequest) -> Option<Reply> {
            let data_type = request
                .body
                .as_ref()
                .and_then(|b| b.pointer("/aggregateBy/0/dataTypeName"))
                .and_then(Value::as_str);
            data_type
                .and_then(|dt| self.by_data_type.get(dt))
                .or_else(|| self.by_url.get(&request.url))
                .cloned()
        }
    }

    #[async_trait]
    impl Upstream for RecordingUpstream {
        async fn send(&self, request: UpstreamRequest) -> Result<Value, UpstreamError> {
            let reply = self.reply_for(&request);
            let url = request.url.clone();
            self.calls.lock().expect("calls lock").push(request);
            match reply {
                Some(Reply::Json(v)) => Ok(v),
                Some(Reply::Status(status)) => Err(UpstreamError::Status { url, status }),
                None => Err(UpstreamError::Transport {
                    url,
                    message: "no scripted reply".to_string(),
                }),
            }
        }
    }
}
