//! Request executor for the MyParcel API.
//!
//! # Design
//! `RequestExecutor` holds the client configuration, a connector and an
//! optional user-agent override, and nothing per call. `build_request`
//! turns a `RequestSpec` into an `HttpRequest` without touching the network;
//! `send_with` adds the transport round-trip and classifies the answer. A
//! send either returns a `RequestOutcome` or an `SdkError`, never both.

use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::SdkError;
use crate::http::{HttpMethod, HttpRequest};
use crate::lookup;
use crate::request::RequestSpec;
use crate::response::{decode_response, ErrorOrigin, ResponseBody};
use crate::transport::{Connector, OpenTransport, Transport};
use crate::types::{RequestKind, Resource};
use crate::user_agent::{default_user_agent, manifest_version};

#[cfg(feature = "ureq")]
use crate::ureq_transport::UreqConnector;

/// Sends `RequestSpec`s through transports opened by `C`.
#[derive(Debug, Clone)]
pub struct RequestExecutor<C> {
    config: ClientConfig,
    connector: C,
    user_agent: Option<String>,
}

#[cfg(feature = "ureq")]
impl RequestExecutor<UreqConnector> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_connector(config, UreqConnector)
    }
}

impl<C: Connector> RequestExecutor<C> {
    pub fn with_connector(config: ClientConfig, connector: C) -> Self {
        Self {
            config,
            connector,
            user_agent: None,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Override the derived user agent. `None` leaves the current choice alone.
    pub fn set_user_agent(mut self, agent: Option<&str>) -> Self {
        if let Some(agent) = agent.filter(|agent| !agent.is_empty()) {
            self.user_agent = Some(agent.to_string());
        }
        self
    }

    /// The agent the next request will carry.
    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .or_else(|| self.config.user_agent.clone())
            .unwrap_or_else(|| {
                default_user_agent(manifest_version(&self.config.manifest_paths).as_deref())
            })
    }

    /// Describe the request `send_with` would transmit.
    pub fn build_request(
        &self,
        spec: &RequestSpec,
        method: HttpMethod,
        uri: &str,
    ) -> Result<HttpRequest, SdkError> {
        if spec.api_key().is_empty() {
            return Err(SdkError::missing_api_key());
        }

        let mut url = format!("{}/{uri}", self.config.api_root());
        if method != HttpMethod::Post && !spec.body().is_empty() {
            url.push('/');
            url.push_str(spec.body());
        }

        let mut headers = spec.headers().to_vec();
        headers.push(format!("User-Agent: {}", self.user_agent()));

        Ok(HttpRequest {
            method,
            url,
            headers,
            body: spec.body().to_string(),
        })
    }

    /// POST to `shipments`.
    pub fn send(&self, spec: &RequestSpec) -> Result<RequestOutcome, SdkError> {
        self.send_with(spec, HttpMethod::Post, Resource::Shipments.path())
    }

    pub fn send_kind(
        &self,
        spec: &RequestSpec,
        kind: RequestKind,
    ) -> Result<RequestOutcome, SdkError> {
        self.send_with(spec, kind.method(), kind.resource().path())
    }

    pub fn send_with(
        &self,
        spec: &RequestSpec,
        method: HttpMethod,
        uri: &str,
    ) -> Result<RequestOutcome, SdkError> {
        let request = self.build_request(spec, method, uri)?;
        debug!(method = %request.method, url = %request.url, "sending myparcel request");

        let decoded = {
            let mut transport = OpenTransport::new(self.connector.connect(&self.config.transport));
            transport.write(request.method, &request.url, &request.headers, &request.body);
            let raw = transport.read();
            decode_response(raw, || transport.error())
        };

        let HttpRequest { url, body, .. } = request;
        match decoded.into_parts() {
            (result, None) => Ok(RequestOutcome { url, result }),
            (_, Some((ErrorOrigin::Transport, message))) => {
                Err(SdkError::Transport { message, url, body })
            }
            (_, Some((ErrorOrigin::Api, message))) => Err(SdkError::Api { message, url, body }),
        }
    }
}

/// Successful answer to one send.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOutcome {
    url: String,
    result: ResponseBody,
}

impl RequestOutcome {
    /// URL the request was sent to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The whole decoded result: a JSON tree or PDF bytes.
    pub fn result(&self) -> &ResponseBody {
        &self.result
    }

    pub fn into_result(self) -> ResponseBody {
        self.result
    }

    /// Dot-path lookup into a JSON result. Always `None` for a PDF.
    pub fn get_result(&self, path: &str) -> Option<&Value> {
        lookup::get(self.result.as_json()?, path)
    }

    /// Take `key` from each element found at `path`, or at the root when
    /// `path` is `None`.
    pub fn pluck(&self, path: Option<&str>, key: &str) -> Option<Vec<Value>> {
        let collection = match path {
            Some(path) => self.get_result(path)?,
            None => self.result.as_json()?,
        };
        lookup::pluck(collection, key)
    }
}
