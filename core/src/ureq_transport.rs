//! Blocking transport backed by `ureq`.
//!
//! Non-2xx statuses are returned as data: MyParcel reports failures in the
//! JSON body, which the response classifier reads regardless of status.

use tracing::{debug, warn};
use ureq::config::RedirectAuthHeaders;
use ureq::{Agent, RequestBuilder};

use crate::config::TransportConfig;
use crate::http::{split_header, HttpMethod};
use crate::transport::{Connector, Transport};

/// Opens a `UreqTransport` per send.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqConnector;

impl Connector for UreqConnector {
    type Transport = UreqTransport;

    fn connect(&self, config: &TransportConfig) -> UreqTransport {
        UreqTransport::new(config)
    }
}

pub struct UreqTransport {
    agent: Agent,
    include_headers: bool,
    outcome: Option<Result<Vec<u8>, String>>,
}

impl UreqTransport {
    pub fn new(config: &TransportConfig) -> Self {
        let max_redirects = if config.follow_redirects {
            config.max_redirects
        } else {
            0
        };
        let agent = Agent::config_builder()
            .timeout_global(Some(config.timeout()))
            .http_status_as_error(false)
            .max_redirects(max_redirects)
            .redirect_auth_headers(RedirectAuthHeaders::SameHost)
            .build()
            .new_agent();

        Self {
            agent,
            include_headers: config.include_headers,
            outcome: None,
        }
    }

    fn exchange(
        &self,
        method: HttpMethod,
        url: &str,
        headers: &[String],
        body: &str,
    ) -> Result<Vec<u8>, ureq::Error> {
        let headers: Vec<(&str, &str)> = headers
            .iter()
            .filter_map(|line| {
                let parsed = split_header(line);
                if parsed.is_none() {
                    warn!(header = %line, "skipping header without a name");
                }
                parsed
            })
            .collect();

        let mut response = match method {
            HttpMethod::Get => with_headers(self.agent.get(url), &headers).call()?,
            HttpMethod::Delete => with_headers(self.agent.delete(url), &headers).call()?,
            HttpMethod::Post if body.is_empty() => {
                with_headers(self.agent.post(url), &headers).send_empty()?
            }
            HttpMethod::Post => with_headers(self.agent.post(url), &headers).send(body.as_bytes())?,
            HttpMethod::Put if body.is_empty() => {
                with_headers(self.agent.put(url), &headers).send_empty()?
            }
            HttpMethod::Put => with_headers(self.agent.put(url), &headers).send(body.as_bytes())?,
        };

        let status = response.status().as_u16();
        debug!(status, "received http response");

        let mut raw = Vec::new();
        if self.include_headers {
            raw.extend_from_slice(format!("{:?} {}\r\n", response.version(), status).as_bytes());
            for (name, value) in response.headers() {
                raw.extend_from_slice(name.as_str().as_bytes());
                raw.extend_from_slice(b": ");
                raw.extend_from_slice(value.as_bytes());
                raw.extend_from_slice(b"\r\n");
            }
            raw.extend_from_slice(b"\r\n");
        }
        raw.extend(response.body_mut().read_to_vec()?);
        Ok(raw)
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(&str, &str)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder
}

impl Transport for UreqTransport {
    fn write(&mut self, method: HttpMethod, url: &str, headers: &[String], body: &str) {
        let outcome = self.exchange(method, url, headers, body).map_err(|err| {
            warn!(error = %err, %url, "http exchange failed");
            err.to_string()
        });
        self.outcome = Some(outcome);
    }

    fn read(&mut self) -> Option<Vec<u8>> {
        match self.outcome.take()? {
            Ok(raw) => Some(raw),
            Err(message) => {
                self.outcome = Some(Err(message));
                None
            }
        }
    }

    fn error(&self) -> String {
        match &self.outcome {
            Some(Err(message)) => message.clone(),
            Some(Ok(_)) => String::new(),
            None => "no request was written".to_string(),
        }
    }

    fn close(&mut self) {
        self.outcome = None;
    }
}
