//! Blocking HTTP transport.
//!
//! One GET for the schema resource, one POST per save submission. Matches
//! the single-threaded interaction model: calls block, nothing retries.
//! Deployments that sit behind HTTP basic auth attach credentials with
//! [`HttpTransport::with_basic_auth`].

use base64::Engine;
use log::debug;
use serde_json::{Map, Value};

use crate::{error::TransportError, run::FormTransport};

/// [`FormTransport`] over HTTP, built on a reusable [`ureq::Agent`].
pub struct HttpTransport {
    agent: ureq::Agent,
    schema_url: String,
    save_url: String,
    authorization: Option<String>,
}

impl HttpTransport {
    pub fn new(schema_url: impl Into<String>, save_url: impl Into<String>) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            schema_url: schema_url.into(),
            save_url: save_url.into(),
            authorization: None,
        }
    }

    /// Attach HTTP basic credentials to every request.
    pub fn with_basic_auth(mut self, username: &str, password: &str) -> Self {
        let raw = format!("{username}:{password}");
        let encoded = base64::engine::general_purpose::STANDARD.encode(raw);
        self.authorization = Some(format!("Basic {encoded}"));
        self
    }
}

impl FormTransport for HttpTransport {
    fn fetch_schema(&mut self) -> Result<Value, TransportError> {
        debug!("fetching schema from {}", self.schema_url);
        let mut request = self.agent.get(&self.schema_url);
        if let Some(authorization) = &self.authorization {
            request = request.header("Authorization", authorization);
        }
        let mut response = request.call().map_err(to_transport)?;
        response.body_mut().read_json().map_err(to_transport)
    }

    fn submit(&mut self, snapshot: &Map<String, Value>) -> Result<(), TransportError> {
        debug!("submitting {} values to {}", snapshot.len(), self.save_url);
        let mut request = self.agent.post(&self.save_url);
        if let Some(authorization) = &self.authorization {
            request = request.header("Authorization", authorization);
        }
        request.send_json(snapshot).map_err(to_transport)?;
        Ok(())
    }
}

fn to_transport(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::StatusCode(code) => TransportError::Status(code),
        other => TransportError::Network(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_auth_header_encoding() {
        let transport = HttpTransport::new("http://dev/schema", "http://dev/save")
            .with_basic_auth("johnny", "wrench");
        // base64("johnny:wrench")
        assert_eq!(
            transport.authorization.as_deref(),
            Some("Basic am9obm55OndyZW5jaA==")
        );
    }
}
