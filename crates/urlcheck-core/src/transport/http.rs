//! JSON POST transport over libcurl.

use std::time::Duration;

use serde::Serialize;

use crate::result::CheckResult;

use super::{RequestTransport, TransportError};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Serialize)]
struct CheckRequest<'a> {
    url: &'a str,
}

/// Posts `{"url": ...}` to the configured endpoint and decodes the JSON reply.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    api_url: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            api_url: api_url.into(),
            timeout,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

impl RequestTransport for HttpTransport {
    fn check(&self, url: &str) -> Result<CheckResult, TransportError> {
        let body = serde_json::to_vec(&CheckRequest { url })?;
        let mut response = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(&self.api_url)?;
        easy.post(true)?;
        easy.post_fields_copy(&body)?;
        easy.connect_timeout(CONNECT_TIMEOUT.min(self.timeout))?;
        easy.timeout(self.timeout)?;

        let mut headers = curl::easy::List::new();
        headers.append("Content-Type: application/json")?;
        headers.append("Accept: application/json")?;
        easy.http_headers(headers)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                response.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            tracing::debug!(api_url = %self.api_url, code, "check endpoint returned error status");
            return Err(TransportError::Http(code));
        }

        Ok(serde_json::from_slice(&response)?)
    }
}
