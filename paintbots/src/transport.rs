use std::time::Duration;

use reqwest::blocking::Client as HttpClient;
use tracing::trace;
use url::Url;

use crate::{FormFields, TransportError};

pub const DEFAULT_URL: &str = "http://localhost:31173";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// Longer error bodies are cut off in error messages
const MAX_ERROR_BODY_LEN: usize = 500;

/// Sends one request to the server and returns the response body.
pub trait Transport {
    /// Issues exactly one request. There are no retries.
    fn send(&mut self, fields: &FormFields) -> Result<String, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, fields: &FormFields) -> Result<String, TransportError> {
        (**self).send(fields)
    }
}

/// Where and how to reach the server.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub url: Url,
    /// Upper bound for a single request, including reading the response.
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(Url::parse(DEFAULT_URL).expect("DEFAULT_URL is a valid URL"))
    }
}

/// Posts form-encoded commands to the server over HTTP.
pub struct HttpTransport {
    client: HttpClient,
    url: Url,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = HttpClient::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl Transport for HttpTransport {
    fn send(&mut self, fields: &FormFields) -> Result<String, TransportError> {
        trace!(name: "Sending request", url = %self.url, fields = ?fields);
        let response = self.client.post(self.url.clone()).form(fields).send()?;
        let status = response.status();
        let body = response.text()?;
        trace!(name: "Received response", status = status.as_u16(), body = %body);

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: truncate(body, MAX_ERROR_BODY_LEN),
            });
        }
        Ok(body)
    }
}

fn truncate(mut text: String, max_len: usize) -> String {
    if text.len() > max_len {
        let mut end = max_len;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
        text.push_str("... (truncated)");
    }
    text
}
