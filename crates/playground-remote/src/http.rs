//! Blocking HTTP [`Transport`] over `reqwest`.

use crate::config::ClientConfig;
use crate::transport::{
    CHECK_OUTPUT_PATH, EXAMPLES_PATH, Endpoint, Transport, TransportError, example_path,
};
use crate::wire::{
    CheckOutputRequest, CheckOutputResponse, ExampleResponse, ExampleSummary, SubmitRequest,
    SubmitResponse,
};
use reqwest::blocking::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Talks to a compile service at a base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a client for `config.server_url` with the configured request timeout.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|err| TransportError::Other(err.to_string()))?;
        Ok(Self {
            client,
            base_url: config.server_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        let url = self.url(path);
        log::debug!("GET {url}");
        let response = self.client.get(&url).send().map_err(request_error)?;
        read_json(response)
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, TransportError> {
        let url = self.url(path);
        log::debug!("POST {url}");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .map_err(request_error)?;
        read_json(response)
    }
}

fn request_error(err: reqwest::Error) -> TransportError {
    if err.is_connect() || err.is_timeout() {
        TransportError::Unreachable(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}

fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, TransportError> {
    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::Status(status.as_u16()));
    }
    let body = response.text().map_err(request_error)?;
    serde_json::from_str(&body).map_err(|err| TransportError::Malformed(err.to_string()))
}

impl Transport for HttpTransport {
    fn fetch_example(&mut self, name: &str) -> Result<ExampleResponse, TransportError> {
        self.get_json(&example_path(name))
    }

    fn list_examples(&mut self) -> Result<Vec<ExampleSummary>, TransportError> {
        self.get_json(EXAMPLES_PATH)
    }

    fn submit(
        &mut self,
        endpoint: Endpoint,
        request: &SubmitRequest,
    ) -> Result<SubmitResponse, TransportError> {
        self.post_json(endpoint.path(), request)
    }

    fn check_output(
        &mut self,
        request: &CheckOutputRequest,
    ) -> Result<CheckOutputResponse, TransportError> {
        self.post_json(CHECK_OUTPUT_PATH, request)
    }
}
