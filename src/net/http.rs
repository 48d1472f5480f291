//! Live HTTP delegate for fetch, XHR and beacon calls.

use std::time::Duration;

use async_trait::async_trait;

use super::beacon::BeaconTransport;
use super::body::Body;
use super::error::TransportError;
use super::fetch::{FetchTransport, Request, Response};
use super::xhr::{XhrRequest, XhrResponse, XhrTransport};
use crate::config::HttpConfig;

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &HttpConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self::new(client))
    }

    async fn perform(&self, request: Request) -> Result<Response, TransportError> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|_| TransportError::InvalidMethod(request.method.clone()))?;

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(reqwest::Body::from(body));
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
            .collect();
        let bytes = response.bytes().await?;

        Ok(Response {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body: Body::Bytes(bytes.to_vec()),
        })
    }
}

#[async_trait]
impl FetchTransport for HttpClient {
    async fn fetch(&self, request: Request) -> Result<Response, TransportError> {
        self.perform(request).await
    }
}

#[async_trait]
impl XhrTransport for HttpClient {
    async fn exchange(&self, request: XhrRequest) -> Result<XhrResponse, TransportError> {
        let mut outbound = Request::new(&request.method, request.url);
        outbound.body = request.body.map(Body::Text);
        let response = self.perform(outbound).await?;
        Ok(XhrResponse {
            status: response.status,
            response_text: response.body.to_text_lossy(),
        })
    }
}

impl BeaconTransport for HttpClient {
    fn send_beacon(&self, url: &str, data: Option<Body>) -> bool {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!(url, "no runtime available for beacon");
            return false;
        };
        let mut request = Request::new("POST", url);
        request.body = data;
        let client = self.clone();
        handle.spawn(async move {
            let url = request.url.clone();
            if let Err(err) = client.perform(request).await {
                tracing::debug!(url = %url, error = %err, "beacon delivery failed");
            }
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetch_round_trips_through_reqwest() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api"))
            .and(body_string("a=1"))
            .respond_with(ResponseTemplate::new(201).set_body_string("created"))
            .mount(&server)
            .await;

        let client = HttpClient::new(reqwest::Client::new());
        let response = client
            .fetch(Request::new("post", format!("{}/api", server.uri())).with_body("a=1"))
            .await
            .unwrap();

        assert_eq!(response.status, 201);
        assert_eq!(response.status_text, "Created");
        assert_eq!(response.text(), "created");
    }

    #[tokio::test]
    async fn xhr_exchange_reads_response_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[1,2]"))
            .mount(&server)
            .await;

        let client = HttpClient::new(reqwest::Client::new());
        let response = client
            .exchange(XhrRequest {
                method: "GET".into(),
                url: format!("{}/data", server.uri()),
                body: None,
            })
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.response_text, "[1,2]");
    }

    #[tokio::test]
    async fn invalid_method_is_rejected() {
        let client = HttpClient::new(reqwest::Client::new());
        let err = client
            .fetch(Request::new("BAD METHOD", "http://127.0.0.1:1/"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::InvalidMethod(_)));
    }
}
