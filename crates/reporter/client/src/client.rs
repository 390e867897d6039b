//! The [`InfluxClient`] capability and its InfluxDB v1 HTTP implementation.

use crate::{BatchPoints, ClientConfig, ClientError, line};
use async_trait::async_trait;
use reqwest::{Response, header::CONTENT_TYPE};
use std::{
    fmt::Debug,
    time::{Duration, Instant},
};
use tracing::{debug, trace};
use url::Url;

const USER_AGENT: &str = concat!("influx-reporter/", env!("CARGO_PKG_VERSION"));

/// Result of a successful ping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pong {
    /// Round-trip time of the ping request.
    pub rtt: Duration,
    /// Server version reported in the `X-Influxdb-Version` header, if any.
    pub version: Option<String>,
}

/// The operations the reporter needs from a time-series database.
#[async_trait]
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait InfluxClient: Debug + Send + Sync {
    /// Checks that the server is reachable and healthy.
    async fn ping(&self) -> Result<Pong, ClientError>;

    /// Writes every point of `batch` in a single request.
    async fn write(&self, batch: &BatchPoints) -> Result<(), ClientError>;
}

/// [`InfluxClient`] talking to the InfluxDB v1 HTTP API.
#[derive(Debug, Clone)]
pub struct HttpClient {
    config: ClientConfig,
    http: reqwest::Client,
    ping_url: Url,
    write_url: Url,
}

impl HttpClient {
    /// Builds a client for the endpoint in `config`.
    ///
    /// No request is made; use [`InfluxClient::ping`] to check the server.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        match config.url.scheme() {
            "http" | "https" => {}
            other => return Err(ClientError::UnsupportedScheme(other.to_string())),
        }

        let ping_url = Self::endpoint(&config.url, "ping")?;
        let write_url = Self::endpoint(&config.url, "write")?;
        let http =
            reqwest::Client::builder().timeout(config.timeout).user_agent(USER_AGENT).build()?;

        debug!(target: "reporter::client", url = %config.url, "Created influxdb client");
        Ok(Self { config, http, ping_url, write_url })
    }

    /// Returns the configuration the client was built from.
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn endpoint(base: &Url, segment: &str) -> Result<Url, ClientError> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::CannotBeABase(base.clone()))?
            .pop_if_empty()
            .push(segment);
        url.set_query(None);
        Ok(url)
    }

    fn with_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.config.has_credentials() {
            request.basic_auth(&self.config.username, Some(&self.config.password))
        } else {
            request
        }
    }

    async fn check_status(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default().trim().to_string();
        Err(ClientError::Status { status, body })
    }
}

#[async_trait]
impl InfluxClient for HttpClient {
    async fn ping(&self) -> Result<Pong, ClientError> {
        let started = Instant::now();
        let response = self.with_auth(self.http.get(self.ping_url.clone())).send().await?;
        let response = Self::check_status(response).await?;

        let version = response
            .headers()
            .get("X-Influxdb-Version")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(Pong { rtt: started.elapsed(), version })
    }

    async fn write(&self, batch: &BatchPoints) -> Result<(), ClientError> {
        let body = line::encode(&batch.points);
        if body.is_empty() {
            trace!(target: "reporter::client", "Nothing to write");
            return Ok(());
        }

        let mut url = self.write_url.clone();
        url.query_pairs_mut().append_pair("db", &batch.database).append_pair("precision", "ns");

        let request = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(body);
        let response = self.with_auth(request).send().await?;
        Self::check_status(response).await?;

        trace!(target: "reporter::client", points = batch.len(), "Wrote batch");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;
    use std::time::SystemTime;
    use wiremock::{
        Match, Mock, MockServer, Request, ResponseTemplate,
        matchers::{body_string, header, method, path, query_param},
    };

    /// Matches requests that carry no `Authorization` header.
    struct NoAuth;

    impl Match for NoAuth {
        fn matches(&self, request: &Request) -> bool {
            !request.headers.contains_key("authorization")
        }
    }

    fn client_for(server: &MockServer, username: &str, password: &str) -> HttpClient {
        let config = ClientConfig::new(server.uri().parse().unwrap(), username, password);
        HttpClient::new(config).unwrap()
    }

    fn batch() -> BatchPoints {
        BatchPoints::new(
            "metrics".to_string(),
            vec![Point::new("requests.count", SystemTime::UNIX_EPOCH).field("value", 42_i64)],
        )
    }

    #[test]
    fn test_rejects_unsupported_scheme() {
        let config = ClientConfig::new("udp://localhost:8089".parse().unwrap(), "", "");
        let err = HttpClient::new(config).unwrap_err();
        assert!(matches!(err, ClientError::UnsupportedScheme(scheme) if scheme == "udp"));
    }

    #[test]
    fn test_endpoints_keep_base_path() {
        let config = ClientConfig::new("http://localhost:8086/influx/".parse().unwrap(), "", "");
        let client = HttpClient::new(config).unwrap();
        assert_eq!(client.ping_url.as_str(), "http://localhost:8086/influx/ping");
        assert_eq!(client.write_url.as_str(), "http://localhost:8086/influx/write");
    }

    #[tokio::test]
    async fn test_ping_reports_version() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(204).insert_header("X-Influxdb-Version", "1.8.10"))
            .expect(1)
            .mount(&server)
            .await;

        let pong = client_for(&server, "", "").ping().await.unwrap();
        assert_eq!(pong.version.as_deref(), Some("1.8.10"));
    }

    #[tokio::test]
    async fn test_ping_fails_on_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable\n"))
            .mount(&server)
            .await;

        let err = client_for(&server, "", "").ping().await.unwrap_err();
        match err {
            ClientError::Status { status, body } => {
                assert_eq!(status.as_u16(), 503);
                assert_eq!(body, "unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_ping_fails_when_unreachable() {
        let port = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}").parse().unwrap();
        let client = HttpClient::new(ClientConfig::new(url, "", "")).unwrap();

        let err = client.ping().await.unwrap_err();
        assert!(matches!(err, ClientError::Http(_)));
    }

    #[tokio::test]
    async fn test_write_posts_line_protocol_with_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/write"))
            .and(query_param("db", "metrics"))
            .and(query_param("precision", "ns"))
            .and(header("authorization", "Basic YWRtaW46c2VjcmV0"))
            .and(body_string("requests.count value=42i 0\n"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server, "admin", "secret").write(&batch()).await.unwrap();
    }

    #[tokio::test]
    async fn test_write_without_credentials_sends_no_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/write"))
            .and(NoAuth)
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server, "", "").write(&batch()).await.unwrap();
    }

    #[tokio::test]
    async fn test_write_surfaces_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/write"))
            .respond_with(
                ResponseTemplate::new(404).set_body_string(r#"{"error":"database not found"}"#),
            )
            .mount(&server)
            .await;

        let err = client_for(&server, "", "").write(&batch()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"influxdb responded with 404 Not Found: {"error":"database not found"}"#
        );
    }

    #[tokio::test]
    async fn test_write_skips_empty_batch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let empty = BatchPoints::new("metrics".to_string(), vec![]);
        client_for(&server, "", "").write(&empty).await.unwrap();
    }
}
