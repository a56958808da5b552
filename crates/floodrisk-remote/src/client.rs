//! HTTP client for the remote image analysis endpoint.

use std::time::Duration;

use async_trait::async_trait;
use floodrisk_core::{ImageInput, Region, RemoteFindings, Season};
use serde::Serialize;
use tracing::info;

use crate::{RemoteError, encode_data_url, parse_findings};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

impl RemoteConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// JSON body sent to the endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRequest {
    pub image: String,
    pub region: String,
    pub season: String,
}

impl AnalysisRequest {
    pub fn new(image: &ImageInput, region: Region, season: Season) -> Self {
        Self {
            image: encode_data_url(image),
            region: region.to_string(),
            season: season.to_string(),
        }
    }
}

/// Something that can turn an image into validated remote findings.
#[async_trait]
pub trait RemoteAnalyzer: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<RemoteFindings, RemoteError>;
}

pub struct AnalysisClient {
    client: reqwest::Client,
    config: RemoteConfig,
}

impl AnalysisClient {
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

#[async_trait]
impl RemoteAnalyzer for AnalysisClient {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<RemoteFindings, RemoteError> {
        info!(
            url = %self.config.endpoint,
            region = %request.region,
            season = %request.season,
            image_len = request.image.len(),
            "requesting remote analysis"
        );
        let resp = self
            .client
            .post(&self.config.endpoint)
            .json(request)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RemoteError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let text = resp.text().await?;
        let findings = parse_findings(&text)?;
        info!(level = %findings.level, probability = %findings.probability, "remote analysis complete");
        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use floodrisk_core::{ImageMime, RiskLevel};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Serve one canned HTTP response and hand back the request body.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            let request_body = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf).to_string();
                if let Some(split) = text.find("\r\n\r\n") {
                    let length = text[..split]
                        .lines()
                        .find_map(|l| {
                            let (name, value) = l.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if buf.len() >= split + 4 + length {
                        break text[split + 4..].to_string();
                    }
                }
                if n == 0 {
                    break String::new();
                }
            };
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            request_body
        });
        (format!("http://{addr}/analyze"), handle)
    }

    fn request() -> AnalysisRequest {
        let image = ImageInput::new(vec![0xff, 0xd8, 0xff], ImageMime::Jpeg).unwrap();
        AnalysisRequest::new(&image, Region::River, Season::Spring)
    }

    #[test]
    fn config_trims_trailing_slash() {
        let config = RemoteConfig::new("http://localhost:8888/analyze/");
        assert_eq!(config.endpoint, "http://localhost:8888/analyze");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn request_body_shape() {
        let json = serde_json::to_value(request()).unwrap();
        assert_eq!(json["image"], "data:image/jpeg;base64,/9j/");
        assert_eq!(json["region"], "river");
        assert_eq!(json["season"], "spring");
    }

    #[tokio::test]
    async fn successful_reply_is_parsed() {
        let (url, server) = serve_once(
            "200 OK",
            r#"Result: {"riskLevel": "Low", "riskProbability": "12%", "analysis": "Dry upland.", "recommendations": ["Keep gutters clear"]}"#,
        )
        .await;
        let client = AnalysisClient::new(RemoteConfig::new(url)).unwrap();
        let findings = client.analyze(&request()).await.unwrap();

        assert_eq!(findings.level, RiskLevel::LOW);
        assert_eq!(findings.recommendations, vec!["Keep gutters clear"]);

        let sent: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
        assert_eq!(sent["region"], "river");
    }

    #[tokio::test]
    async fn error_status_is_server_error() {
        let (url, _server) = serve_once("503 Service Unavailable", "overloaded").await;
        let client = AnalysisClient::new(RemoteConfig::new(url)).unwrap();
        let Err(err) = client.analyze(&request()).await else {
            panic!("503 should fail");
        };
        assert!(matches!(err, RemoteError::Server { status: 503, ref body } if body == "overloaded"));
        assert!(err.is_transient());
    }
}
