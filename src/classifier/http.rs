// ABOUTME: HTTP classifier backend posting scenes to a remote panic-detection service

use super::{Classifier, ClassifierError, Scene};
use crate::models::Verdict;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassifyRequest<'a> {
    video_data_uri: &'a str,
}

/// Posts scenes to a remote classification endpoint
#[derive(Debug, Clone)]
pub struct HttpClassifier {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpClassifier {
    /// Client for `endpoint` with a per-request timeout
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ClassifierError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// URL scenes are posted to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    fn name(&self) -> &str {
        "http"
    }

    async fn classify(&self, scene: &Scene) -> Result<Verdict, ClassifierError> {
        debug!("Posting {} scene to {}", scene.mime_type(), self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&ClassifyRequest {
                video_data_uri: scene.as_data_uri(),
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClassifierError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActionTag, AlertLevel};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one canned HTTP response and return the request text
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let mut request = Vec::new();
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request);
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|line| {
                            let lower = line.to_ascii_lowercase();
                            lower
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                        })
                        .unwrap_or(0);
                    if request.len() >= header_end + 4 + content_length || n == 0 {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            let response = format!(
                "{}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&request).to_string()
        });

        (format!("http://{}/detect", addr), handle)
    }

    #[tokio::test]
    async fn posts_data_uri_and_decodes_verdict() {
        let (url, server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"panicDetected":true,"alertLevel":"medium","actionsTaken":["take_screenshot","initiate_recording"]}"#,
        )
        .await;

        let classifier = HttpClassifier::new(url, Duration::from_secs(5)).unwrap();
        let verdict = classifier.classify(&Scene::placeholder()).await.unwrap();

        assert!(verdict.panic_detected);
        assert_eq!(verdict.alert_level, AlertLevel::Medium);
        assert_eq!(
            verdict.actions_taken,
            vec![ActionTag::TakeScreenshot, ActionTag::InitiateRecording]
        );

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /detect"));
        assert!(request.contains("\"videoDataUri\":\"data:image/png;base64,"));
    }

    #[tokio::test]
    async fn high_alert_survives_unfamiliar_action_tag() {
        let (url, server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"panicDetected":true,"alertLevel":"high","actionsTaken":["notify_neighbours","share_alert_with_authorities"]}"#,
        )
        .await;

        let classifier = HttpClassifier::new(url, Duration::from_secs(5)).unwrap();
        let verdict = classifier.classify(&Scene::placeholder()).await.unwrap();

        assert_eq!(verdict.alert_level, AlertLevel::High);
        assert_eq!(verdict.actions_taken, vec![ActionTag::ShareAlertWithAuthorities]);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let (url, server) = serve_once("HTTP/1.1 503 Service Unavailable", r#"{"error":"overloaded"}"#).await;

        let classifier = HttpClassifier::new(url, Duration::from_secs(5)).unwrap();
        let err = classifier.classify(&Scene::placeholder()).await.unwrap_err();

        assert!(matches!(err, ClassifierError::Status { status: 503, .. }));
        server.await.unwrap();
    }
}
