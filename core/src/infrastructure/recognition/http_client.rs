use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::{
    common::{RecognitionConfig, entities::app_errors::CoreError},
    health::entities::RecognitionHealth,
    meal::{entities::Detection, ports::RecognitionClient, value_objects::RecognitionResult},
};

#[derive(Debug, Clone)]
pub struct HttpRecognitionClient {
    base_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    image_path: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    #[serde(default = "default_success")]
    success: bool,
    /// Decoded one by one so a malformed entry does not discard the others.
    #[serde(default)]
    detections: Vec<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

fn default_success() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    #[serde(default)]
    model_loaded: bool,
}

impl HttpRecognitionClient {
    pub fn new(config: &RecognitionConfig) -> Result<Self, CoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build recognition HTTP client: {}", e);
                CoreError::InternalServerError
            })?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn call_analyze(&self, image_reference: &str) -> Result<Vec<Detection>, CoreError> {
        let url = format!("{}/analyze", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&AnalyzeRequest {
                image_path: image_reference,
            })
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() { "timed out" } else { "request failed" };
                CoreError::ExternalServiceError(format!("recognition {}: {}", reason, e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(CoreError::ExternalServiceError(format!(
                "recognition returned error: {} - {}",
                status, error_text
            )));
        }

        let body: AnalyzeResponse = response.json().await.map_err(|e| {
            CoreError::ExternalServiceError(format!("failed to parse recognition response: {}", e))
        })?;

        body.into_detections()
    }
}

impl AnalyzeResponse {
    fn into_detections(self) -> Result<Vec<Detection>, CoreError> {
        if !self.success {
            return Err(CoreError::ExternalServiceError(
                self.error
                    .unwrap_or_else(|| "recognition reported failure".to_string()),
            ));
        }

        let detections = self
            .detections
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| {
                serde_json::from_value::<Detection>(value)
                    .inspect_err(|e| {
                        tracing::warn!(index, error = %e, "Skipping malformed detection");
                    })
                    .ok()
            })
            .collect();

        Ok(detections)
    }
}

impl RecognitionClient for HttpRecognitionClient {
    #[instrument(skip(self))]
    async fn analyze(&self, image_reference: &str) -> RecognitionResult {
        match self.call_analyze(image_reference).await {
            Ok(detections) => {
                tracing::debug!(count = detections.len(), "Recognition completed");
                RecognitionResult::completed(detections)
            }
            Err(e) => {
                tracing::error!(error = %e, "Recognition request failed");
                RecognitionResult::unavailable(e.to_string())
            }
        }
    }

    async fn health(&self) -> RecognitionHealth {
        let url = format!("{}/health", self.base_url);

        let probe = async {
            let response = self.client.get(&url).send().await?.error_for_status()?;
            let body = response.json::<HealthResponse>().await?;
            Ok::<_, reqwest::Error>(body)
        };

        match probe.await {
            Ok(body) => RecognitionHealth {
                url: self.base_url.clone(),
                connected: body.model_loaded,
                error: (!body.model_loaded).then(|| "model not loaded".to_string()),
            },
            Err(e) => RecognitionHealth {
                url: self.base_url.clone(),
                connected: false,
                error: Some(e.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::{TcpListener, TcpStream},
    };

    use super::*;
    use crate::domain::meal::value_objects::RecognitionStatus;

    async fn read_request(socket: &mut TcpStream) {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 1024];

        loop {
            let read = match socket.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(read) => read,
            };
            buffer.extend_from_slice(&chunk[..read]);

            if let Some(end) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&buffer[..end]).to_ascii_lowercase();
                let body_len = headers
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|value| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);

                if buffer.len() >= end + 4 + body_len {
                    return;
                }
            }
        }
    }

    /// Serves one connection with a canned HTTP response after `delay`.
    async fn serve_once(delay: Duration, status_line: &str, body: &str) -> RecognitionConfig {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                read_request(&mut socket).await;
                tokio::time::sleep(delay).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        RecognitionConfig {
            url: format!("http://{addr}"),
            timeout_secs: 1,
        }
    }

    #[test]
    fn success_response_yields_detections() {
        let body: AnalyzeResponse = serde_json::from_str(
            r#"{"success": true, "count": 2, "detections": [
                {"class_id": 0, "name": "background", "confidence": 0.9},
                {"class_id": 5, "name": "bibimbap", "box": [1, 2, 3, 4],
                 "nutrition": {"calories": 560, "protein": 18, "sodium": null}}
            ]}"#,
        )
        .unwrap();

        let detections = body.into_detections().unwrap();

        assert_eq!(detections.len(), 2);
        assert!(detections[0].is_background());
        let nutrition = detections[1].nutrition.clone().unwrap();
        assert_eq!(nutrition.calories, 560.0);
        assert_eq!(nutrition.sodium, 0.0);
    }

    #[test]
    fn malformed_detection_does_not_discard_the_others() {
        let body: AnalyzeResponse = serde_json::from_str(
            r#"{"success": true, "count": 3, "detections": [
                {"class_id": 5, "name": "bibimbap", "nutrition": {"calories": 560}},
                {"class_id": 8, "name": "japchae", "solution": {"supplements": null}},
                {"class_id": "seven", "name": "broken"}
            ]}"#,
        )
        .unwrap();

        let detections = body.into_detections().unwrap();

        let names: Vec<_> = detections.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["bibimbap", "japchae"]);
        assert_eq!(detections[0].nutrition.unwrap().calories, 560.0);
    }

    #[test]
    fn missing_success_flag_counts_as_success() {
        let body: AnalyzeResponse = serde_json::from_str(r#"{"detections": []}"#).unwrap();

        assert_eq!(body.into_detections().unwrap().len(), 0);
    }

    #[test]
    fn failure_flag_is_an_error() {
        let body: AnalyzeResponse =
            serde_json::from_str(r#"{"success": false, "error": "model not loaded"}"#).unwrap();

        assert_eq!(
            body.into_detections(),
            Err(CoreError::ExternalServiceError("model not loaded".to_string()))
        );
    }

    #[tokio::test]
    async fn unreachable_service_is_unavailable_not_an_error() {
        let client = HttpRecognitionClient::new(&RecognitionConfig {
            url: "http://127.0.0.1:9/".to_string(),
            timeout_secs: 1,
        })
        .unwrap();

        let result = client.analyze("http://minio/b/k.jpg").await;

        assert_eq!(result.status, RecognitionStatus::Unavailable);
        assert!(result.detections.is_empty());
        assert!(result.error.is_some());

        let health = client.health().await;
        assert_eq!(health.url, "http://127.0.0.1:9");
        assert!(!health.connected);
    }

    #[tokio::test]
    async fn server_error_is_unavailable() {
        let config = serve_once(Duration::ZERO, "500 Internal Server Error", "{}").await;
        let client = HttpRecognitionClient::new(&config).unwrap();

        let result = client.analyze("http://minio/b/k.jpg").await;

        assert_eq!(result.status, RecognitionStatus::Unavailable);
        assert!(result.detections.is_empty());
        assert!(result.error.unwrap().contains("500"));
    }

    #[tokio::test]
    async fn slow_service_times_out_as_unavailable() {
        let config = serve_once(Duration::from_secs(3), "200 OK", r#"{"detections": []}"#).await;
        let client = HttpRecognitionClient::new(&config).unwrap();

        let result = client.analyze("http://minio/b/k.jpg").await;

        assert_eq!(result.status, RecognitionStatus::Unavailable);
        assert!(result.detections.is_empty());
        assert!(result.error.unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn analyzed_meal_survives_a_null_supplement() {
        let body = r#"{"success": true, "count": 2, "detections": [
            {"class_id": 5, "name": "bibimbap", "nutrition": {"calories": 560, "protein": 18}},
            {"class_id": 8, "name": "japchae", "solution": {"supplements": null}}
        ]}"#;
        let config = serve_once(Duration::ZERO, "200 OK", body).await;
        let client = HttpRecognitionClient::new(&config).unwrap();

        let result = client.analyze("http://minio/b/k.jpg").await;

        assert_eq!(result.status, RecognitionStatus::Completed);
        assert_eq!(result.detections.len(), 2);
        assert_eq!(result.detections[0].name, "bibimbap");
    }
}
