use super::{AgentMessage, CompletionClient};
use crate::config::LlmConfig;
use crate::error::LlmError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Sampling temperature sent with every request
const TEMPERATURE: f64 = 0.0;

/// Client for OpenAI-compatible `/chat/completions` endpoints
pub struct ChatClient {
    api_base: String,
    api_key: Option<String>,
    model: String,
    http_client: Client,
}

impl ChatClient {
    pub fn new(config: &LlmConfig, api_key: Option<String>) -> Result<Self, LlmError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_sec))
            .build()
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        Ok(Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: config.model.clone(),
            http_client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: &'a [AgentMessage],
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Pull a human-readable message out of an error body.
///
/// Gemini sometimes wraps the error object in a one-element array.
fn parse_error_message(body: &str) -> String {
    if let Ok(resp) = serde_json::from_str::<ApiErrorResponse>(body) {
        return resp.error.message;
    }
    if let Ok(mut list) = serde_json::from_str::<Vec<ApiErrorResponse>>(body) {
        if !list.is_empty() {
            return list.swap_remove(0).error.message;
        }
    }
    body.trim().to_string()
}

#[async_trait]
impl CompletionClient for ChatClient {
    async fn complete(&self, messages: &[AgentMessage]) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let url = format!("{}/chat/completions", self.api_base);
        let request = ApiRequest {
            model: &self.model,
            messages,
            temperature: TEMPERATURE,
        };

        debug!("Sending {} messages to {} ({})", messages.len(), url, self.model);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            let message = parse_error_message(&body);
            let code = status.as_u16();

            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Auth { code, message },
                StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited(message),
                _ => LlmError::Api { code, message },
            });
        }

        let body: ApiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Accept one connection, capture the raw request, answer with a canned response
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
                    let len = head
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if buf.len() >= pos + 4 + len {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&buf).to_string()
        });

        (format!("http://{}", addr), handle)
    }

    fn client_for(api_base: String, key: Option<&str>) -> ChatClient {
        let config = LlmConfig {
            api_base,
            request_timeout_sec: 5,
            ..Default::default()
        };
        ChatClient::new(&config, key.map(str::to_string)).unwrap()
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        // Port 9 (discard) would yield RequestFailed if a request were attempted
        let client = client_for("http://127.0.0.1:9".to_string(), None);
        let err = client
            .complete(&[AgentMessage::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }

    #[tokio::test]
    async fn test_blank_key_counts_as_missing() {
        let client = client_for("http://127.0.0.1:9".to_string(), Some("   "));
        let err = client
            .complete(&[AgentMessage::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }

    #[tokio::test]
    async fn test_successful_completion() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"- missing ages"},"finish_reason":"stop"}]}"#,
        )
        .await;
        let client = client_for(base, Some("test-key"));

        let text = client
            .complete(&[AgentMessage::system("sys"), AgentMessage::user("preview")])
            .await
            .unwrap();
        assert_eq!(text, "- missing ages");

        let request = server.await.unwrap();
        let lower = request.to_lowercase();
        assert!(lower.starts_with("post /chat/completions"));
        assert!(lower.contains("authorization: bearer test-key"));
        assert!(request.contains(r#""temperature":0.0"#));
        assert!(request.contains(r#""model":"gemini-2.5-flash""#));
        assert!(request.contains(r#"{"role":"system","content":"sys"}"#));
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_auth_error() {
        let (base, _server) = serve_once(
            "401 Unauthorized",
            r#"[{"error":{"code":401,"message":"API key not valid","status":"UNAUTHENTICATED"}}]"#,
        )
        .await;
        let client = client_for(base, Some("bad"));

        let err = client.complete(&[AgentMessage::user("hi")]).await.unwrap_err();
        match err {
            LlmError::Auth { code, message } => {
                assert_eq!(code, 401);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_rate_limited() {
        let (base, _server) =
            serve_once("429 Too Many Requests", r#"{"error":{"message":"quota exceeded"}}"#).await;
        let client = client_for(base, Some("k"));

        let err = client.complete(&[AgentMessage::user("hi")]).await.unwrap_err();
        assert!(matches!(err, LlmError::RateLimited(ref m) if m == "quota exceeded"));
    }

    #[tokio::test]
    async fn test_empty_choices_is_an_error() {
        let (base, _server) = serve_once("200 OK", r#"{"choices":[]}"#).await;
        let client = client_for(base, Some("k"));

        let err = client.complete(&[AgentMessage::user("hi")]).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }

    #[test]
    fn test_parse_error_message_falls_back_to_body() {
        assert_eq!(parse_error_message("  upstream exploded \n"), "upstream exploded");
        assert_eq!(
            parse_error_message(r#"{"error":{"message":"bad model","type":"invalid"}}"#),
            "bad model"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = client_for("https://example.test/v1/".to_string(), Some("k"));
        assert_eq!(client.api_base, "https://example.test/v1");
        assert_eq!(client.model(), "gemini-2.5-flash");
    }
}
