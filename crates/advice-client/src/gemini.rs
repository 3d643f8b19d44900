//! Gemini `generateContent` backend

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::advisor::AdviceBackend;
use crate::AdviceError;

/// Header carrying the API key, kept out of request URLs
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini backend configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key, empty means the backend is disabled
    pub api_key: String,
    pub base_url: String,
    pub api_version: String,
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: f32,
    pub top_k: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_version: "v1".to_string(),
            model: "gemini-2.0-flash".to_string(),
            timeout_secs: 15,
            temperature: 0.8,
            max_output_tokens: 300,
            top_p: 0.95,
            top_k: 40,
        }
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl GeminiConfig {
    /// Create a config with the default model
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    fn models_url(&self) -> String {
        format!(
            "{}/{}/models",
            self.base_url.trim_end_matches('/'),
            self.api_version
        )
    }

    fn generate_url(&self) -> String {
        format!("{}/{}:generateContent", self.models_url(), self.model)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
    top_k: u32,
    candidate_count: u32,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(prompt: &'a str, config: &GeminiConfig) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: config.temperature,
                max_output_tokens: config.max_output_tokens,
                top_p: config.top_p,
                top_k: config.top_k,
                candidate_count: 1,
            },
            safety_settings: vec![SafetySetting {
                category: "HARM_CATEGORY_DANGEROUS_CONTENT",
                threshold: "BLOCK_NONE",
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelInfo {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

/// HTTP client for the Gemini API
pub struct GeminiClient {
    config: GeminiConfig,
    http: Client,
}

impl GeminiClient {
    /// Create a client, fails when no API key is set
    pub fn new(config: GeminiConfig) -> Result<Self, AdviceError> {
        if !config.is_configured() {
            return Err(AdviceError::NotConfigured);
        }

        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AdviceError::Unknown(e.to_string()))?;

        info!(
            "Creating Gemini client for model {} ({})",
            config.model, config.api_version
        );

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Send one prompt and return the first candidate's text
    pub async fn generate_content(&self, prompt: &str) -> Result<String, AdviceError> {
        let body = GenerateContentRequest::new(prompt, &self.config);

        let response = self
            .http
            .post(self.config.generate_url())
            .header(API_KEY_HEADER, self.config.api_key.as_str())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            debug!("Gemini returned status {}", status);
            return Err(AdviceError::Http {
                status: status.as_u16(),
            });
        }

        let raw = response.text().await?;
        let parsed: GenerateContentResponse =
            serde_json::from_str(&raw).map_err(|e| AdviceError::MalformedResponse {
                detail: Some(e.to_string()),
            })?;

        parsed
            .into_text()
            .ok_or(AdviceError::MalformedResponse { detail: None })
    }

    /// List models that support `generateContent`
    pub async fn list_models(&self) -> Result<Vec<String>, AdviceError> {
        let response = self
            .http
            .get(self.config.models_url())
            .header(API_KEY_HEADER, self.config.api_key.as_str())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdviceError::Http {
                status: status.as_u16(),
            });
        }

        let raw = response.text().await?;
        let list: ModelList = serde_json::from_str(&raw).map_err(|e| AdviceError::MalformedResponse {
            detail: Some(e.to_string()),
        })?;

        Ok(list
            .models
            .into_iter()
            .filter(|m| m.supported_generation_methods.iter().any(|g| g == "generateContent"))
            .map(|m| m.name)
            .collect())
    }
}

#[async_trait]
impl AdviceBackend for GeminiClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, AdviceError> {
        self.generate_content(prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serve one canned HTTP response on a local port and return its base URL
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        serve_capturing(status_line, body).await.0
    }

    /// Like `serve_once`, also handing back the raw request text
    async fn serve_capturing(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            tx.send(request).ok();
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        (format!("http://{}", addr), rx)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                return String::from_utf8_lossy(&buf).into_owned();
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    return text.into_owned();
                }
            }
        }
    }

    fn client_for(base_url: String) -> GeminiClient {
        GeminiClient::new(GeminiConfig {
            base_url,
            timeout_secs: 1,
            ..GeminiConfig::new("test-key")
        })
        .unwrap()
    }

    #[test]
    fn test_missing_key_is_not_configured() {
        let result = GeminiClient::new(GeminiConfig::default());
        assert!(matches!(result, Err(AdviceError::NotConfigured)));
    }

    #[test]
    fn test_urls() {
        let config = GeminiConfig {
            base_url: "https://example.test/".to_string(),
            ..GeminiConfig::new("k")
        };
        assert_eq!(config.models_url(), "https://example.test/v1/models");
        assert_eq!(
            config.generate_url(),
            "https://example.test/v1/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", GeminiConfig::new("secret-key"));
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_request_body_shape() {
        let config = GeminiConfig::new("k");
        let body = serde_json::to_value(GenerateContentRequest::new("hello", &config)).unwrap();

        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 300);
        assert_eq!(body["generationConfig"]["topK"], 40);
        assert_eq!(body["generationConfig"]["candidateCount"], 1);
        assert_eq!(body["safetySettings"][0]["threshold"], "BLOCK_NONE");
    }

    #[test]
    fn test_response_text_extraction() {
        let parsed: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Stay indoors."}],"role":"model"}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.into_text().as_deref(), Some("Stay indoors."));

        let empty: GenerateContentResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(empty.into_text().is_none());

        let no_content: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert!(no_content.into_text().is_none());
    }

    #[tokio::test]
    async fn test_generate_success() {
        let base = serve_once(
            "200 OK",
            r#"{"candidates":[{"content":{"parts":[{"text":"Yes, go early."}]}}]}"#,
        )
        .await;

        let text = client_for(base).generate_content("prompt").await.unwrap();
        assert_eq!(text, "Yes, go early.");
    }

    #[tokio::test]
    async fn test_generate_rate_limited() {
        let base = serve_once("429 Too Many Requests", r#"{"error":{}}"#).await;

        let err = client_for(base).generate_content("prompt").await.unwrap_err();
        assert!(matches!(err, AdviceError::Http { status: 429 }));
    }

    #[tokio::test]
    async fn test_generate_unexpected_format() {
        let base = serve_once("200 OK", r#"{"promptFeedback":{}}"#).await;

        let err = client_for(base).generate_content("prompt").await.unwrap_err();
        assert!(matches!(err, AdviceError::MalformedResponse { detail: None }));
    }

    #[tokio::test]
    async fn test_generate_invalid_json() {
        let base = serve_once("200 OK", "not json").await;

        let err = client_for(base).generate_content("prompt").await.unwrap_err();
        assert!(matches!(err, AdviceError::MalformedResponse { detail: Some(_) }));
    }

    #[tokio::test]
    async fn test_generate_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let err = client_for(format!("http://{}", addr))
            .generate_content("prompt")
            .await
            .unwrap_err();
        assert!(matches!(err, AdviceError::Timeout));
    }

    #[tokio::test]
    async fn test_list_models_filters_generate_content() {
        let base = serve_once(
            "200 OK",
            r#"{"models":[
                {"name":"models/gemini-2.0-flash","supportedGenerationMethods":["generateContent","countTokens"]},
                {"name":"models/embedding-001","supportedGenerationMethods":["embedContent"]}
            ]}"#,
        )
        .await;

        let models = client_for(base).list_models().await.unwrap();
        assert_eq!(models, vec!["models/gemini-2.0-flash".to_string()]);
    }

    #[tokio::test]
    async fn test_api_key_sent_as_header() {
        let (base, request) = serve_capturing(
            "200 OK",
            r#"{"candidates":[{"content":{"parts":[{"text":"ok"}]}}]}"#,
        )
        .await;

        client_for(base).generate_content("prompt").await.unwrap();

        let request = request.await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert!(!request_line.contains("test-key"));
        assert!(request
            .lines()
            .any(|l| l.eq_ignore_ascii_case("x-goog-api-key: test-key")));
    }

    #[tokio::test]
    async fn test_transport_error_does_not_expose_key() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = GeminiClient::new(GeminiConfig {
            base_url: format!("http://{}", addr),
            timeout_secs: 1,
            ..GeminiConfig::new("SECRET-KEY-123")
        })
        .unwrap();

        let err = client.list_models().await.unwrap_err();
        assert!(!err.to_string().contains("SECRET-KEY-123"));
        assert!(!err.user_message().contains("SECRET-KEY-123"));
        assert!(!err.to_string().contains(&addr.to_string()));

        let err = client.generate_content("prompt").await.unwrap_err();
        assert!(!err.to_string().contains("SECRET-KEY-123"));
        assert!(!err.user_message().contains("SECRET-KEY-123"));
    }
}
