//! REST client for the cloud synthesis and batch recognition engines
//!
//! Implements `SynthesisEngine` against the `v1/text:synthesize` endpoint
//! and `RecognitionEngine` against the `v1/speech:recognize` endpoint.
//! Both run under one fixed profile: the configured locale/gender voice
//! with MP3 output for synthesis, and LINEAR16 / 16 kHz / automatic
//! punctuation for recognition. Audio crosses the wire base64-encoded.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::SpeechConfig;
use crate::credentials::Credentials;
use crate::error::SpeechError;
use crate::ports::{RecognitionEngine, SynthesisEngine};
use crate::types::RecognitionResult;

/// Batch recognition profile (fixed by the relay contract)
const BATCH_ENCODING: &str = "LINEAR16";
const BATCH_SAMPLE_RATE_HERTZ: u32 = 16_000;

/// Synthesis output encoding (fixed by the relay contract)
const SYNTHESIS_ENCODING: &str = "MP3";

/// REST adapter for the synthesis and batch recognition engines
#[derive(Debug, Clone)]
pub struct CloudSpeechClient {
    client: Client,
    config: Arc<SpeechConfig>,
    credentials: Arc<Credentials>,
}

impl CloudSpeechClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is
    /// invalid or the HTTP client cannot be constructed.
    pub fn new(
        config: Arc<SpeechConfig>,
        credentials: Arc<Credentials>,
    ) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                SpeechError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            config,
            credentials,
        })
    }

    /// Build the synthesis endpoint URL
    fn synthesis_url(&self) -> String {
        format!(
            "{}/v1/text:synthesize",
            self.config.synthesis_base_url.trim_end_matches('/')
        )
    }

    /// Build the batch recognition endpoint URL
    fn recognition_url(&self) -> String {
        format!(
            "{}/v1/speech:recognize",
            self.config.recognition_base_url.trim_end_matches('/')
        )
    }

    /// Pull a service error message out of a failure body, if one exists
    fn engine_message(status: reqwest::StatusCode, body: &str) -> String {
        serde_json::from_str::<EngineErrorBody>(body)
            .map_or_else(|_| format!("HTTP {status}: {body}"), |e| e.error.message)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelection<'a>,
    audio_config: AudioConfig<'a>,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: &'a str,
    ssml_gender: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig<'a> {
    audio_encoding: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: String,
}

#[derive(Debug, Serialize)]
struct RecognizeRequest<'a> {
    config: RecognitionConfig<'a>,
    audio: RecognitionAudio,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig<'a> {
    encoding: &'a str,
    sample_rate_hertz: u32,
    language_code: &'a str,
    enable_automatic_punctuation: bool,
}

#[derive(Debug, Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

#[derive(Debug, Deserialize)]
struct EngineErrorBody {
    error: EngineErrorDetail,
}

#[derive(Debug, Deserialize)]
struct EngineErrorDetail {
    message: String,
}

#[async_trait]
impl SynthesisEngine for CloudSpeechClient {
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::Synthesis(
                "Text cannot be empty".to_string(),
            ));
        }

        let request = SynthesizeRequest {
            input: SynthesisInput { text },
            voice: VoiceSelection {
                language_code: &self.config.language_code,
                ssml_gender: &self.config.voice_gender,
            },
            audio_config: AudioConfig {
                audio_encoding: SYNTHESIS_ENCODING,
            },
        };

        let response = self
            .client
            .post(self.synthesis_url())
            .bearer_auth(self.credentials.api_key())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Synthesis(Self::engine_message(status, &body)));
        }

        let payload: SynthesizeResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        let audio = BASE64.decode(payload.audio_content).map_err(|e| {
            SpeechError::InvalidResponse(format!("Audio content is not valid base64: {e}"))
        })?;

        debug!(audio_size = audio.len(), "Speech synthesis complete");

        Ok(audio)
    }
}

#[async_trait]
impl RecognitionEngine for CloudSpeechClient {
    #[instrument(skip(self, audio), fields(audio_size = audio.len()))]
    async fn recognize(&self, audio: &[u8]) -> Result<Vec<RecognitionResult>, SpeechError> {
        if audio.is_empty() {
            return Err(SpeechError::Recognition(
                "Audio data is empty".to_string(),
            ));
        }

        let request = RecognizeRequest {
            config: RecognitionConfig {
                encoding: BATCH_ENCODING,
                sample_rate_hertz: BATCH_SAMPLE_RATE_HERTZ,
                language_code: &self.config.language_code,
                enable_automatic_punctuation: true,
            },
            audio: RecognitionAudio {
                content: BASE64.encode(audio),
            },
        };

        let response = self
            .client
            .post(self.recognition_url())
            .bearer_auth(self.credentials.api_key())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Recognition(Self::engine_message(
                status, &body,
            )));
        }

        let payload: RecognizeResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        debug!(
            result_count = payload.results.len(),
            "Batch recognition complete"
        );

        Ok(payload.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::join_transcripts;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_credentials() -> Arc<Credentials> {
        Arc::new(serde_json::from_str::<Credentials>(r#"{"api_key": "test-api-key"}"#).unwrap())
    }

    fn create_test_client(mock_server: &MockServer) -> CloudSpeechClient {
        let config = SpeechConfig {
            synthesis_base_url: mock_server.uri(),
            recognition_base_url: mock_server.uri(),
            ..Default::default()
        };
        CloudSpeechClient::new(Arc::new(config), test_credentials()).unwrap()
    }

    mod synthesis_tests {
        use super::*;

        #[tokio::test]
        async fn synthesize_decodes_audio_content() {
            let mock_server = MockServer::start().await;
            let audio = b"mp3-bytes".to_vec();

            Mock::given(method("POST"))
                .and(path("/v1/text:synthesize"))
                .and(header("authorization", "Bearer test-api-key"))
                .and(body_partial_json(serde_json::json!({
                    "input": {"text": "Hello, world!"},
                    "audioConfig": {"audioEncoding": "MP3"}
                })))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "audioContent": BASE64.encode(&audio)
                })))
                .expect(1)
                .mount(&mock_server)
                .await;

            let client = create_test_client(&mock_server);

            let result = client.synthesize("Hello, world!").await.unwrap();

            assert_eq!(result, audio);
        }

        #[tokio::test]
        async fn synthesize_sends_fixed_voice_profile() {
            let mock_server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/v1/text:synthesize"))
                .and(body_partial_json(serde_json::json!({
                    "voice": {"languageCode": "en-US", "ssmlGender": "FEMALE"}
                })))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "audioContent": BASE64.encode(b"x")
                })))
                .expect(1)
                .mount(&mock_server)
                .await;

            let client = create_test_client(&mock_server);

            assert!(client.synthesize("Test").await.is_ok());
        }

        #[tokio::test]
        async fn synthesize_empty_text_fails_without_a_request() {
            let mock_server = MockServer::start().await;
            let client = create_test_client(&mock_server);

            let result = client.synthesize("   ").await;

            assert!(matches!(result, Err(SpeechError::Synthesis(_))));
        }

        #[tokio::test]
        async fn synthesize_maps_engine_error_message() {
            let mock_server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/v1/text:synthesize"))
                .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                    "error": {"message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}
                })))
                .expect(1)
                .mount(&mock_server)
                .await;

            let client = create_test_client(&mock_server);

            let result = client.synthesize("Test").await;

            let Err(SpeechError::Synthesis(message)) = result else {
                unreachable!("expected synthesis error");
            };
            assert_eq!(message, "Quota exceeded");
        }

        #[tokio::test]
        async fn synthesize_rejects_invalid_base64() {
            let mock_server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/v1/text:synthesize"))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "audioContent": "not base64!!"
                })))
                .mount(&mock_server)
                .await;

            let client = create_test_client(&mock_server);

            let result = client.synthesize("Test").await;

            assert!(matches!(result, Err(SpeechError::InvalidResponse(_))));
        }
    }

    mod recognition_tests {
        use super::*;

        #[tokio::test]
        async fn recognize_parses_results_in_order() {
            let mock_server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/v1/speech:recognize"))
                .and(header("authorization", "Bearer test-api-key"))
                .and(body_partial_json(serde_json::json!({
                    "config": {
                        "encoding": "LINEAR16",
                        "sampleRateHertz": 16000,
                        "languageCode": "en-US",
                        "enableAutomaticPunctuation": true
                    }
                })))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "results": [
                        {"alternatives": [{"transcript": "hello"}]},
                        {"alternatives": [{"transcript": "world"}]}
                    ]
                })))
                .expect(1)
                .mount(&mock_server)
                .await;

            let client = create_test_client(&mock_server);

            let results = client.recognize(b"pcm-bytes").await.unwrap();

            assert_eq!(join_transcripts(&results), "hello world");
        }

        #[tokio::test]
        async fn recognize_sends_base64_content() {
            let mock_server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/v1/speech:recognize"))
                .and(body_partial_json(serde_json::json!({
                    "audio": {"content": BASE64.encode(b"pcm-bytes")}
                })))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "results": []
                })))
                .expect(1)
                .mount(&mock_server)
                .await;

            let client = create_test_client(&mock_server);

            assert!(client.recognize(b"pcm-bytes").await.is_ok());
        }

        #[tokio::test]
        async fn recognize_tolerates_missing_alternatives() {
            let mock_server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/v1/speech:recognize"))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "results": [
                        {"alternatives": [{"transcript": "kept"}]},
                        {},
                        {"alternatives": []}
                    ]
                })))
                .mount(&mock_server)
                .await;

            let client = create_test_client(&mock_server);

            let results = client.recognize(b"pcm").await.unwrap();

            assert_eq!(results.len(), 3);
            assert_eq!(join_transcripts(&results), "kept");
        }

        #[tokio::test]
        async fn recognize_tolerates_absent_results_field() {
            let mock_server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/v1/speech:recognize"))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
                .mount(&mock_server)
                .await;

            let client = create_test_client(&mock_server);

            let results = client.recognize(b"pcm").await.unwrap();

            assert!(results.is_empty());
        }

        #[tokio::test]
        async fn recognize_empty_audio_fails_without_a_request() {
            let mock_server = MockServer::start().await;
            let client = create_test_client(&mock_server);

            let result = client.recognize(b"").await;

            assert!(matches!(result, Err(SpeechError::Recognition(_))));
        }

        #[tokio::test]
        async fn recognize_maps_engine_failure() {
            let mock_server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/v1/speech:recognize"))
                .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                    "error": {"message": "Backend unavailable"}
                })))
                .mount(&mock_server)
                .await;

            let client = create_test_client(&mock_server);

            let result = client.recognize(b"pcm").await;

            let Err(SpeechError::Recognition(message)) = result else {
                unreachable!("expected recognition error");
            };
            assert_eq!(message, "Backend unavailable");
        }
    }

    mod config_tests {
        use super::*;

        #[test]
        fn new_fails_with_invalid_config() {
            let config = SpeechConfig {
                timeout_ms: 0,
                ..Default::default()
            };

            let result = CloudSpeechClient::new(Arc::new(config), test_credentials());

            assert!(matches!(result, Err(SpeechError::Configuration(_))));
        }

        #[test]
        fn urls_tolerate_trailing_slash() {
            let config = SpeechConfig {
                synthesis_base_url: "http://localhost:9000/".to_string(),
                recognition_base_url: "http://localhost:9001/".to_string(),
                ..Default::default()
            };
            let client =
                CloudSpeechClient::new(Arc::new(config), test_credentials()).unwrap();

            assert_eq!(
                client.synthesis_url(),
                "http://localhost:9000/v1/text:synthesize"
            );
            assert_eq!(
                client.recognition_url(),
                "http://localhost:9001/v1/speech:recognize"
            );
        }
    }
}
