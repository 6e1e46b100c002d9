use async_trait::async_trait;
use reqwest::Response;
use tracing::{info, instrument};

use utility::config::EdenAiConfig;

use crate::{
    services::PhraseSource,
    types::completion::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage},
    Error,
};

pub const FALLBACK_PHRASE: &str = "Lieu inconnu";

const PROMPT: &str = "Give me a place and an uncanny activity. \
Answer only with the name of the place or activity, without any explanation or additional sentence.";

/// Chat completions through EdenAI's OpenAI compatible endpoint.
#[derive(Clone)]
pub struct CompletionApi {
    http: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
}

impl CompletionApi {
    const ENDPOINT: &'static str = "https://api.edenai.run/v3/llm/chat/completions";
    const MODEL: &'static str = "openai/gpt-4o";
    const TEMPERATURE: f64 = 0.9;

    pub fn new(http: reqwest::Client, config: &EdenAiConfig) -> Self {
        Self {
            http,
            api_key: config.api_key.clone(),
            endpoint: Self::ENDPOINT.to_owned(),
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[instrument(skip(self))]
    pub async fn complete(&self, prompt: &str) -> Result<ChatCompletionResponse, Error> {
        let upstream = |source| Error::Upstream {
            endpoint: self.endpoint.clone(),
            source,
        };

        let body = ChatCompletionRequest {
            model: Self::MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: Self::TEMPERATURE,
        };

        let mut request = self.http.post(&self.endpoint).json(&body);

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(upstream)?;

        response.json().await.map_err(upstream)
    }
}

#[async_trait]
impl PhraseSource for CompletionApi {
    async fn generate_phrase(&self) -> Result<String, Error> {
        let completion = self.complete(PROMPT).await?;
        let phrase = completion.content_or(FALLBACK_PHRASE).to_owned();

        info!(%phrase, "Phrase generated.");
        Ok(phrase)
    }
}

impl std::fmt::Debug for CompletionApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionApi")
            .field("endpoint", &self.endpoint)
            .field("authenticated", &self.api_key.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        matchers::{body_partial_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    fn api(server: &MockServer, api_key: Option<&str>) -> CompletionApi {
        let config = EdenAiConfig {
            api_key: api_key.map(ToOwned::to_owned),
        };

        CompletionApi::new(reqwest::Client::new(), &config)
            .with_endpoint(format!("{}/v3/llm/chat/completions", server.uri()))
    }

    #[tokio::test]
    async fn sends_prompt_with_bearer_key() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v3/llm/chat/completions"))
            .and(header("authorization", "Bearer secret"))
            .and(body_partial_json(json!({
                "model": "openai/gpt-4o",
                "temperature": 0.9,
                "messages": [{ "role": "user", "content": PROMPT }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "role": "assistant", "content": "  A haunted laundromat \n" } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let phrase = api(&server, Some("secret")).generate_phrase().await.unwrap();

        assert_eq!(phrase, "A haunted laundromat");
    }

    #[tokio::test]
    async fn no_choices_falls_back_without_auth_header() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v3/llm/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let phrase = api(&server, None).generate_phrase().await.unwrap();
        assert_eq!(phrase, FALLBACK_PHRASE);

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn rejected_key_is_an_upstream_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "error": "invalid api key" })),
            )
            .mount(&server)
            .await;

        let err = api(&server, Some("wrong")).generate_phrase().await.unwrap_err();

        match err {
            Error::Upstream { endpoint, .. } => {
                assert_eq!(endpoint, format!("{}/v3/llm/chat/completions", server.uri()));
            }
            other => panic!("expected an upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreadable_body_is_an_upstream_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = api(&server, Some("secret")).generate_phrase().await.unwrap_err();

        assert!(matches!(err, Error::Upstream { .. }), "got {err:?}");
    }
}
