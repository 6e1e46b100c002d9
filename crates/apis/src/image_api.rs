use async_trait::async_trait;
use reqwest::Response;
use tracing::{debug, info, instrument};

use utility::config::EdenAiConfig;

use crate::{
    services::ImageSource,
    types::image::{ImageGenerationInput, ImageGenerationRequest, ImageGenerationResponse},
    Error,
};

/// Builds the text sent to the image model.
pub fn image_prompt(pokemon: &str, phrase: &str) -> String {
    format!("A {pokemon} pokemon in {phrase}")
}

/// Synchronous text-to-image generation through EdenAI's universal endpoint.
#[derive(Clone)]
pub struct ImageApi {
    http: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
}

impl ImageApi {
    const ENDPOINT: &'static str = "https://api.edenai.run/v3/universal-ai/";
    const MODEL: &'static str = "image/generation/bytedance/seedream-3-0-t2i-250415";
    const RESOLUTION: &'static str = "1024x1024";

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
    pub async fn generate(&self, prompt: &str) -> Result<ImageGenerationResponse, Error> {
        let network = |source| Error::Network {
            endpoint: self.endpoint.clone(),
            source,
        };

        let body = ImageGenerationRequest {
            model: Self::MODEL,
            input: ImageGenerationInput {
                text: prompt,
                resolution: Self::RESOLUTION,
                num_images: 1,
            },
            show_original_response: false,
        };

        let mut request = self.http.post(&self.endpoint).json(&body);

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(network)?;

        response.json().await.map_err(network)
    }
}

#[async_trait]
impl ImageSource for ImageApi {
    async fn generate_image(&self, pokemon: &str, phrase: &str) -> Result<String, Error> {
        let prompt = image_prompt(pokemon, phrase);
        info!(%prompt, "Generating image.");

        let response = self.generate(&prompt).await?;

        // The orchestrator logs the resulting error once at error level.
        if !response.is_success() {
            debug!(
                payload = ?response.error,
                status = ?response.status,
                error = %response.error_message(),
                "Image generation was not successful."
            );
        }

        response.into_image_url()
    }
}

impl std::fmt::Debug for ImageApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageApi")
            .field("endpoint", &self.endpoint)
            .field("authenticated", &self.api_key.is_some())
            .finish_non_exhaustive()
    }
}
