use serde::{Deserialize, Serialize};

use crate::Error;

pub const SUCCESS_STATUS: &str = "success";
pub const DEFAULT_GENERATION_ERROR: &str = "Image generation failed";

#[derive(Debug, Serialize)]
pub struct ImageGenerationRequest<'a> {
    pub model: &'a str,
    pub input: ImageGenerationInput<'a>,
    pub show_original_response: bool,
}

#[derive(Debug, Serialize)]
pub struct ImageGenerationInput<'a> {
    pub text: &'a str,
    pub resolution: &'a str,
    pub num_images: u32,
}

#[derive(Debug, Deserialize)]
pub struct ImageGenerationResponse {
    pub status: Option<String>,
    pub output: Option<ImageOutput>,
    /// Left untyped since providers report either a string or an object here.
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct ImageOutput {
    pub items: Option<Vec<ImageItem>>,
}

#[derive(Debug, Deserialize)]
pub struct ImageItem {
    pub image_resource_url: Option<String>,
    pub image: Option<String>,
}

impl ImageGenerationResponse {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(SUCCESS_STATUS)
    }

    /// URL of the first generated image. The hosted `image_resource_url` is
    /// preferred over the inline `image` field.
    pub fn image_url(&self) -> Option<&str> {
        let item = self.output.as_ref()?.items.as_ref()?.first()?;

        item.image_resource_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .or_else(|| item.image.as_deref().filter(|url| !url.is_empty()))
    }

    /// The upstream `error` payload as text, or [`DEFAULT_GENERATION_ERROR`].
    pub fn error_message(&self) -> String {
        match &self.error {
            None | Some(serde_json::Value::Null) => DEFAULT_GENERATION_ERROR.to_owned(),
            Some(serde_json::Value::String(message)) => message.clone(),
            Some(other) => other.to_string(),
        }
    }

    pub fn into_image_url(self) -> Result<String, Error> {
        if !self.is_success() {
            return Err(Error::Generation(self.error_message()));
        }

        self.image_url()
            .map(ToOwned::to_owned)
            .ok_or_else(|| Error::Generation("No image was returned".to_owned()))
    }
}
