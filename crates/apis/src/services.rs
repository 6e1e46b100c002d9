use async_trait::async_trait;

use crate::{types::pokemon::Pokemon, Error};

#[async_trait]
pub trait PokemonSource: Send + Sync {
    async fn random_pokemon(&self) -> Result<Pokemon, Error>;
}

#[async_trait]
pub trait PhraseSource: Send + Sync {
    /// Never returns an empty string.
    async fn generate_phrase(&self) -> Result<String, Error>;
}

#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Returns the URL of the generated picture.
    async fn generate_image(&self, pokemon: &str, phrase: &str) -> Result<String, Error>;
}
