use async_trait::async_trait;
use rand::Rng;
use reqwest::Response;
use tracing::{debug, instrument};

use crate::{
    services::PokemonSource,
    types::pokemon::{Pokemon, PokemonResponse},
    Error,
};

#[derive(Debug, Clone)]
pub struct PokeApi {
    http: reqwest::Client,
    endpoint: String,
}

impl PokeApi {
    const ENDPOINT: &'static str = "https://pokeapi.co/api/v2/pokemon";

    /// First generation only.
    pub const MAX_ID: u32 = 151;

    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            endpoint: Self::ENDPOINT.to_owned(),
        }
    }

    /// Points the client at another PokéAPI deployment.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn random_id<R: Rng + ?Sized>(rng: &mut R) -> u32 {
        rng.gen_range(1..=Self::MAX_ID)
    }

    #[instrument(skip(self))]
    pub async fn pokemon(&self, id: u32) -> Result<Pokemon, Error> {
        let network = |source| Error::Network {
            endpoint: self.endpoint.clone(),
            source,
        };

        let response = self
            .http
            .get(format!("{}/{}/", self.endpoint, id))
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(network)?;

        let pokemon: Pokemon = response
            .json::<PokemonResponse>()
            .await
            .map_err(network)?
            .into();

        debug!(?pokemon, "Pokémon fetched.");
        Ok(pokemon)
    }
}

#[async_trait]
impl PokemonSource for PokeApi {
    async fn random_pokemon(&self) -> Result<Pokemon, Error> {
        let id = Self::random_id(&mut rand::thread_rng());
        self.pokemon(id).await
    }
}
