//! Clients for the upstream services used to build a generation:
//! PokéAPI for the creature, EdenAI for the phrase and the picture.

pub mod completion_api;
pub mod errors;
pub mod image_api;
pub mod pokemon_api;
pub mod services;
pub mod types;

pub use errors::Error;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Builds the HTTP client shared by every API in this crate.
pub fn http_client() -> Result<reqwest::Client, Error> {
    reqwest::ClientBuilder::new()
        .user_agent(USER_AGENT)
        .build()
        .map_err(Error::HttpClientCreation)
}
