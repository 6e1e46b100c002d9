use serde::Deserialize;

/// What a generation needs to know about a Pokémon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pokemon {
    pub name: String,
    pub artwork_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PokemonResponse {
    pub name: String,
    pub sprites: Option<Sprites>,
}

#[derive(Debug, Deserialize)]
pub struct Sprites {
    pub front_default: Option<String>,
    pub other: Option<OtherSprites>,
}

#[derive(Debug, Deserialize)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork")]
    pub official_artwork: Option<ArtworkSprites>,
}

#[derive(Debug, Deserialize)]
pub struct ArtworkSprites {
    pub front_default: Option<String>,
}

impl PokemonResponse {
    /// Picks the picture shown next to a generation.
    ///
    /// The high resolution `sprites.other["official-artwork"].front_default` is
    /// preferred, then `sprites.front_default`. Returns `None` if neither is set.
    pub fn artwork_url(&self) -> Option<&str> {
        let sprites = self.sprites.as_ref()?;

        sprites
            .other
            .as_ref()
            .and_then(|other| other.official_artwork.as_ref())
            .and_then(|artwork| artwork.front_default.as_deref())
            .or(sprites.front_default.as_deref())
    }
}

impl From<PokemonResponse> for Pokemon {
    fn from(response: PokemonResponse) -> Self {
        let artwork_url = response.artwork_url().map(ToOwned::to_owned);

        Self {
            name: response.name,
            artwork_url,
        }
    }
}
