//! The `/generate` pipeline.
//!
//! A random Pokémon and a surreal phrase are fetched concurrently, then turned
//! into a picture. Every invocation answers exactly twice: a placeholder first,
//! then a single edit holding either the finished card or a generic failure
//! message. Upstream error details only go to the operator log.

use std::sync::Arc;

use anyhow::Context as _;
use async_trait::async_trait;
use tracing::{debug, error, info, instrument};

use apis::{
    services::{ImageSource, PhraseSource, PokemonSource},
    types::pokemon::Pokemon,
};
use utility::here;

pub const PLACEHOLDER: &str = "Loading...";
pub const FAILURE_MESSAGE: &str = "Une erreur est survenue lors de la génération.";
pub const FOOTER: &str = "Generated with EdenAI";

/// Discord rejects embed titles longer than this.
const TITLE_LIMIT: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationCard {
    pub title: String,
    pub thumbnail: Option<String>,
    pub image: String,
    pub footer: &'static str,
}

impl GenerationCard {
    pub fn new(pokemon: &Pokemon, phrase: &str, image: String) -> Self {
        let title = format!("{} — {}", pokemon.name, phrase)
            .chars()
            .take(TITLE_LIMIT)
            .collect();

        Self {
            title,
            thumbnail: pokemon.artwork_url.clone(),
            image,
            footer: FOOTER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalReply {
    Card(GenerationCard),
    Failure(&'static str),
}

/// The interaction being answered.
#[async_trait]
pub trait Responder: Send {
    async fn acknowledge(&mut self, content: &str) -> anyhow::Result<()>;
    async fn finish(&mut self, reply: FinalReply) -> anyhow::Result<()>;
}

pub struct Generator {
    pokemon: Arc<dyn PokemonSource>,
    phrases: Arc<dyn PhraseSource>,
    images: Arc<dyn ImageSource>,
}

impl Generator {
    pub fn new(
        pokemon: Arc<dyn PokemonSource>,
        phrases: Arc<dyn PhraseSource>,
        images: Arc<dyn ImageSource>,
    ) -> Self {
        Self {
            pokemon,
            phrases,
            images,
        }
    }

    #[instrument(skip(self))]
    pub async fn generate(&self) -> Result<GenerationCard, apis::Error> {
        let (pokemon, phrase) = tokio::try_join!(
            self.pokemon.random_pokemon(),
            self.phrases.generate_phrase()
        )?;

        debug!(pokemon = %pokemon.name, %phrase, "Inputs ready.");

        let image = self.images.generate_image(&pokemon.name, &phrase).await?;

        Ok(GenerationCard::new(&pokemon, &phrase, image))
    }

    #[instrument(skip(self, responder))]
    pub async fn respond<R>(&self, responder: &mut R) -> anyhow::Result<()>
    where
        R: Responder + ?Sized,
    {
        responder.acknowledge(PLACEHOLDER).await.context(here!())?;

        let reply = match self.generate().await {
            Ok(card) => {
                info!(title = %card.title, "Generation finished.");
                FinalReply::Card(card)
            }
            Err(e) => {
                error!(command = "generate", error = %e, details = ?e, "Error during generation.");
                FinalReply::Failure(FAILURE_MESSAGE)
            }
        };

        responder.finish(reply).await.context(here!())
    }
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            Mutex,
        },
        time::Duration,
    };

    use apis::Error;
    use tokio::sync::Barrier;
    use tracing_test::traced_test;

    use super::*;

    const ARTWORK: &str = "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork/1.png";
    const IMAGE: &str = "https://cdn.edenai.run/img/bulbasaur.png";

    fn bulbasaur() -> Pokemon {
        Pokemon {
            name: "bulbasaur".to_owned(),
            artwork_url: Some(ARTWORK.to_owned()),
        }
    }

    fn transport_error() -> reqwest::Error {
        reqwest::Client::new()
            .get("not a url")
            .build()
            .unwrap_err()
    }

    #[derive(Default)]
    struct MockPokemon {
        pokemon: Option<Pokemon>,
        barrier: Option<Arc<Barrier>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PokemonSource for MockPokemon {
        async fn random_pokemon(&self) -> Result<Pokemon, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if let Some(barrier) = &self.barrier {
                barrier.wait().await;
            }

            self.pokemon.clone().ok_or_else(|| Error::Network {
                endpoint: "https://pokeapi.co/api/v2/pokemon".to_owned(),
                source: transport_error(),
            })
        }
    }

    #[derive(Default)]
    struct MockPhrase {
        phrase: Option<String>,
        barrier: Option<Arc<Barrier>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PhraseSource for MockPhrase {
        async fn generate_phrase(&self) -> Result<String, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if let Some(barrier) = &self.barrier {
                barrier.wait().await;
            }

            self.phrase.clone().ok_or_else(|| Error::Upstream {
                endpoint: "https://api.edenai.run/v3/llm/chat/completions".to_owned(),
                source: transport_error(),
            })
        }
    }

    struct MockImage {
        result: Result<String, String>,
        requests: Mutex<Vec<(String, String)>>,
    }

    impl MockImage {
        fn returning(result: Result<&str, &str>) -> Self {
            Self {
                result: result.map(ToOwned::to_owned).map_err(ToOwned::to_owned),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ImageSource for MockImage {
        async fn generate_image(&self, pokemon: &str, phrase: &str) -> Result<String, Error> {
            self.requests
                .lock()
                .unwrap()
                .push((pokemon.to_owned(), phrase.to_owned()));

            self.result.clone().map_err(Error::Generation)
        }
    }

    #[derive(Default)]
    struct RecordingResponder {
        placeholders: Vec<String>,
        replies: Vec<FinalReply>,
    }

    impl RecordingResponder {
        fn total(&self) -> usize {
            self.placeholders.len() + self.replies.len()
        }
    }

    #[async_trait]
    impl Responder for RecordingResponder {
        async fn acknowledge(&mut self, content: &str) -> anyhow::Result<()> {
            self.placeholders.push(content.to_owned());
            Ok(())
        }

        async fn finish(&mut self, reply: FinalReply) -> anyhow::Result<()> {
            self.replies.push(reply);
            Ok(())
        }
    }

    struct Harness {
        pokemon: Arc<MockPokemon>,
        phrases: Arc<MockPhrase>,
        images: Arc<MockImage>,
        generator: Generator,
    }

    fn harness(pokemon: MockPokemon, phrases: MockPhrase, images: MockImage) -> Harness {
        let pokemon = Arc::new(pokemon);
        let phrases = Arc::new(phrases);
        let images = Arc::new(images);

        let generator = Generator::new(
            Arc::clone(&pokemon) as Arc<dyn PokemonSource>,
            Arc::clone(&phrases) as Arc<dyn PhraseSource>,
            Arc::clone(&images) as Arc<dyn ImageSource>,
        );

        Harness {
            pokemon,
            phrases,
            images,
            generator,
        }
    }

    fn working() -> Harness {
        harness(
            MockPokemon {
                pokemon: Some(bulbasaur()),
                ..MockPokemon::default()
            },
            MockPhrase {
                phrase: Some("a laundromat that only washes socks".to_owned()),
                ..MockPhrase::default()
            },
            MockImage::returning(Ok(IMAGE)),
        )
    }

    #[traced_test]
    #[tokio::test]
    async fn success_edits_placeholder_into_card() {
        let h = working();
        let mut responder = RecordingResponder::default();

        h.generator.respond(&mut responder).await.unwrap();

        assert_eq!(responder.placeholders, vec![PLACEHOLDER]);
        assert_eq!(responder.total(), 2);

        let FinalReply::Card(card) = &responder.replies[0] else {
            panic!("expected a card, got {:?}", responder.replies[0]);
        };

        assert!(card.title.starts_with("bulbasaur — "));
        assert_eq!(card.title, "bulbasaur — a laundromat that only washes socks");
        assert_eq!(card.thumbnail.as_deref(), Some(ARTWORK));
        assert_eq!(card.image, IMAGE);
        assert_eq!(card.footer, FOOTER);

        assert_eq!(
            *h.images.requests.lock().unwrap(),
            vec![(
                "bulbasaur".to_owned(),
                "a laundromat that only washes socks".to_owned()
            )]
        );
    }

    #[traced_test]
    #[tokio::test]
    async fn generation_failure_is_only_logged() {
        let h = harness(
            MockPokemon {
                pokemon: Some(bulbasaur()),
                ..MockPokemon::default()
            },
            MockPhrase {
                phrase: Some("Lieu inconnu".to_owned()),
                ..MockPhrase::default()
            },
            MockImage::returning(Err("quota exceeded")),
        );
        let mut responder = RecordingResponder::default();

        h.generator.respond(&mut responder).await.unwrap();

        assert_eq!(responder.total(), 2);
        assert_eq!(responder.replies, vec![FinalReply::Failure(FAILURE_MESSAGE)]);
        assert!(!FAILURE_MESSAGE.contains("quota exceeded"));
        assert!(logs_contain("quota exceeded"));
    }

    #[traced_test]
    #[tokio::test]
    async fn pokemon_failure_skips_image_generation() {
        let h = harness(
            MockPokemon::default(),
            MockPhrase {
                phrase: Some("a moonlit parking lot".to_owned()),
                ..MockPhrase::default()
            },
            MockImage::returning(Ok(IMAGE)),
        );
        let mut responder = RecordingResponder::default();

        h.generator.respond(&mut responder).await.unwrap();

        assert_eq!(responder.placeholders, vec![PLACEHOLDER]);
        assert_eq!(responder.replies, vec![FinalReply::Failure(FAILURE_MESSAGE)]);
        assert_eq!(h.pokemon.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.images.calls(), 0);
        assert!(logs_contain("pokeapi.co"));
    }

    #[traced_test]
    #[tokio::test]
    async fn phrase_failure_skips_image_generation() {
        let h = harness(
            MockPokemon {
                pokemon: Some(bulbasaur()),
                ..MockPokemon::default()
            },
            MockPhrase::default(),
            MockImage::returning(Ok(IMAGE)),
        );
        let mut responder = RecordingResponder::default();

        h.generator.respond(&mut responder).await.unwrap();

        assert_eq!(responder.total(), 2);
        assert_eq!(responder.replies, vec![FinalReply::Failure(FAILURE_MESSAGE)]);
        assert_eq!(h.phrases.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.images.calls(), 0);
    }

    #[tokio::test]
    async fn fetches_run_concurrently() {
        // Each mock waits for the other one, so a sequential join would hang.
        let barrier = Arc::new(Barrier::new(2));
        let h = harness(
            MockPokemon {
                pokemon: Some(bulbasaur()),
                barrier: Some(Arc::clone(&barrier)),
                ..MockPokemon::default()
            },
            MockPhrase {
                phrase: Some("an abandoned ski lift".to_owned()),
                barrier: Some(barrier),
                ..MockPhrase::default()
            },
            MockImage::returning(Ok(IMAGE)),
        );

        let card = tokio::time::timeout(Duration::from_secs(5), h.generator.generate())
            .await
            .expect("pokemon and phrase were not fetched concurrently")
            .unwrap();

        assert_eq!(card.title, "bulbasaur — an abandoned ski lift");
    }

    #[test]
    fn card_without_artwork_has_no_thumbnail() {
        let pokemon = Pokemon {
            name: "ditto".to_owned(),
            artwork_url: None,
        };

        let card = GenerationCard::new(&pokemon, "a mirror maze", IMAGE.to_owned());

        assert_eq!(card.thumbnail, None);
        assert_eq!(card.title, "ditto — a mirror maze");
    }

    #[test]
    fn long_titles_are_cut_to_embed_limit() {
        let phrase = "é".repeat(400);
        let card = GenerationCard::new(&bulbasaur(), &phrase, IMAGE.to_owned());

        assert_eq!(card.title.chars().count(), TITLE_LIMIT);
        assert!(card.title.starts_with("bulbasaur — "));
    }
}
