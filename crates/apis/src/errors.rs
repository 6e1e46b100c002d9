//! Errors that can occur while talking to the upstream APIs.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Error creating HTTP client: {0}")]
    /// The shared HTTP client could not be built.
    HttpClientCreation(#[source] reqwest::Error),

    #[error("Request to {endpoint} failed: {source}")]
    /// A request did not complete, returned an error status, or had an unreadable body.
    Network {
        /// The endpoint that was queried.
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Completion request to {endpoint} failed: {source}")]
    /// The language model endpoint could not produce a completion.
    Upstream {
        /// The endpoint that was queried.
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Image generation failed: {0}")]
    /// The image API answered, but did not report success.
    Generation(String),
}
