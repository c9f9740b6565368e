//! Remote collaborators of the humeur client.
//!
//! Today this is a single HTTP backend exposing the login and prediction
//! endpoints.

pub mod api_client;

pub use api_client::{HttpSentimentApi, SentimentApi};
