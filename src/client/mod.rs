//! Provider clients.
//!
//! [`KieClient`] drives the submit/poll job protocol; [`GeminiImageClient`]
//! wraps the single-call image endpoint. Both own one rate limiter that every
//! call of the client shares.

mod gemini;
mod kie;

pub use gemini::{GeminiImageClient, GeminiImageClientBuilder};
pub use kie::{KieClient, KieClientBuilder};
