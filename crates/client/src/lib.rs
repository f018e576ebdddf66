//! Pledge API client
//!
//! Typed client for the Pledge crowdfunding REST backend. Every request
//! carries the stored access credential as a bearer token; a 401 response
//! triggers exactly one silent credential renewal before the original
//! request is replayed.

pub mod client;
pub mod error;
pub mod session;
pub mod types;

pub use {
    client::{DEFAULT_BASE_URL, PledgeClient, PledgeClientBuilder},
    error::ClientError,
    session::{FileSessionStore, MemorySessionStore, SessionStore},
    types::TokenPair,
};
