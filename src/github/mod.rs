pub mod auth;
pub mod client;

pub use auth::{resolve_credentials, Credentials, TokenSource};
pub use client::GithubClient;
