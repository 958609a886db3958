//! gh-approve-deploy library.
//!
//! Exposes the review flow for integration testing and programmatic use.
//! The binary entrypoint is in `main.rs`.

pub mod cli;
pub mod deploy;
pub mod error;
pub mod github;
