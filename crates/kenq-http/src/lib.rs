//! Backend API client for the KenQ portal
//!
//! Every portal route forwards to exactly one backend endpoint. This crate
//! wraps those endpoints behind the mockable [`BackendApi`] trait.
//!
//! ## Features
//!
//! - **Trait-based design**: handlers depend on `BackendApi`, tests swap in fakes
//! - **Single attempt**: no retries; failures surface immediately as [`BackendError`]
//! - **Configurable**: timeouts and user-agent
//! - **Testing support**: exercised against wiremock

pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::{shared_client, BackendApi, BackendClient};
pub use config::HttpConfig;
pub use error::{BackendError, Result};
pub use models::{BackendUser, LoginRequest};
