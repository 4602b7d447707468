//! Chat Widget
//!
//! A small chat front end: it takes text from a form, shows it in a
//! scrolling message list, posts it to a chat endpoint and swaps a
//! "thinking" placeholder for the reply.
//!
//! # Architecture
//!
//! - **Widget**: headless core bound to a host's input field and message list
//! - **Client**: `reqwest`-backed client for the `POST /chat` endpoint
//! - **Host**: in-memory document, terminal renderer and HTML page renderer
//!
//! # Modules
//!
//! - [`widget`]: `ChatWidget`, host traits, exchange records, rendering
//! - [`client`]: `ChatClient` trait and HTTP implementation
//! - [`config`]: Layered configuration (defaults, file, env, CLI)
//! - [`page`]: Host page markup
//! - [`terminal`]: Terminal message list
//! - [`telemetry`]: Tracing setup

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]

pub mod client;
pub mod config;
pub mod error;
pub mod page;
pub mod telemetry;
pub mod terminal;
pub mod widget;

pub use client::{ChatClient, HttpChatClient};
pub use error::ChatError;
pub use widget::ChatWidget;
