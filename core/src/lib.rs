//! Client for the jservice trivia API.
//!
//! # Overview
//! Three read-only queries: a page of categories, every clue of a category,
//! and a batch of random clues. Each is a single GET whose JSON body is
//! mapped into `Category` or `Clue` records.
//!
//! # Design
//! - `JServiceClient` is stateless and does no I/O: `build_*` produces an
//!   `HttpRequest`, `parse_*` consumes an `HttpResponse`.
//! - `JService` drives the round-trip through a `Transport` (ureq by
//!   default) and exposes async queries.
//! - Decoding is lenient: mistyped fields read as zero values instead of
//!   failing the batch.

pub mod client;
pub mod error;
pub mod http;
pub mod lenient;
pub mod service;
pub mod types;

pub use client::{random_offset, JServiceClient, DEFAULT_BASE_URL, MAX_COUNT};
pub use error::ApiError;
pub use http::{HttpRequest, HttpResponse};
pub use service::{JService, Transport, UreqTransport};
pub use types::{Category, Clue};
