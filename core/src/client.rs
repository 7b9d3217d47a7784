//! Stateless HTTP request builder and response parser for the jservice API.
//!
//! # Design
//! `JServiceClient` holds only a `base_url` and carries no mutable state
//! between calls. Each query is split into a `build_*` method that produces
//! an `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Argument checks happen in `build_*`, so a rejected query never reaches
//! the network.

use rand::Rng;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{Category, Clue};

/// Public jservice endpoint.
pub const DEFAULT_BASE_URL: &str = "http://jservice.io/api";

/// Largest page of categories or batch of random clues the API serves.
pub const MAX_COUNT: u32 = 100;

/// Approximate number of categories reachable by paging. Past
/// `categories?count=100&offset=18000` the API returns nothing useful.
const PAGEABLE_DEPTH: u32 = 150_000;

/// Synchronous, stateless client for the jservice API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. See `JService` for the variant that performs the
/// round-trip.
#[derive(Debug, Clone)]
pub struct JServiceClient {
    base_url: String,
}

impl Default for JServiceClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl JServiceClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request a page of `count` categories starting at `offset`. A negative
    /// `offset` asks for an arbitrary page, chosen with `random_offset`.
    pub fn build_categories(&self, count: u32, offset: i64) -> Result<HttpRequest, ApiError> {
        self.build_categories_with_rng(count, offset, &mut rand::thread_rng())
    }

    pub fn build_categories_with_rng<R: Rng>(
        &self,
        count: u32,
        offset: i64,
        rng: &mut R,
    ) -> Result<HttpRequest, ApiError> {
        check_count(count)?;
        let offset = if offset < 0 {
            random_offset(count, rng)
        } else {
            offset
        };
        Ok(HttpRequest {
            url: format!(
                "{}/categories?count={count}&offset={offset}",
                self.base_url
            ),
        })
    }

    pub fn build_clues(&self, category_id: i64) -> Result<HttpRequest, ApiError> {
        if category_id < 0 {
            return Err(ApiError::NegativeCategoryId(category_id));
        }
        Ok(HttpRequest {
            url: format!("{}/category?id={category_id}", self.base_url),
        })
    }

    pub fn build_random_clues(&self, count: u32) -> Result<HttpRequest, ApiError> {
        check_count(count)?;
        Ok(HttpRequest {
            url: format!("{}/random?count={count}", self.base_url),
        })
    }

    /// The categories endpoint answers with a bare JSON array.
    pub fn parse_categories(&self, response: HttpResponse) -> Result<Vec<Category>, ApiError> {
        let json = parse_body(&response)?;
        let elements = json
            .as_array()
            .ok_or(ApiError::MissingArray("categories"))?;
        Ok(elements.iter().map(Category::from_json).collect())
    }

    /// Clue elements of a category carry no usable `category_id`, so every
    /// clue is stamped with the id that was asked for.
    pub fn parse_clues(
        &self,
        category_id: i64,
        response: HttpResponse,
    ) -> Result<Vec<Clue>, ApiError> {
        let json = parse_body(&response)?;
        Ok(clue_elements(&json)?
            .iter()
            .map(|element| Clue {
                category_id,
                ..Clue::from_json(element)
            })
            .collect())
    }

    pub fn parse_random_clues(&self, response: HttpResponse) -> Result<Vec<Clue>, ApiError> {
        let json = parse_body(&response)?;
        Ok(clue_elements(&json)?.iter().map(Clue::from_json).collect())
    }
}

/// Pick a page offset in `[1, PAGEABLE_DEPTH / count]`. Not uniform over
/// categories, just "some page that probably exists".
pub fn random_offset<R: Rng>(count: u32, rng: &mut R) -> i64 {
    let upper = PAGEABLE_DEPTH / count.max(1);
    i64::from(rng.gen_range(1..=upper.max(1)))
}

fn check_count(count: u32) -> Result<(), ApiError> {
    if count > MAX_COUNT {
        return Err(ApiError::CountTooLarge {
            count,
            max: MAX_COUNT,
        });
    }
    Ok(())
}

// The status code is deliberately not consulted.
fn parse_body(response: &HttpResponse) -> Result<Value, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

fn clue_elements(json: &Value) -> Result<&Vec<Value>, ApiError> {
    json.get("clues")
        .and_then(Value::as_array)
        .ok_or(ApiError::MissingArray("clues"))
}
