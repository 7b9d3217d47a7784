use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Json, Router,
};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// Same cap the real service applies to `/api/random`.
pub const MAX_RANDOM: usize = 100;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MockClue {
    pub id: i64,
    /// The real service has plenty of clues with no value.
    pub value: Option<i64>,
    pub question: String,
    pub answer: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MockCategory {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub clues: Vec<MockClue>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: Vec<MockCategory>,
}

/// Element of the `/api/categories` array.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: i64,
    pub title: String,
    pub clues: usize,
}

/// Clue as listed under `/api/category`. Carries no `category_id`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CategoryClue {
    pub id: i64,
    pub value: Option<i64>,
    pub question: String,
    pub answer: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CategoryDetail {
    pub id: i64,
    pub title: String,
    pub clues_count: usize,
    pub clues: Vec<CategoryClue>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RandomClue {
    pub id: i64,
    pub category_id: i64,
    pub value: Option<i64>,
    pub question: String,
    pub answer: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RandomClues {
    pub clues: Vec<RandomClue>,
}

impl Catalog {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Small fixed data set used when no catalog file is configured.
    pub fn sample() -> Self {
        fn clue(id: i64, value: Option<i64>, question: &str, answer: &str) -> MockClue {
            MockClue {
                id,
                value,
                question: question.to_string(),
                answer: answer.to_string(),
            }
        }

        Catalog {
            categories: vec![
                MockCategory {
                    id: 1,
                    title: "science".to_string(),
                    clues: vec![
                        clue(101, Some(200), "H2O is better known as this", "water"),
                        clue(102, Some(400), "The closest star to Earth", "the Sun"),
                        clue(103, Some(600), "This force keeps planets in orbit", "gravity"),
                    ],
                },
                MockCategory {
                    id: 2,
                    title: "world capitals".to_string(),
                    clues: vec![
                        clue(201, Some(200), "Capital of France", "Paris"),
                        clue(202, None, "Capital of Japan", "Tokyo"),
                    ],
                },
                MockCategory {
                    id: 3,
                    title: "potpourri".to_string(),
                    clues: vec![clue(301, Some(1000), "It has keys but opens no locks", "a piano")],
                },
                MockCategory {
                    id: 4,
                    title: "empty category".to_string(),
                    clues: Vec::new(),
                },
            ],
        }
    }

    pub fn page(&self, count: usize, offset: usize) -> Vec<CategorySummary> {
        self.categories
            .iter()
            .skip(offset)
            .take(count)
            .map(|category| CategorySummary {
                id: category.id,
                title: category.title.clone(),
                clues: category.clues.len(),
            })
            .collect()
    }

    pub fn category(&self, id: i64) -> Option<CategoryDetail> {
        let category = self.categories.iter().find(|c| c.id == id)?;
        Some(CategoryDetail {
            id: category.id,
            title: category.title.clone(),
            clues_count: category.clues.len(),
            clues: category
                .clues
                .iter()
                .map(|clue| CategoryClue {
                    id: clue.id,
                    value: clue.value,
                    question: clue.question.clone(),
                    answer: clue.answer.clone(),
                })
                .collect(),
        })
    }

    /// Draw up to `count` distinct clues from the whole catalog.
    pub fn random_clues(&self, count: usize) -> Vec<RandomClue> {
        let all: Vec<RandomClue> = self
            .categories
            .iter()
            .flat_map(|category| {
                category.clues.iter().map(|clue| RandomClue {
                    id: clue.id,
                    category_id: category.id,
                    value: clue.value,
                    question: clue.question.clone(),
                    answer: clue.answer.clone(),
                })
            })
            .collect();
        all.choose_multiple(&mut rand::thread_rng(), count.min(MAX_RANDOM))
            .cloned()
            .collect()
    }
}

/// Shared server state: the catalog plus a count of every request served.
#[derive(Clone, Debug)]
pub struct AppState {
    catalog: Arc<Catalog>,
    hits: Arc<AtomicUsize>,
}

impl AppState {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            hits: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Catalog::sample())
    }
}

#[derive(Deserialize)]
pub struct CategoriesQuery {
    pub count: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Deserialize)]
pub struct CategoryQuery {
    pub id: i64,
}

#[derive(Deserialize)]
pub struct RandomQuery {
    pub count: Option<usize>,
}

pub fn app() -> Router {
    app_with_state(AppState::default())
}

pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/api/categories", get(list_categories))
        .route("/api/category", get(get_category))
        .route("/api/random", get(random_clues))
        .layer(middleware::from_fn_with_state(state.clone(), count_hits))
        .with_state(state)
}

/// Answers every path with a 200 whose body is not JSON.
pub fn malformed_app() -> Router {
    Router::new().fallback(|| async { "{\"clues\": [ this is not json" })
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_state(listener, AppState::default()).await
}

pub async fn run_with_state(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

pub async fn run_malformed(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, malformed_app()).await
}

async fn count_hits(State(state): State<AppState>, request: Request, next: Next) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    tracing::info!(method = %request.method(), uri = %request.uri(), "request");
    next.run(request).await
}

async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<CategoriesQuery>,
) -> Json<Vec<CategorySummary>> {
    let count = query.count.unwrap_or(1);
    let offset = query.offset.unwrap_or(0);
    Json(state.catalog.page(count, offset))
}

async fn get_category(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<CategoryDetail>, StatusCode> {
    state
        .catalog
        .category(query.id)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn random_clues(
    State(state): State<AppState>,
    Query(query): Query<RandomQuery>,
) -> Json<RandomClues> {
    let count = query.count.unwrap_or(1);
    Json(RandomClues {
        clues: state.catalog.random_clues(count),
    })
}
