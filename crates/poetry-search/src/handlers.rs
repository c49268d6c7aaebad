use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use poetry_types::{MorphEntry, Poem};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::index::{FilterParams, PoemIndex, parse_filter_text};

const DEFAULT_PAGE_SIZE: usize = 50;
const DEFAULT_SUGGESTION_LIMIT: usize = 50;

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<PoemIndex>,
    pub max_page_size: usize,
    pub disable_cache: bool,
}

#[derive(Deserialize)]
pub struct PoemsQuery {
    pub search: Option<String>,
    pub lemma: Option<String>,
    pub in_cycle: Option<bool>,
    pub cycle_has_title: Option<bool>,
    pub section: Option<String>,
    pub min_lines: Option<usize>,
    pub max_lines: Option<usize>,
    pub has_epigraph: Option<bool>,
    pub has_dedication: Option<bool>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

#[derive(Deserialize)]
pub struct AnalysisQuery {
    pub word: String,
}

#[derive(Deserialize)]
pub struct LemmasQuery {
    pub prefix: String,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct PoemsResponse<'a> {
    page: usize,
    page_size: usize,
    total: usize,
    has_more: bool,
    items: Vec<&'a Poem>,
}

#[derive(Serialize)]
pub struct AnalysisResponse {
    word: String,
    available: bool,
    analyses: Vec<MorphEntry>,
}

#[derive(Serialize)]
pub struct LemmasResponse<'a> {
    prefix: String,
    items: Vec<&'a str>,
}

#[derive(Serialize)]
pub struct SectionsResponse<'a> {
    items: Vec<&'a str>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/poems", get(poems))
        .route("/v1/poems/{id}", get(poem_by_id))
        .route("/v1/analysis", get(analysis))
        .route("/v1/lemmas", get(lemmas))
        .route("/v1/sections", get(sections))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

async fn poems(
    State(state): State<AppState>,
    query: Result<Query<PoemsQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let params = query_params(query)?;
    let page = params.page.unwrap_or(1);
    if page == 0 {
        return Err(ApiError::bad_request("page must be >= 1"));
    }
    let mut page_size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    if page_size == 0 {
        return Err(ApiError::bad_request("page_size must be >= 1"));
    }
    if page_size > state.max_page_size {
        page_size = state.max_page_size;
    }

    let result = state.index.query(FilterParams {
        search: parse_filter_text(params.search.as_deref()),
        lemma: parse_filter_text(params.lemma.as_deref()),
        in_cycle: params.in_cycle,
        cycle_has_title: params.cycle_has_title,
        section: parse_filter_text(params.section.as_deref()),
        min_lines: params.min_lines,
        max_lines: params.max_lines,
        has_epigraph: params.has_epigraph.unwrap_or(false),
        has_dedication: params.has_dedication.unwrap_or(false),
        page,
        page_size,
    });

    let response = PoemsResponse {
        page,
        page_size,
        total: result.total,
        has_more: result.has_more,
        items: result.items,
    };
    Ok(cacheable(&state, Json(response)))
}

async fn poem_by_id(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Response, ApiError> {
    let poem = state
        .index
        .poem(id)
        .ok_or_else(|| ApiError::NotFound(format!("poem {id} not found")))?;
    Ok(cacheable(&state, Json(poem)))
}

async fn analysis(
    State(state): State<AppState>,
    query: Result<Query<AnalysisQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let params = query_params(query)?;
    let Some(word) = parse_filter_text(Some(params.word.as_str())) else {
        return Err(ApiError::bad_request("word is required"));
    };
    let analysis = state.index.analyze(word);
    let response = AnalysisResponse {
        word: analysis.word().to_string(),
        available: analysis.is_available(),
        analyses: analysis.entries().into_owned(),
    };
    Ok(cacheable(&state, Json(response)))
}

async fn lemmas(
    State(state): State<AppState>,
    query: Result<Query<LemmasQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let params = query_params(query)?;
    let limit = params.limit.unwrap_or(DEFAULT_SUGGESTION_LIMIT);
    if limit == 0 {
        return Err(ApiError::bad_request("limit must be >= 1"));
    }
    let limit = limit.min(state.max_page_size);
    let prefix = params.prefix.trim();
    let items = state.index.suggest_lemmas(prefix, limit);
    let response = LemmasResponse {
        prefix: prefix.to_string(),
        items,
    };
    Ok(cacheable(&state, Json(response)))
}

async fn sections(State(state): State<AppState>) -> Response {
    let response = SectionsResponse {
        items: state.index.sections(),
    };
    cacheable(&state, Json(response))
}

/// Undecodable query strings are reported like any other validation failure.
fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

fn cacheable(state: &AppState, body: impl IntoResponse) -> Response {
    if state.disable_cache {
        return body.into_response();
    }
    (
        [(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=300"),
        )],
        body,
    )
        .into_response()
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
}

impl ApiError {
    fn bad_request<T: Into<String>>(msg: T) -> Self {
        ApiError::BadRequest(msg.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
