use axum::extract::rejection::QueryRejection;
use axum::extract::{Form, FromRequest, Multipart, Path, Query, Request, State};
use axum::http::{StatusCode, header};
use axum::response::Json;
use serde::Deserialize;

use gamr_core::envelope::{Envelope, GameListResponse, GameResponse};
use gamr_core::params::{GameId, ParamError, Rating, TopCount};

use crate::error::AppError;
use crate::state::AppState;
use crate::vote::cast_vote;

/// Query string for the top list. Kept as raw text so that a present but
/// malformed `n` can be told apart from an absent one.
#[derive(Debug, Default, Deserialize)]
pub struct TopQuery {
    pub n: Option<String>,
}

/// Form fields for casting a vote.
#[derive(Debug, Default, Deserialize)]
pub struct VoteForm {
    pub rating: Option<String>,
}

/// The raw `rating` of a vote request.
///
/// Read from an urlencoded, multipart or JSON body, falling back to the query
/// string. A request without a `Content-Type` only consults the query string.
/// Any other body type is rejected with 415.
#[derive(Debug, Default)]
pub struct VoteInput {
    pub rating: Option<String>,
}

impl<S> FromRequest<S> for VoteInput
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let from_query = Query::<VoteForm>::try_from_uri(req.uri())
            .ok()
            .and_then(|Query(q)| q.rating);
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|value| media_type(value.to_str().unwrap_or_default()));

        let from_body = match content_type.as_deref() {
            None => None,
            Some("application/x-www-form-urlencoded") => {
                let Form(form) = Form::<VoteForm>::from_request(req, state)
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                form.rating
            },
            Some("multipart/form-data") => {
                let multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                rating_from_multipart(multipart).await?
            },
            Some("application/json") => {
                let Json(body) = Json::<serde_json::Value>::from_request(req, state)
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                rating_from_json(&body)
            },
            Some(other) => {
                return Err(AppError::UnsupportedMediaType(format!(
                    "Cannot read the rating from a {other} body."
                )));
            },
        };

        Ok(Self {
            rating: from_body.or(from_query),
        })
    }
}

/// `text/html; charset=utf-8` -> `text/html`
fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

async fn rating_from_multipart(mut multipart: Multipart) -> Result<Option<String>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() == Some("rating") {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            return Ok(Some(text));
        }
    }
    Ok(None)
}

/// Numbers and strings pass through as text for `Rating::parse`; `null` is absent.
fn rating_from_json(body: &serde_json::Value) -> Option<String> {
    match body.get("rating")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// GET /api/games/top — highest rated games, `n` of them (default 3).
pub async fn top_games(
    State(state): State<AppState>,
    query: Result<Query<TopQuery>, QueryRejection>,
) -> Result<Json<GameListResponse>, AppError> {
    let Query(query) = query.map_err(|_| ParamError::TopCountNotInteger)?;
    let n = TopCount::parse(query.n.as_deref())?;
    let games = state.store.call(move |store| store.top(n)).await?;
    Ok(Json(Envelope::new(games)))
}

/// GET /api/games/random — one game picked uniformly at random.
pub async fn random_game(State(state): State<AppState>) -> Result<Json<GameResponse>, AppError> {
    let game = state.store.call(|store| store.random()).await?;
    Ok(Json(Envelope::new(game)))
}

/// GET /api/games/{id} — a single game.
pub async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GameResponse>, AppError> {
    let id = GameId::parse(&id)?;
    let game = state.store.call(move |store| store.get(id)).await?;
    Ok(Json(Envelope::new(game)))
}

/// PUT /api/games/{id}/vote — cast a 0/1 vote from the `rating` field.
pub async fn vote(
    State(state): State<AppState>,
    Path(id): Path<String>,
    input: VoteInput,
) -> Result<StatusCode, AppError> {
    let rating = Rating::parse(input.rating.as_deref())?;
    let id = GameId::parse(&id)?;
    state
        .store
        .call(move |store| cast_vote(store, id, rating))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
