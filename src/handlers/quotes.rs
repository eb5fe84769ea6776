use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    extract::{JsonBody, PathParam, QueryParams},
    models::quotes::{
        FavoriteRequest, FavoriteStatus, NewQuote, Quote, QuoteFilter, QuotePatch, ViewerParams,
    },
    Data,
};

pub async fn create_quote(
    State(data): State<Data>,
    JsonBody(payload): JsonBody<NewQuote>,
) -> AppResult<(StatusCode, Json<Quote>)> {
    let quote = data.store.create_quote(payload).await?;
    tracing::info!(id = quote.id, author = %quote.author, "created quote");

    Ok((StatusCode::CREATED, Json(quote)))
}

pub async fn create_quotes_batch(
    State(data): State<Data>,
    JsonBody(payload): JsonBody<Vec<NewQuote>>,
) -> AppResult<(StatusCode, Json<Vec<Quote>>)> {
    let quotes = data.store.create_quotes(payload).await?;
    tracing::info!(count = quotes.len(), "created quote batch");

    Ok((StatusCode::CREATED, Json(quotes)))
}

pub async fn list_quotes(
    State(data): State<Data>,
    QueryParams(filter): QueryParams<QuoteFilter>,
) -> AppResult<Json<Vec<Quote>>> {
    Ok(Json(data.store.list_quotes(filter).await?))
}

pub async fn list_quotes_by_category(
    State(data): State<Data>,
    PathParam(category): PathParam<String>,
    QueryParams(viewer): QueryParams<ViewerParams>,
) -> AppResult<Json<Vec<Quote>>> {
    let filter = QuoteFilter {
        category: Some(category),
        user_id: viewer.user_id,
    };

    Ok(Json(data.store.list_quotes(filter).await?))
}

pub async fn get_quote(
    State(data): State<Data>,
    PathParam(id): PathParam<i64>,
    QueryParams(viewer): QueryParams<ViewerParams>,
) -> AppResult<Json<Quote>> {
    Ok(Json(data.store.get_quote(id, viewer.user_id).await?))
}

pub async fn update_quote(
    State(data): State<Data>,
    PathParam(id): PathParam<i64>,
    QueryParams(viewer): QueryParams<ViewerParams>,
    JsonBody(payload): JsonBody<QuotePatch>,
) -> AppResult<Json<Quote>> {
    Ok(Json(
        data.store.update_quote(id, payload, viewer.user_id).await?,
    ))
}

pub async fn delete_quote(
    State(data): State<Data>,
    PathParam(id): PathParam<i64>,
) -> AppResult<StatusCode> {
    data.store.delete_quote(id).await?;
    tracing::info!(id, "deleted quote");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_favorite(
    State(data): State<Data>,
    PathParam(id): PathParam<i64>,
    JsonBody(payload): JsonBody<FavoriteRequest>,
) -> AppResult<Json<FavoriteStatus>> {
    data.store.set_favorite(id, payload.user_id).await?;

    Ok(Json(FavoriteStatus { success: true }))
}

pub async fn remove_favorite(
    State(data): State<Data>,
    PathParam(id): PathParam<i64>,
    QueryParams(params): QueryParams<FavoriteRequest>,
) -> AppResult<Json<FavoriteStatus>> {
    let success = data.store.clear_favorite(id, params.user_id).await?;

    Ok(Json(FavoriteStatus { success }))
}

pub async fn list_favorites(
    State(data): State<Data>,
    QueryParams(params): QueryParams<FavoriteRequest>,
) -> AppResult<Json<Vec<Quote>>> {
    Ok(Json(data.store.list_favorites(params.user_id).await?))
}

pub async fn list_categories(State(data): State<Data>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(data.store.list_categories().await?))
}
