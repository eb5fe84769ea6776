use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    extract::{JsonBody, PathParam},
    models::users::{NewUser, User, UserPatch},
    Data,
};

pub async fn create_user(
    State(data): State<Data>,
    JsonBody(payload): JsonBody<NewUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    let user = data.store.create_user(payload).await?;
    tracing::info!(id = user.id, username = %user.username, "created user");

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list_users(State(data): State<Data>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(data.store.list_users().await?))
}

pub async fn get_user(
    State(data): State<Data>,
    PathParam(id): PathParam<i64>,
) -> AppResult<Json<User>> {
    Ok(Json(data.store.get_user(id).await?))
}

pub async fn update_user(
    State(data): State<Data>,
    PathParam(id): PathParam<i64>,
    JsonBody(payload): JsonBody<UserPatch>,
) -> AppResult<Json<User>> {
    Ok(Json(data.store.update_user(id, payload).await?))
}

pub async fn delete_user(
    State(data): State<Data>,
    PathParam(id): PathParam<i64>,
) -> AppResult<StatusCode> {
    data.store.delete_user(id).await?;
    tracing::info!(id, "deleted user");

    Ok(StatusCode::NO_CONTENT)
}
