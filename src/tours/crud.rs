//! REST handlers for the Tour entity.
//!
//! Missing tours and tours the caller may not touch produce the same 404;
//! callers cannot probe for the existence of other users' private tours.

use axum::{
    Json, debug_handler,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    AppError, AppResult,
    auth::{AuthUser, MaybeAuthUser},
};

use super::{
    model::{Step, Tour},
    store,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateTourBody {
    title: String,
    steps: Vec<Step>,
    #[serde(default)]
    is_public: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateTourBody {
    title: Option<String>,
    steps: Option<Vec<Step>>,
    is_public: Option<bool>,
}

fn parse_tour_id(id: &str) -> AppResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| AppError::BadRequest("Invalid tour ID format".to_owned()))
}

fn not_found() -> AppError {
    AppError::NotFound("Tour not found or not authorized".to_owned())
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn create_tour(
    State(db_pool): State<SqlitePool>,
    user: AuthUser,
    Json(CreateTourBody { title, steps, is_public }): Json<CreateTourBody>,
) -> AppResult<(StatusCode, Json<Tour>)> {
    if title.is_empty() || steps.is_empty() {
        return Err(AppError::BadRequest("Please provide title and steps".to_owned()));
    }

    let tour = store::create(&db_pool, user.id, &title, &steps, is_public).await?;
    Ok((StatusCode::CREATED, Json(tour)))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn list_tours(
    State(db_pool): State<SqlitePool>,
    user: AuthUser,
) -> AppResult<Json<Vec<Tour>>> {
    Ok(Json(store::list_by_owner(&db_pool, user.id).await?))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn get_tour(
    State(db_pool): State<SqlitePool>,
    MaybeAuthUser(user): MaybeAuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Tour>> {
    let id = parse_tour_id(&id)?;

    let Some(tour) = store::fetch(&db_pool, id).await? else {
        return Err(not_found());
    };

    let is_owner = user.is_some_and(|u| u.id == tour.owner_id);
    if tour.is_public || is_owner {
        Ok(Json(tour))
    } else {
        Err(not_found())
    }
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn update_tour(
    State(db_pool): State<SqlitePool>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateTourBody>,
) -> AppResult<Json<Tour>> {
    let id = parse_tour_id(&id)?;

    let Some(mut tour) = store::fetch(&db_pool, id).await? else {
        return Err(not_found());
    };
    if tour.owner_id != user.id {
        return Err(not_found());
    }

    if let Some(title) = body.title {
        tour.title = title;
    }
    if let Some(steps) = body.steps {
        tour.steps = steps;
    }
    if let Some(is_public) = body.is_public {
        tour.is_public = is_public;
    }
    tour.updated_at = Utc::now();

    store::update(&db_pool, &tour).await?;
    Ok(Json(tour))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn delete_tour(
    State(db_pool): State<SqlitePool>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_tour_id(&id)?;

    let Some(tour) = store::fetch(&db_pool, id).await? else {
        return Err(not_found());
    };
    if tour.owner_id != user.id {
        return Err(not_found());
    }

    store::delete(&db_pool, id).await?;
    Ok(Json(json!({ "message": "Tour removed" })))
}
