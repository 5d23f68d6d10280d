//! Sqlite persistence for tours.
//!
//! A tour row embeds its ordered step sequence as a JSON column. This store
//! serves the initial load and the explicit save; live updates never pass
//! through it.

use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::AppResult;

use super::model::{Step, Tour};

type TourRow = (String, String, String, String, bool, DateTime<Utc>, DateTime<Utc>);

const TOUR_COLUMNS: &str = "id,owner_id,title,steps,is_public,created_at,updated_at";

fn tour_from_row(
    (id, owner_id, title, steps, is_public, created_at, updated_at): TourRow,
) -> AppResult<Tour> {
    Ok(Tour {
        id: Uuid::parse_str(&id).map_err(anyhow::Error::from)?,
        owner_id: Uuid::parse_str(&owner_id).map_err(anyhow::Error::from)?,
        title,
        steps: serde_json::from_str(&steps).context("corrupt steps column")?,
        is_public,
        created_at,
        updated_at,
    })
}

pub async fn create(
    pool: &SqlitePool,
    owner_id: Uuid,
    title: &str,
    steps: &[Step],
    is_public: bool,
) -> AppResult<Tour> {
    let id = Uuid::now_v7();
    let now = Utc::now();

    sqlx::query(
        "INSERT INTO tours (id,owner_id,title,steps,is_public,created_at,updated_at) VALUES (?,?,?,?,?,?,?)",
    )
    .bind(id.to_string())
    .bind(owner_id.to_string())
    .bind(title)
    .bind(serde_json::to_string(steps).context("serialize steps")?)
    .bind(is_public)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Tour {
        id,
        owner_id,
        title: title.to_owned(),
        steps: steps.to_vec(),
        is_public,
        created_at: now,
        updated_at: now,
    })
}

pub async fn list_by_owner(pool: &SqlitePool, owner_id: Uuid) -> AppResult<Vec<Tour>> {
    let rows: Vec<TourRow> = sqlx::query_as(&format!(
        "SELECT {TOUR_COLUMNS} FROM tours WHERE owner_id=? ORDER BY created_at DESC"
    ))
    .bind(owner_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(tour_from_row).collect()
}

pub async fn fetch(pool: &SqlitePool, id: Uuid) -> AppResult<Option<Tour>> {
    let row: Option<TourRow> =
        sqlx::query_as(&format!("SELECT {TOUR_COLUMNS} FROM tours WHERE id=?"))
            .bind(id.to_string())
            .fetch_optional(pool)
            .await?;

    row.map(tour_from_row).transpose()
}

/// Write the tour's mutable fields back. The owner column is immutable
/// after creation and is deliberately absent from the SET list.
pub async fn update(pool: &SqlitePool, tour: &Tour) -> AppResult<()> {
    sqlx::query("UPDATE tours SET title=?,steps=?,is_public=?,updated_at=? WHERE id=?")
        .bind(&tour.title)
        .bind(serde_json::to_string(&tour.steps).context("serialize steps")?)
        .bind(tour.is_public)
        .bind(tour.updated_at)
        .bind(tour.id.to_string())
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: Uuid) -> AppResult<()> {
    sqlx::query("DELETE FROM tours WHERE id=?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(())
}
