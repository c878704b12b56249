//! MySQL connectivity probes.
//!
//! # Responsibilities
//! - Prove the write and read pools reach distinct (or identical) hosts
//! - Round-trip a row through the primary and read it back via the replica
//! - Report replica lag when grants allow it
//!
//! Probes are best-effort and sequential; a failed query surfaces as the
//! standard 500 envelope, never a crash.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::mysql::MySqlPool;
use sqlx::Row;
use uuid::Uuid;

use crate::db;
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// GET /api/_init/mysql/hosts
pub async fn hosts(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let write_hostname = db::hostname(&state.db.write).await?;
    let read_hostname = db::hostname(&state.db.read).await?;

    Ok(Json(json!({
        "write_hostname": write_hostname,
        "read_hostname": read_hostname,
    })))
}

#[derive(Debug, Default, Deserialize)]
pub struct WritePayload {
    note: Option<String>,
}

/// POST /api/_init/mysql/write
///
/// The admission gate has already guaranteed the body is empty or valid
/// JSON; anything that does not look like `{ "note": ... }` falls back to
/// the default note.
pub async fn write(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let payload: WritePayload = serde_json::from_slice(&body).unwrap_or_default();
    let note = payload.note.unwrap_or_else(|| "init-check".to_string());
    let id = Uuid::new_v4().to_string();

    sqlx::query("INSERT INTO init_check_items (id, note, created_at) VALUES (?, ?, NOW())")
        .bind(&id)
        .bind(&note)
        .execute(&state.db.write)
        .await?;

    let wrote_from = db::hostname(&state.db.write).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": id,
            "wrote_from_hostname": wrote_from,
            "payload": { "id": id, "note": note },
        })),
    ))
}

/// GET /api/_init/mysql/read/{id}
pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let row = sqlx::query("SELECT id, note, created_at FROM init_check_items WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db.read)
        .await?;

    let read_from = db::hostname(&state.db.read).await?;

    let data = match &row {
        Some(row) => {
            let created_at: NaiveDateTime = row.try_get("created_at")?;
            json!({
                "id": row.try_get::<String, _>("id")?,
                "note": row.try_get::<String, _>("note")?,
                "created_at": created_at.to_string(),
            })
        }
        None => Value::Null,
    };

    Ok(Json(json!({
        "id": id,
        "found": row.is_some(),
        "read_from_hostname": read_from,
        "data": data,
    })))
}

/// GET /api/_init/mysql/lag
///
/// Best-effort: reading replica status needs REPLICATION CLIENT grants,
/// which the read user may not have. Degrades to a null reading.
pub async fn lag(State(state): State<AppState>) -> Json<Value> {
    match replica_lag(&state.db.read).await {
        Ok(seconds) => Json(json!({ "replica_seconds_behind": seconds })),
        Err(e) => {
            tracing::debug!(error = %e, "Replica lag probe failed");
            Json(json!({
                "replica_seconds_behind": null,
                "note": "Could not read replica lag with current grants.",
            }))
        }
    }
}

async fn replica_lag(pool: &MySqlPool) -> Result<Option<i64>, sqlx::Error> {
    let Some(row) = sqlx::query("SHOW REPLICA STATUS").fetch_optional(pool).await? else {
        // Not a replica: nothing to be behind of.
        return Ok(None);
    };

    // MySQL 8 renamed the column; older servers report the legacy name.
    for column in ["Seconds_Behind_Source", "Seconds_Behind_Master"] {
        if let Ok(value) = row.try_get::<Option<i64>, _>(column) {
            return Ok(value);
        }
        if let Ok(value) = row.try_get::<Option<String>, _>(column) {
            return Ok(value.and_then(|s| s.parse().ok()));
        }
    }

    Ok(None)
}
