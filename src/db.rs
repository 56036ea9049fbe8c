use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::{debug, info};
use uuid::Uuid;

use crate::history::semesters_from_csv;
use crate::models::{AcademicLevel, GradeHistory, SemesterRecord};

/// Key the browser calculator stored its state under.
pub const DEFAULT_NAMESPACE: &str = "smartIpkData";

#[derive(Debug, Clone)]
pub struct StoredHistory {
    pub history: GradeHistory,
    pub updated_at: Option<DateTime<Utc>>,
}

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Loads the history for `namespace`; a namespace that was never committed
/// reads as an empty S1 history.
pub async fn load_history(pool: &PgPool, namespace: &str) -> anyhow::Result<StoredHistory> {
    let row = sqlx::query(
        "SELECT payload, updated_at FROM grade_tracker.histories WHERE namespace = $1",
    )
    .bind(namespace)
    .fetch_optional(pool)
    .await
    .with_context(|| format!("failed to load history for namespace {namespace}"))?;

    let Some(row) = row else {
        debug!(namespace, "no stored history, starting empty");
        return Ok(StoredHistory {
            history: GradeHistory::new(AcademicLevel::S1),
            updated_at: None,
        });
    };

    let Json(history): Json<GradeHistory> = row
        .try_get("payload")
        .context("stored history payload is not a valid grade history")?;
    debug!(namespace, semesters = history.semesters.len(), "loaded history");

    Ok(StoredHistory {
        history,
        updated_at: Some(row.get("updated_at")),
    })
}

pub async fn commit_history(
    pool: &PgPool,
    namespace: &str,
    history: &GradeHistory,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO grade_tracker.histories (id, namespace, payload, updated_at)
        VALUES ($1, $2, $3, now())
        ON CONFLICT (namespace) DO UPDATE
        SET payload = EXCLUDED.payload, updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(namespace)
    .bind(Json(history))
    .execute(pool)
    .await
    .with_context(|| format!("failed to commit history for namespace {namespace}"))?;

    info!(
        namespace,
        level = %history.jenjang,
        semesters = history.semesters.len(),
        "committed history"
    );
    Ok(())
}

pub async fn delete_history(pool: &PgPool, namespace: &str) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM grade_tracker.histories WHERE namespace = $1")
        .bind(namespace)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn seed(pool: &PgPool, namespace: &str) -> anyhow::Result<GradeHistory> {
    let history = GradeHistory {
        jenjang: AcademicLevel::S1,
        semesters: vec![
            SemesterRecord::new(3.12, 20.0),
            SemesterRecord::new(3.35, 21.0),
            SemesterRecord::new(3.28, 22.0),
            SemesterRecord::new(3.56, 21.0),
            SemesterRecord::new(3.61, 20.0),
        ],
    };
    commit_history(pool, namespace, &history).await?;
    Ok(history)
}

/// Replaces the stored semesters with the rows of a CSV file.
pub async fn import_csv(
    pool: &PgPool,
    namespace: &str,
    csv_path: &std::path::Path,
    level: Option<AcademicLevel>,
) -> anyhow::Result<usize> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let semesters = semesters_from_csv(file)?;

    let mut history = load_history(pool, namespace).await?.history;
    if let Some(level) = level {
        history.jenjang = level;
    }
    history.semesters = semesters;
    commit_history(pool, namespace, &history).await?;

    Ok(history.semesters.len())
}
