use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use wwd_schemas::ReconciledWarning;

pub const ENV_DB_URL: &str = "WWD_DATABASE_URL";

/// Connect to Postgres using WWD_DATABASE_URL.
pub async fn connect_from_env() -> Result<PgPool> {
    let url = std::env::var(ENV_DB_URL)
        .with_context(|| format!("missing env var {ENV_DB_URL}"))?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&url)
        .await
        .context("failed to connect to Postgres")?;

    Ok(pool)
}

/// Run embedded SQLx migrations.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("db migrate failed")?;
    Ok(())
}

/// Simple status query (connectivity + schema presence).
pub async fn status(pool: &PgPool) -> Result<DbStatus> {
    let (one,): (i32,) = sqlx::query_as::<_, (i32,)>("select 1")
        .fetch_one(pool)
        .await
        .context("status connectivity query failed")?;
    let ok = one == 1;

    let (exists,): (bool,) = sqlx::query_as::<_, (bool,)>(
        r#"
        select exists (
            select 1
            from information_schema.tables
            where table_schema='public' and table_name='warnings'
        )
        "#,
    )
    .fetch_one(pool)
    .await
    .context("status table-exists query failed")?;

    Ok(DbStatus {
        ok,
        has_warnings_table: exists,
    })
}

#[derive(Debug, Clone)]
pub struct DbStatus {
    pub ok: bool,
    pub has_warnings_table: bool,
}

/// One persisted warning row. Warning columns are `Option` because a
/// hazard-free cycle stores a single sentinel row with them all null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningRow {
    pub generation: String,
    pub tag: Option<String>,
    pub warning_id: Option<String>,
    pub hazard_type: Option<String>,
    pub status: Option<String>,
    pub severity: Option<String>,
    pub issued_at: Option<String>,
    pub updated_at_utc: DateTime<Utc>,
}

impl WarningRow {
    /// True for the "checked, nothing active" marker row.
    pub fn is_sentinel(&self) -> bool {
        self.warning_id.is_none()
    }
}

/// Replace the persisted warning state with this cycle's reconciled set.
///
/// Single transaction: the old 'previous' generation is dropped, 'current'
/// is retired to 'previous', and the new rows (or the sentinel row for an
/// empty set) become 'current'. Concurrent readers never observe a
/// half-updated current/previous pair.
pub async fn refresh_current(pool: &PgPool, warnings: &[ReconciledWarning]) -> Result<()> {
    let mut tx = pool.begin().await.context("refresh_current begin failed")?;

    sqlx::query("delete from warnings where generation = 'previous'")
        .execute(&mut *tx)
        .await
        .context("refresh_current previous-generation delete failed")?;

    sqlx::query("update warnings set generation = 'previous' where generation = 'current'")
        .execute(&mut *tx)
        .await
        .context("refresh_current current-generation retire failed")?;

    if warnings.is_empty() {
        sqlx::query("insert into warnings (generation) values ('current')")
            .execute(&mut *tx)
            .await
            .context("refresh_current sentinel insert failed")?;
    } else {
        for w in warnings {
            sqlx::query(
                r#"
                insert into warnings (
                  generation, tag, warning_id, hazard_type, status, severity, issued_at
                ) values (
                  'current', $1, $2, $3, $4, $5, $6
                )
                "#,
            )
            .bind(w.tag.as_str())
            .bind(&w.id)
            .bind(&w.hazard_type)
            .bind(&w.status)
            .bind(w.severity.as_str())
            .bind(&w.issued_at)
            .execute(&mut *tx)
            .await
            .context("refresh_current insert failed")?;
        }
    }

    tx.commit().await.context("refresh_current commit failed")?;
    Ok(())
}

/// Fetch the current-generation rows in insertion order (the reconciled
/// set's first-encounter order). This is the read API's query.
pub async fn fetch_current(pool: &PgPool) -> Result<Vec<WarningRow>> {
    fetch_generation(pool, "current").await
}

/// Fetch the retired generation; used by operators to inspect what the
/// previous poll served.
pub async fn fetch_previous(pool: &PgPool) -> Result<Vec<WarningRow>> {
    fetch_generation(pool, "previous").await
}

async fn fetch_generation(pool: &PgPool, generation: &str) -> Result<Vec<WarningRow>> {
    let rows = sqlx::query(
        r#"
        select
          generation,
          tag,
          warning_id,
          hazard_type,
          status,
          severity,
          issued_at,
          updated_at_utc
        from warnings
        where generation = $1
        order by row_id asc
        "#,
    )
    .bind(generation)
    .fetch_all(pool)
    .await
    .context("fetch_generation query failed")?;

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        out.push(WarningRow {
            generation: row.try_get("generation")?,
            tag: row.try_get("tag")?,
            warning_id: row.try_get("warning_id")?,
            hazard_type: row.try_get("hazard_type")?,
            status: row.try_get("status")?,
            severity: row.try_get("severity")?,
            issued_at: row.try_get("issued_at")?,
            updated_at_utc: row.try_get("updated_at_utc")?,
        });
    }
    Ok(out)
}
