//! Persistence for scan metrics and their vulnerability rows.

use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::metrics::{AnalysisMetrics, NewAnalysisMetrics};
use crate::models::vulnerability::{AnalysisVulnerability, NewAnalysisVulnerability};

/// Upper bound on vulnerability rows returned for one scan.
pub const MAX_VULNERABILITIES_PER_SCAN: i64 = 93;

/// Insert one metrics row and return it as stored.
pub async fn insert_metrics<'e, E>(executor: E, input: &NewAnalysisMetrics) -> Result<AnalysisMetrics, AppError>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, AnalysisMetrics>(
        r#"
        INSERT INTO slither_metrics (
            project_name, session_id,
            total_contracts, source_lines, assembly_lines, scan_duration,
            optimization_issues, informational_issues, low_issues, medium_issues, high_issues,
            ercs, markdown_content
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING *
        "#,
    )
    .bind(&input.project_name)
    .bind(&input.session_id)
    .bind(input.total_contracts)
    .bind(input.source_lines)
    .bind(input.assembly_lines)
    .bind(input.scan_duration)
    .bind(input.optimization_issues)
    .bind(input.informational_issues)
    .bind(input.low_issues)
    .bind(input.medium_issues)
    .bind(input.high_issues)
    .bind(&input.ercs)
    .bind(&input.markdown_content)
    .fetch_one(executor)
    .await?;

    Ok(row)
}

/// Insert all vulnerability rows for a scan in a single statement.
pub async fn insert_vulnerabilities<'e, E>(
    executor: E,
    metrics_id: Uuid,
    rows: &[NewAnalysisVulnerability],
) -> Result<u64, AppError>
where
    E: PgExecutor<'e>,
{
    if rows.is_empty() {
        return Ok(0);
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
        "INSERT INTO vulnerabilities (metrics_id, vulnerability, severity, recommendation) ",
    );
    builder.push_values(rows, |mut b, row| {
        b.push_bind(metrics_id)
            .push_bind(&row.vulnerability)
            .push_bind(row.severity)
            .push_bind(&row.recommendation);
    });

    let result = builder.build().execute(executor).await?;
    Ok(result.rows_affected())
}

/// Store a scan atomically: the metrics row and its vulnerabilities commit together.
pub async fn persist_analysis(
    pool: &PgPool,
    metrics: &NewAnalysisMetrics,
    vulnerabilities: &[NewAnalysisVulnerability],
) -> Result<AnalysisMetrics, AppError> {
    let mut tx = pool.begin().await?;

    let row = insert_metrics(&mut *tx, metrics).await?;
    let inserted = insert_vulnerabilities(&mut *tx, row.id, vulnerabilities).await?;

    tx.commit().await?;
    tracing::debug!(metrics_id = %row.id, inserted, "Scan results committed");
    Ok(row)
}

/// Get a metrics row by ID.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<AnalysisMetrics, AppError> {
    sqlx::query_as::<_, AnalysisMetrics>("SELECT * FROM slither_metrics WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Contract not found".to_string()))
}

/// All scans recorded under a session, newest first.
pub async fn list_by_session(pool: &PgPool, session_id: &str) -> Result<Vec<AnalysisMetrics>, AppError> {
    let rows = sqlx::query_as::<_, AnalysisMetrics>(
        r#"
        SELECT * FROM slither_metrics
        WHERE session_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Vulnerability rows of one scan, in insertion order.
pub async fn list_vulnerabilities(
    pool: &PgPool,
    metrics_id: Uuid,
) -> Result<Vec<AnalysisVulnerability>, AppError> {
    let rows = sqlx::query_as::<_, AnalysisVulnerability>(
        r#"
        SELECT id, metrics_id, vulnerability, severity, recommendation, created_at
        FROM vulnerabilities
        WHERE metrics_id = $1
        ORDER BY id
        LIMIT $2
        "#,
    )
    .bind(metrics_id)
    .bind(MAX_VULNERABILITIES_PER_SCAN)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
