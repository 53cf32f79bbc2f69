use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

/// A journey plan with the assigned salesman and its creator resolved
#[derive(Debug, Clone, FromRow)]
pub struct PermanentJourneyPlanRow {
    pub id: Uuid,
    pub plan_date: NaiveDate,
    pub area_to_be_visited: String,
    pub description: Option<String>,
    pub status: String,
    pub assigned_first_name: Option<String>,
    pub assigned_last_name: Option<String>,
    pub assigned_email: String,
    pub created_by_first_name: Option<String>,
    pub created_by_last_name: Option<String>,
    pub created_by_email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PermanentJourneyPlanRow {
    /// Plans assigned to salesmen of `company_id`
    pub async fn find_by_company_id(
        pool: &SqlitePool,
        company_id: Uuid,
        limit: Option<u32>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, PermanentJourneyPlanRow>(
            r#"SELECT
                p.id,
                p.plan_date,
                p.area_to_be_visited,
                p.description,
                p.status,
                a.first_name AS assigned_first_name,
                a.last_name  AS assigned_last_name,
                a.email      AS assigned_email,
                c.first_name AS created_by_first_name,
                c.last_name  AS created_by_last_name,
                c.email      AS created_by_email,
                p.created_at
            FROM permanent_journey_plans p
            JOIN users a ON a.id = p.user_id
            LEFT JOIN users c ON c.id = p.created_by_id
            WHERE a.company_id = $1
            ORDER BY p.plan_date DESC, p.created_at DESC, p.id DESC
            LIMIT $2"#,
        )
        .bind(company_id)
        .bind(limit.map_or(-1, i64::from))
        .fetch_all(pool)
        .await
    }
}
