use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct DealerScoreRow {
    pub id: Uuid,
    pub dealer_name: String,
    pub dealer_score: String,
    pub trust_worthiness_score: String,
    pub credit_worthiness_score: String,
    pub order_history_score: String,
    pub visit_frequency_score: String,
    pub last_updated_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl DealerScoreRow {
    /// Scores of dealers owned by salesmen of `company_id`
    pub async fn find_by_company_id(
        pool: &SqlitePool,
        company_id: Uuid,
        limit: Option<u32>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, DealerScoreRow>(
            r#"SELECT
                s.id,
                d.name AS dealer_name,
                s.dealer_score,
                s.trust_worthiness_score,
                s.credit_worthiness_score,
                s.order_history_score,
                s.visit_frequency_score,
                s.last_updated_date,
                s.created_at
            FROM dealer_scores s
            JOIN dealers d ON d.id = s.dealer_id
            JOIN users u   ON u.id = d.user_id
            WHERE u.company_id = $1
            ORDER BY s.last_updated_date DESC, s.id DESC
            LIMIT $2"#,
        )
        .bind(company_id)
        .bind(limit.map_or(-1, i64::from))
        .fetch_all(pool)
        .await
    }
}
