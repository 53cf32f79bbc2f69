use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

/// A user with the names of its manager and company resolved
#[derive(Debug, Clone, FromRow)]
pub struct UserReportRow {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub role: String,
    pub region: Option<String>,
    pub area: Option<String>,
    pub salesman_login_id: Option<String>,
    pub status: String,
    pub is_technical_role: bool,
    pub reports_to_first_name: Option<String>,
    pub reports_to_last_name: Option<String>,
    pub reports_to_email: Option<String>,
    pub company_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserReportRow {
    pub async fn find_by_company_id(
        pool: &SqlitePool,
        company_id: Uuid,
        limit: Option<u32>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, UserReportRow>(
            r#"SELECT
                u.id,
                u.email,
                u.first_name,
                u.last_name,
                u.phone_number,
                u.role,
                u.region,
                u.area,
                u.salesman_login_id,
                u.status,
                u.is_technical_role,
                m.first_name AS reports_to_first_name,
                m.last_name  AS reports_to_last_name,
                m.email      AS reports_to_email,
                c.company_name,
                u.created_at,
                u.updated_at
            FROM users u
            JOIN companies c ON c.id = u.company_id
            LEFT JOIN users m ON m.id = u.reports_to_id
            WHERE u.company_id = $1
            ORDER BY u.created_at DESC, u.id DESC
            LIMIT $2"#,
        )
        .bind(company_id)
        .bind(limit.map_or(-1, i64::from))
        .fetch_all(pool)
        .await
    }
}
