use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct SalesmanLeaveApplicationRow {
    pub id: Uuid,
    pub salesman_first_name: Option<String>,
    pub salesman_last_name: Option<String>,
    pub salesman_email: String,
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub status: String,
    pub admin_remarks: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SalesmanLeaveApplicationRow {
    pub async fn find_by_company_id(
        pool: &SqlitePool,
        company_id: Uuid,
        limit: Option<u32>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, SalesmanLeaveApplicationRow>(
            r#"SELECT
                l.id,
                u.first_name AS salesman_first_name,
                u.last_name  AS salesman_last_name,
                u.email      AS salesman_email,
                l.leave_type,
                l.start_date,
                l.end_date,
                l.reason,
                l.status,
                l.admin_remarks,
                l.created_at
            FROM salesman_leave_applications l
            JOIN users u ON u.id = l.user_id
            WHERE u.company_id = $1
            ORDER BY l.created_at DESC, l.id DESC
            LIMIT $2"#,
        )
        .bind(company_id)
        .bind(limit.map_or(-1, i64::from))
        .fetch_all(pool)
        .await
    }
}
