use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct SalesmanAttendanceRow {
    pub id: Uuid,
    pub salesman_first_name: Option<String>,
    pub salesman_last_name: Option<String>,
    pub salesman_email: String,
    pub attendance_date: NaiveDate,
    pub location_name: String,
    pub role: String,
    pub in_time_timestamp: DateTime<Utc>,
    pub out_time_timestamp: Option<DateTime<Utc>>,
    pub in_time_latitude: f64,
    pub in_time_longitude: f64,
    pub out_time_latitude: Option<f64>,
    pub out_time_longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl SalesmanAttendanceRow {
    pub async fn find_by_company_id(
        pool: &SqlitePool,
        company_id: Uuid,
        limit: Option<u32>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, SalesmanAttendanceRow>(
            r#"SELECT
                a.id,
                u.first_name AS salesman_first_name,
                u.last_name  AS salesman_last_name,
                u.email      AS salesman_email,
                a.attendance_date,
                a.location_name,
                a.role,
                a.in_time_timestamp,
                a.out_time_timestamp,
                a.in_time_latitude,
                a.in_time_longitude,
                a.out_time_latitude,
                a.out_time_longitude,
                a.created_at
            FROM salesman_attendance a
            JOIN users u ON u.id = a.user_id
            WHERE u.company_id = $1
            ORDER BY a.in_time_timestamp DESC, a.id DESC
            LIMIT $2"#,
        )
        .bind(company_id)
        .bind(limit.map_or(-1, i64::from))
        .fetch_all(pool)
        .await
    }
}
