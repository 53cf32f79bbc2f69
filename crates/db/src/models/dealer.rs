use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, SqlitePool, types::Json};
use uuid::Uuid;

/// A dealer joined with its owning salesman and parent dealer
#[derive(Debug, Clone, FromRow)]
pub struct DealerReportRow {
    pub id: Uuid,
    pub dealer_type: String,
    pub name: String,
    pub region: String,
    pub area: String,
    pub phone_no: String,
    pub address: String,
    pub pin_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub date_of_birth: Option<NaiveDate>,
    pub anniversary_date: Option<NaiveDate>,
    pub total_potential: String,
    pub best_potential: String,
    pub brand_selling: Json<Vec<String>>,
    pub feedbacks: String,
    pub remarks: Option<String>,
    pub salesman_first_name: Option<String>,
    pub salesman_last_name: Option<String>,
    pub salesman_email: String,
    pub parent_dealer_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DealerReportRow {
    /// Dealers whose owning salesman belongs to `company_id`
    pub async fn find_by_company_id(
        pool: &SqlitePool,
        company_id: Uuid,
        limit: Option<u32>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, DealerReportRow>(
            r#"SELECT
                d.id,
                d.dealer_type,
                d.name,
                d.region,
                d.area,
                d.phone_no,
                d.address,
                d.pin_code,
                d.latitude,
                d.longitude,
                d.date_of_birth,
                d.anniversary_date,
                d.total_potential,
                d.best_potential,
                d.brand_selling,
                d.feedbacks,
                d.remarks,
                u.first_name AS salesman_first_name,
                u.last_name  AS salesman_last_name,
                u.email      AS salesman_email,
                p.name       AS parent_dealer_name,
                d.created_at
            FROM dealers d
            JOIN users u ON u.id = d.user_id
            LEFT JOIN dealers p ON p.id = d.parent_dealer_id
            WHERE u.company_id = $1
            ORDER BY d.created_at DESC, d.id DESC
            LIMIT $2"#,
        )
        .bind(company_id)
        .bind(limit.map_or(-1, i64::from))
        .fetch_all(pool)
        .await
    }
}
