use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, SqlitePool, types::Json};
use uuid::Uuid;

/// A daily visit report with salesman, dealer and sub-dealer names resolved
#[derive(Debug, Clone, FromRow)]
pub struct DailyVisitReportRow {
    pub id: Uuid,
    pub report_date: NaiveDate,
    pub dealer_type: String,
    pub dealer_name: Option<String>,
    pub sub_dealer_name: Option<String>,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub visit_type: String,
    pub dealer_total_potential: String,
    pub dealer_best_potential: String,
    pub brand_selling: Json<Vec<String>>,
    pub contact_person: Option<String>,
    pub contact_person_phone_no: Option<String>,
    pub today_order_mt: String,
    pub today_collection_rupees: String,
    pub overdue_amount: Option<String>,
    pub feedbacks: String,
    pub check_in_time: DateTime<Utc>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub salesman_first_name: Option<String>,
    pub salesman_last_name: Option<String>,
    pub salesman_email: String,
    pub created_at: DateTime<Utc>,
}

impl DailyVisitReportRow {
    pub async fn find_by_company_id(
        pool: &SqlitePool,
        company_id: Uuid,
        limit: Option<u32>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, DailyVisitReportRow>(
            r#"SELECT
                r.id,
                r.report_date,
                r.dealer_type,
                d.name  AS dealer_name,
                sd.name AS sub_dealer_name,
                r.location,
                r.latitude,
                r.longitude,
                r.visit_type,
                r.dealer_total_potential,
                r.dealer_best_potential,
                r.brand_selling,
                r.contact_person,
                r.contact_person_phone_no,
                r.today_order_mt,
                r.today_collection_rupees,
                r.overdue_amount,
                r.feedbacks,
                r.check_in_time,
                r.check_out_time,
                u.first_name AS salesman_first_name,
                u.last_name  AS salesman_last_name,
                u.email      AS salesman_email,
                r.created_at
            FROM daily_visit_reports r
            JOIN users u ON u.id = r.user_id
            LEFT JOIN dealers d  ON d.id  = r.dealer_id
            LEFT JOIN dealers sd ON sd.id = r.sub_dealer_id
            WHERE u.company_id = $1
            ORDER BY r.report_date DESC, r.created_at DESC, r.id DESC
            LIMIT $2"#,
        )
        .bind(company_id)
        .bind(limit.map_or(-1, i64::from))
        .fetch_all(pool)
        .await
    }
}
