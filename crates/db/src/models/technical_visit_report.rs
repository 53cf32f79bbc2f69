use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, SqlitePool, types::Json};
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct TechnicalVisitReportRow {
    pub id: Uuid,
    pub report_date: NaiveDate,
    pub visit_type: String,
    pub site_name_concerned_person: String,
    pub phone_no: String,
    pub email_id: Option<String>,
    pub site_visit_brand_in_use: Json<Vec<String>>,
    pub conversion_quantity_value: Option<String>,
    pub clients_remarks: String,
    pub salesperson_remarks: String,
    pub check_in_time: DateTime<Utc>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub salesman_first_name: Option<String>,
    pub salesman_last_name: Option<String>,
    pub salesman_email: String,
    pub created_at: DateTime<Utc>,
}

impl TechnicalVisitReportRow {
    pub async fn find_by_company_id(
        pool: &SqlitePool,
        company_id: Uuid,
        limit: Option<u32>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, TechnicalVisitReportRow>(
            r#"SELECT
                r.id,
                r.report_date,
                r.visit_type,
                r.site_name_concerned_person,
                r.phone_no,
                r.email_id,
                r.site_visit_brand_in_use,
                r.conversion_quantity_value,
                r.clients_remarks,
                r.salesperson_remarks,
                r.check_in_time,
                r.check_out_time,
                u.first_name AS salesman_first_name,
                u.last_name  AS salesman_last_name,
                u.email      AS salesman_email,
                r.created_at
            FROM technical_visit_reports r
            JOIN users u ON u.id = r.user_id
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
