use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct SalesOrderRow {
    pub id: Uuid,
    pub salesman_first_name: Option<String>,
    pub salesman_last_name: Option<String>,
    pub salesman_email: String,
    pub dealer_name: Option<String>,
    pub quantity: String,
    pub unit: String,
    pub order_unit_price: Option<String>,
    pub order_total: String,
    pub advance_payment: Option<String>,
    pub estimated_delivery: Option<NaiveDate>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SalesOrderRow {
    pub async fn find_by_company_id(
        pool: &SqlitePool,
        company_id: Uuid,
        limit: Option<u32>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, SalesOrderRow>(
            r#"SELECT
                o.id,
                u.first_name AS salesman_first_name,
                u.last_name  AS salesman_last_name,
                u.email      AS salesman_email,
                d.name       AS dealer_name,
                o.quantity,
                o.unit,
                o.order_unit_price,
                o.order_total,
                o.advance_payment,
                o.estimated_delivery,
                o.remarks,
                o.created_at
            FROM sales_orders o
            JOIN users u ON u.id = o.user_id
            LEFT JOIN dealers d ON d.id = o.dealer_id
            WHERE u.company_id = $1
            ORDER BY o.created_at DESC, o.id DESC
            LIMIT $2"#,
        )
        .bind(company_id)
        .bind(limit.map_or(-1, i64::from))
        .fetch_all(pool)
        .await
    }
}
