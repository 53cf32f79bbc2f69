//! Where flattened rows come from.

use async_trait::async_trait;
use db::models::{
    daily_visit_report::DailyVisitReportRow, dealer::DealerReportRow,
    dealer_score::DealerScoreRow, permanent_journey_plan::PermanentJourneyPlanRow,
    sales_order::SalesOrderRow, salesman_attendance::SalesmanAttendanceRow,
    salesman_leave_application::SalesmanLeaveApplicationRow,
    technical_visit_report::TechnicalVisitReportRow, user::UserReportRow,
};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use super::{CustomReportError, catalog::ReportEntity, flatten, values::FlatRow};

/// Produces the flattened rows of one table for one company, most recent
/// first. `limit` bounds the read itself; `None` reads every row.
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn flatten(
        &self,
        entity: ReportEntity,
        company_id: Uuid,
        limit: Option<u32>,
    ) -> Result<Vec<FlatRow>, CustomReportError>;
}

/// Reads report rows straight from the field-sales database
#[derive(Clone)]
pub struct SqliteReportSource {
    pool: SqlitePool,
}

impl SqliteReportSource {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportSource for SqliteReportSource {
    async fn flatten(
        &self,
        entity: ReportEntity,
        company_id: Uuid,
        limit: Option<u32>,
    ) -> Result<Vec<FlatRow>, CustomReportError> {
        let pool = &self.pool;
        let rows: Vec<FlatRow> = match entity {
            ReportEntity::Users => UserReportRow::find_by_company_id(pool, company_id, limit)
                .await?
                .iter()
                .map(flatten::user)
                .collect(),
            ReportEntity::Dealers => DealerReportRow::find_by_company_id(pool, company_id, limit)
                .await?
                .iter()
                .map(flatten::dealer)
                .collect::<Result<_, _>>()?,
            ReportEntity::DailyVisitReports => {
                DailyVisitReportRow::find_by_company_id(pool, company_id, limit)
                    .await?
                    .iter()
                    .map(flatten::daily_visit_report)
                    .collect::<Result<_, _>>()?
            }
            ReportEntity::TechnicalVisitReports => {
                TechnicalVisitReportRow::find_by_company_id(pool, company_id, limit)
                    .await?
                    .iter()
                    .map(flatten::technical_visit_report)
                    .collect::<Result<_, _>>()?
            }
            ReportEntity::PermanentJourneyPlans => {
                PermanentJourneyPlanRow::find_by_company_id(pool, company_id, limit)
                    .await?
                    .iter()
                    .map(flatten::permanent_journey_plan)
                    .collect()
            }
            ReportEntity::SalesOrders => SalesOrderRow::find_by_company_id(pool, company_id, limit)
                .await?
                .iter()
                .map(flatten::sales_order)
                .collect::<Result<_, _>>()?,
            ReportEntity::SalesmanAttendance => {
                SalesmanAttendanceRow::find_by_company_id(pool, company_id, limit)
                    .await?
                    .iter()
                    .map(flatten::salesman_attendance)
                    .collect()
            }
            ReportEntity::SalesmanLeaveApplications => {
                SalesmanLeaveApplicationRow::find_by_company_id(pool, company_id, limit)
                    .await?
                    .iter()
                    .map(flatten::salesman_leave_application)
                    .collect()
            }
            ReportEntity::DealerScores => DealerScoreRow::find_by_company_id(pool, company_id, limit)
                .await?
                .iter()
                .map(flatten::dealer_score)
                .collect::<Result<_, _>>()?,
        };

        debug!(
            table = %entity,
            company_id = %company_id,
            limit = ?limit,
            rows = rows.len(),
            "Flattened report rows"
        );
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use db::{
        DBService,
        fixtures::{
            NewDailyVisitReport, NewDealer, NewUser, at, date, insert_company,
            insert_dealer_score, insert_permanent_journey_plan, insert_sales_order,
            insert_salesman_attendance, insert_salesman_leave_application,
            insert_technical_visit_report,
        },
    };
    use strum::IntoEnumIterator;

    use super::*;
    use crate::services::custom_report::values::FlatValue;

    struct Seeded {
        db: DBService,
        acme: Uuid,
        other: Uuid,
    }

    /// One company with a row in every table, plus a second company with its
    /// own dealer
    async fn seed() -> Seeded {
        let db = DBService::new_in_memory().await.unwrap();
        let pool = &db.pool;

        let acme = insert_company(pool, "Acme Cement").await.unwrap();
        let other = insert_company(pool, "Other Cement").await.unwrap();

        let manager = NewUser::salesman(acme, "manager@acme.test")
            .named("Meera", "Shah")
            .insert(pool)
            .await
            .unwrap();
        let mut salesman = NewUser::salesman(acme, "ravi@acme.test").named("Ravi", "Kumar");
        salesman.reports_to_id = Some(manager);
        salesman.created_at = at(2, 9);
        let salesman = salesman.insert(pool).await.unwrap();
        let outsider = NewUser::salesman(other, "x@other.test").insert(pool).await.unwrap();

        let mut dealer = NewDealer::owned_by(salesman, "Shree Traders");
        dealer.total_potential = "12.50".to_string();
        dealer.brand_selling = vec!["X".to_string(), "Y".to_string()];
        dealer.date_of_birth = Some(date(2024, 3, 1));
        let dealer = dealer.insert(pool).await.unwrap();
        NewDealer::owned_by(outsider, "Foreign Depot").insert(pool).await.unwrap();

        let mut visit = NewDailyVisitReport::by(salesman, date(2024, 3, 4));
        visit.dealer_id = Some(dealer);
        visit.insert(pool).await.unwrap();

        insert_technical_visit_report(pool, salesman, date(2024, 3, 5)).await.unwrap();
        insert_permanent_journey_plan(pool, salesman, Some(manager), date(2024, 3, 6))
            .await
            .unwrap();
        insert_sales_order(pool, salesman, Some(dealer), "2500.75").await.unwrap();
        insert_salesman_attendance(pool, salesman, at(7, 9)).await.unwrap();
        insert_salesman_leave_application(pool, salesman, date(2024, 3, 10), date(2024, 3, 12))
            .await
            .unwrap();
        insert_dealer_score(pool, dealer, "8.5").await.unwrap();

        Seeded { db, acme, other }
    }

    #[tokio::test]
    async fn test_every_table_emits_exactly_its_catalog_columns() {
        let seeded = seed().await;
        let source = SqliteReportSource::new(seeded.db.pool.clone());

        for entity in ReportEntity::iter() {
            let rows = source.flatten(entity, seeded.acme, None).await.unwrap();
            assert!(!rows.is_empty(), "{entity} has no rows");

            let declared: BTreeSet<_> = entity.table().columns.iter().copied().collect();
            for row in &rows {
                let emitted: BTreeSet<_> = row.fields().collect();
                assert_eq!(emitted, declared, "{entity}");
            }
        }
    }

    #[tokio::test]
    async fn test_limit_bounds_every_table_query() {
        let seeded = seed().await;
        let source = SqliteReportSource::new(seeded.db.pool.clone());

        for entity in ReportEntity::iter() {
            let none = source.flatten(entity, seeded.acme, Some(0)).await.unwrap();
            assert!(none.is_empty(), "{entity}");
            let one = source.flatten(entity, seeded.acme, Some(1)).await.unwrap();
            assert_eq!(one.len(), 1, "{entity}");
        }

        // two users in acme, newest first
        let users = source.flatten(ReportEntity::Users, seeded.acme, Some(1)).await.unwrap();
        assert_eq!(
            users[0].get("email"),
            Some(&FlatValue::Text("ravi@acme.test".into()))
        );
    }

    #[tokio::test]
    async fn test_dealer_values_are_normalised() {
        let seeded = seed().await;
        let source = SqliteReportSource::new(seeded.db.pool.clone());

        let rows = source.flatten(ReportEntity::Dealers, seeded.acme, None).await.unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];

        assert_eq!(row.get("totalPotential"), Some(&FlatValue::Number(12.5)));
        assert_eq!(row.get("dateOfBirth"), Some(&FlatValue::Text("2024-03-01".into())));
        assert_eq!(row.get("brandSelling"), Some(&FlatValue::Text("X, Y".into())));
        assert_eq!(row.get("salesmanName"), Some(&FlatValue::Text("Ravi Kumar".into())));
        assert_eq!(row.get("anniversaryDate"), Some(&FlatValue::Null));
        assert_eq!(row.get("parentDealerName"), Some(&FlatValue::Null));
        assert_eq!(
            row.get("createdAt"),
            Some(&FlatValue::Text("2024-03-02T09:00:00.000Z".into()))
        );
    }

    #[tokio::test]
    async fn test_relations_resolve_to_display_names() {
        let seeded = seed().await;
        let source = SqliteReportSource::new(seeded.db.pool.clone());

        let users = source.flatten(ReportEntity::Users, seeded.acme, None).await.unwrap();
        // newest first
        assert_eq!(users[0].get("email"), Some(&FlatValue::Text("ravi@acme.test".into())));
        assert_eq!(
            users[0].get("reportsToName"),
            Some(&FlatValue::Text("Meera Shah".into()))
        );
        assert_eq!(users[1].get("reportsToName"), Some(&FlatValue::Null));
        assert_eq!(
            users[0].get("companyName"),
            Some(&FlatValue::Text("Acme Cement".into()))
        );

        let visits = source
            .flatten(ReportEntity::DailyVisitReports, seeded.acme, None)
            .await
            .unwrap();
        assert_eq!(
            visits[0].get("dealerName"),
            Some(&FlatValue::Text("Shree Traders".into()))
        );
        assert_eq!(visits[0].get("subDealerName"), Some(&FlatValue::Null));
        assert_eq!(visits[0].get("checkOutTime"), Some(&FlatValue::Null));

        let orders = source.flatten(ReportEntity::SalesOrders, seeded.acme, None).await.unwrap();
        assert_eq!(orders[0].get("orderTotal"), Some(&FlatValue::Number(2500.75)));
        assert_eq!(orders[0].get("orderUnitPrice"), Some(&FlatValue::Null));
    }

    #[tokio::test]
    async fn test_flattening_is_idempotent() {
        let seeded = seed().await;
        let source = SqliteReportSource::new(seeded.db.pool.clone());

        for entity in ReportEntity::iter() {
            let first = source.flatten(entity, seeded.acme, None).await.unwrap();
            let second = source.flatten(entity, seeded.acme, None).await.unwrap();
            assert_eq!(first, second, "{entity}");
        }
    }

    #[tokio::test]
    async fn test_rows_never_cross_company_scope() {
        let seeded = seed().await;
        let source = SqliteReportSource::new(seeded.db.pool.clone());

        let theirs = source.flatten(ReportEntity::Dealers, seeded.other, None).await.unwrap();
        let names: Vec<_> = theirs.iter().filter_map(|row| row.get("name")).collect();
        assert_eq!(names, [&FlatValue::Text("Foreign Depot".into())]);

        let their_orders = source
            .flatten(ReportEntity::SalesOrders, seeded.other, None)
            .await
            .unwrap();
        assert!(their_orders.is_empty());

        let nobody = source.flatten(ReportEntity::Users, Uuid::new_v4(), None).await.unwrap();
        assert!(nobody.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_decimal_fails_the_table() {
        let seeded = seed().await;
        sqlx::query("UPDATE sales_orders SET order_total = 'n/a'")
            .execute(&seeded.db.pool)
            .await
            .unwrap();
        let source = SqliteReportSource::new(seeded.db.pool.clone());

        let err = source
            .flatten(ReportEntity::SalesOrders, seeded.acme, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CustomReportError::InvalidDecimal { field: "orderTotal", .. }
        ));
    }
}
