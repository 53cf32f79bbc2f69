//! Insert helpers used by tests across the workspace.
//!
//! Each `New*` struct starts from plausible defaults; tests override only the
//! fields they assert on.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use sqlx::{SqlitePool, types::Json};
use uuid::Uuid;

/// Fixed reference instant so fixtures stay deterministic
pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

pub async fn insert_company(pool: &SqlitePool, name: &str) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO companies (id, company_name) VALUES ($1, $2)")
        .bind(id)
        .bind(name)
        .execute(pool)
        .await?;
    Ok(id)
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub company_id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
    pub region: Option<String>,
    pub is_technical_role: bool,
    pub reports_to_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    pub fn salesman(company_id: Uuid, email: &str) -> Self {
        Self {
            company_id,
            email: email.to_string(),
            first_name: None,
            last_name: None,
            role: "salesman".to_string(),
            region: None,
            is_technical_role: false,
            reports_to_id: None,
            created_at: at(1, 9),
        }
    }

    pub fn named(mut self, first: &str, last: &str) -> Self {
        self.first_name = Some(first.to_string());
        self.last_name = Some(last.to_string());
        self
    }

    pub async fn insert(&self, pool: &SqlitePool) -> Result<Uuid, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"INSERT INTO users
                (id, company_id, email, first_name, last_name, role, region,
                 is_technical_role, reports_to_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)"#,
        )
        .bind(id)
        .bind(self.company_id)
        .bind(&self.email)
        .bind(&self.first_name)
        .bind(&self.last_name)
        .bind(&self.role)
        .bind(&self.region)
        .bind(self.is_technical_role)
        .bind(self.reports_to_id)
        .bind(self.created_at)
        .execute(pool)
        .await?;
        Ok(id)
    }
}

#[derive(Debug, Clone)]
pub struct NewDealer {
    pub user_id: Option<Uuid>,
    pub parent_dealer_id: Option<Uuid>,
    pub name: String,
    pub region: String,
    pub area: String,
    pub date_of_birth: Option<NaiveDate>,
    pub total_potential: String,
    pub best_potential: String,
    pub brand_selling: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl NewDealer {
    pub fn owned_by(user_id: Uuid, name: &str) -> Self {
        Self {
            user_id: Some(user_id),
            parent_dealer_id: None,
            name: name.to_string(),
            region: "North".to_string(),
            area: "Central".to_string(),
            date_of_birth: None,
            total_potential: "100.00".to_string(),
            best_potential: "80.00".to_string(),
            brand_selling: vec![],
            created_at: at(2, 9),
        }
    }

    pub async fn insert(&self, pool: &SqlitePool) -> Result<Uuid, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"INSERT INTO dealers
                (id, user_id, parent_dealer_id, dealer_type, name, region, area,
                 phone_no, address, date_of_birth, total_potential, best_potential,
                 brand_selling, feedbacks, created_at, updated_at)
            VALUES ($1, $2, $3, 'Dealer', $4, $5, $6, '9000000000', '1 Market Road',
                    $7, $8, $9, $10, 'Interested', $11, $11)"#,
        )
        .bind(id)
        .bind(self.user_id)
        .bind(self.parent_dealer_id)
        .bind(&self.name)
        .bind(&self.region)
        .bind(&self.area)
        .bind(self.date_of_birth)
        .bind(&self.total_potential)
        .bind(&self.best_potential)
        .bind(Json(&self.brand_selling))
        .bind(self.created_at)
        .execute(pool)
        .await?;
        Ok(id)
    }
}

#[derive(Debug, Clone)]
pub struct NewDailyVisitReport {
    pub user_id: Uuid,
    pub dealer_id: Option<Uuid>,
    pub report_date: NaiveDate,
    pub brand_selling: Vec<String>,
    pub dealer_total_potential: String,
    pub today_order_mt: String,
    pub check_in_time: DateTime<Utc>,
    pub check_out_time: Option<DateTime<Utc>>,
}

impl NewDailyVisitReport {
    pub fn by(user_id: Uuid, report_date: NaiveDate) -> Self {
        Self {
            user_id,
            dealer_id: None,
            report_date,
            brand_selling: vec![],
            dealer_total_potential: "0".to_string(),
            today_order_mt: "0".to_string(),
            check_in_time: at(3, 10),
            check_out_time: None,
        }
    }

    pub async fn insert(&self, pool: &SqlitePool) -> Result<Uuid, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"INSERT INTO daily_visit_reports
                (id, user_id, dealer_id, report_date, dealer_type, location, latitude,
                 longitude, visit_type, dealer_total_potential, dealer_best_potential,
                 brand_selling, today_order_mt, today_collection_rupees, feedbacks,
                 check_in_time, check_out_time, created_at)
            VALUES ($1, $2, $3, $4, 'Dealer', 'Market Road', 28.61, 77.20, 'Regular',
                    $5, '0', $6, $7, '0', 'Good', $8, $9, $8)"#,
        )
        .bind(id)
        .bind(self.user_id)
        .bind(self.dealer_id)
        .bind(self.report_date)
        .bind(&self.dealer_total_potential)
        .bind(Json(&self.brand_selling))
        .bind(&self.today_order_mt)
        .bind(self.check_in_time)
        .bind(self.check_out_time)
        .execute(pool)
        .await?;
        Ok(id)
    }
}

pub async fn insert_technical_visit_report(
    pool: &SqlitePool,
    user_id: Uuid,
    report_date: NaiveDate,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"INSERT INTO technical_visit_reports
            (id, user_id, report_date, visit_type, site_name_concerned_person, phone_no,
             site_visit_brand_in_use, clients_remarks, salesperson_remarks,
             check_in_time, created_at)
        VALUES ($1, $2, $3, 'Site', 'Ravi Builders', '9111111111', '["Acme"]',
                'Satisfied', 'Follow up', $4, $4)"#,
    )
    .bind(id)
    .bind(user_id)
    .bind(report_date)
    .bind(at(4, 11))
    .execute(pool)
    .await?;
    Ok(id)
}

pub async fn insert_permanent_journey_plan(
    pool: &SqlitePool,
    user_id: Uuid,
    created_by_id: Option<Uuid>,
    plan_date: NaiveDate,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"INSERT INTO permanent_journey_plans
            (id, user_id, created_by_id, plan_date, area_to_be_visited, created_at)
        VALUES ($1, $2, $3, $4, 'Central', $5)"#,
    )
    .bind(id)
    .bind(user_id)
    .bind(created_by_id)
    .bind(plan_date)
    .bind(at(5, 8))
    .execute(pool)
    .await?;
    Ok(id)
}

pub async fn insert_sales_order(
    pool: &SqlitePool,
    user_id: Uuid,
    dealer_id: Option<Uuid>,
    order_total: &str,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"INSERT INTO sales_orders
            (id, user_id, dealer_id, quantity, unit, order_total, created_at)
        VALUES ($1, $2, $3, '10', 'MT', $4, $5)"#,
    )
    .bind(id)
    .bind(user_id)
    .bind(dealer_id)
    .bind(order_total)
    .bind(at(6, 12))
    .execute(pool)
    .await?;
    Ok(id)
}

pub async fn insert_salesman_attendance(
    pool: &SqlitePool,
    user_id: Uuid,
    in_time: DateTime<Utc>,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"INSERT INTO salesman_attendance
            (id, user_id, attendance_date, location_name, role, in_time_timestamp,
             in_time_latitude, in_time_longitude, created_at)
        VALUES ($1, $2, $3, 'Head Office', 'salesman', $4, 28.61, 77.20, $4)"#,
    )
    .bind(id)
    .bind(user_id)
    .bind(in_time.date_naive())
    .bind(in_time)
    .execute(pool)
    .await?;
    Ok(id)
}

pub async fn insert_salesman_leave_application(
    pool: &SqlitePool,
    user_id: Uuid,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"INSERT INTO salesman_leave_applications
            (id, user_id, leave_type, start_date, end_date, reason, created_at)
        VALUES ($1, $2, 'Casual', $3, $4, 'Family function', $5)"#,
    )
    .bind(id)
    .bind(user_id)
    .bind(start_date)
    .bind(end_date)
    .bind(at(7, 9))
    .execute(pool)
    .await?;
    Ok(id)
}

pub async fn insert_dealer_score(
    pool: &SqlitePool,
    dealer_id: Uuid,
    dealer_score: &str,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"INSERT INTO dealer_scores
            (id, dealer_id, dealer_score, trust_worthiness_score, credit_worthiness_score,
             order_history_score, visit_frequency_score, last_updated_date, created_at)
        VALUES ($1, $2, $3, '7.5', '8.0', '6.25', '9', $4, $4)"#,
    )
    .bind(id)
    .bind(dealer_id)
    .bind(dealer_score)
    .bind(at(8, 18))
    .execute(pool)
    .await?;
    Ok(id)
}
