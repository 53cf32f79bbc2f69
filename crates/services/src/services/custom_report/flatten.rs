//! Row mappers turning joined database rows into flat report rows.
//!
//! Every mapper emits exactly the columns its catalog table declares.

use db::models::{
    daily_visit_report::DailyVisitReportRow, dealer::DealerReportRow,
    dealer_score::DealerScoreRow, permanent_journey_plan::PermanentJourneyPlanRow,
    sales_order::SalesOrderRow, salesman_attendance::SalesmanAttendanceRow,
    salesman_leave_application::SalesmanLeaveApplicationRow,
    technical_visit_report::TechnicalVisitReportRow, user::UserReportRow,
};

use super::{
    CustomReportError,
    values::{FlatRow, date, decimal, display_name, joined, optional_decimal, timestamp},
};

pub fn user(row: &UserReportRow) -> FlatRow {
    FlatRow::new()
        .with("id", row.id)
        .with("email", row.email.as_str())
        .with("firstName", row.first_name.as_deref())
        .with("lastName", row.last_name.as_deref())
        .with(
            "fullName",
            display_name(
                row.first_name.as_deref(),
                row.last_name.as_deref(),
                Some(row.email.as_str()),
            ),
        )
        .with("phoneNumber", row.phone_number.as_deref())
        .with("role", row.role.as_str())
        .with("region", row.region.as_deref())
        .with("area", row.area.as_deref())
        .with("salesmanLoginId", row.salesman_login_id.as_deref())
        .with("status", row.status.as_str())
        .with("isTechnicalRole", row.is_technical_role)
        .with(
            "reportsToName",
            display_name(
                row.reports_to_first_name.as_deref(),
                row.reports_to_last_name.as_deref(),
                row.reports_to_email.as_deref(),
            ),
        )
        .with("companyName", row.company_name.as_str())
        .with("createdAt", timestamp(row.created_at))
        .with("updatedAt", timestamp(row.updated_at))
}

pub fn dealer(row: &DealerReportRow) -> Result<FlatRow, CustomReportError> {
    Ok(FlatRow::new()
        .with("id", row.id)
        .with("type", row.dealer_type.as_str())
        .with("name", row.name.as_str())
        .with("region", row.region.as_str())
        .with("area", row.area.as_str())
        .with("phoneNo", row.phone_no.as_str())
        .with("address", row.address.as_str())
        .with("pinCode", row.pin_code.as_deref())
        .with("latitude", row.latitude)
        .with("longitude", row.longitude)
        .with("dateOfBirth", row.date_of_birth.map(date))
        .with("anniversaryDate", row.anniversary_date.map(date))
        .with("totalPotential", decimal("totalPotential", &row.total_potential)?)
        .with("bestPotential", decimal("bestPotential", &row.best_potential)?)
        .with("brandSelling", joined(&row.brand_selling))
        .with("feedbacks", row.feedbacks.as_str())
        .with("remarks", row.remarks.as_deref())
        .with(
            "salesmanName",
            display_name(
                row.salesman_first_name.as_deref(),
                row.salesman_last_name.as_deref(),
                Some(row.salesman_email.as_str()),
            ),
        )
        .with("parentDealerName", row.parent_dealer_name.as_deref())
        .with("createdAt", timestamp(row.created_at)))
}

pub fn daily_visit_report(row: &DailyVisitReportRow) -> Result<FlatRow, CustomReportError> {
    Ok(FlatRow::new()
        .with("id", row.id)
        .with("reportDate", date(row.report_date))
        .with(
            "salesmanName",
            display_name(
                row.salesman_first_name.as_deref(),
                row.salesman_last_name.as_deref(),
                Some(row.salesman_email.as_str()),
            ),
        )
        .with("dealerType", row.dealer_type.as_str())
        .with("dealerName", row.dealer_name.as_deref())
        .with("subDealerName", row.sub_dealer_name.as_deref())
        .with("location", row.location.as_str())
        .with("latitude", row.latitude)
        .with("longitude", row.longitude)
        .with("visitType", row.visit_type.as_str())
        .with(
            "dealerTotalPotential",
            decimal("dealerTotalPotential", &row.dealer_total_potential)?,
        )
        .with(
            "dealerBestPotential",
            decimal("dealerBestPotential", &row.dealer_best_potential)?,
        )
        .with("brandSelling", joined(&row.brand_selling))
        .with("contactPerson", row.contact_person.as_deref())
        .with("contactPersonPhoneNo", row.contact_person_phone_no.as_deref())
        .with("todayOrderMt", decimal("todayOrderMt", &row.today_order_mt)?)
        .with(
            "todayCollectionRupees",
            decimal("todayCollectionRupees", &row.today_collection_rupees)?,
        )
        .with(
            "overdueAmount",
            optional_decimal("overdueAmount", row.overdue_amount.as_deref())?,
        )
        .with("feedbacks", row.feedbacks.as_str())
        .with("checkInTime", timestamp(row.check_in_time))
        .with("checkOutTime", row.check_out_time.map(timestamp))
        .with("createdAt", timestamp(row.created_at)))
}

pub fn technical_visit_report(
    row: &TechnicalVisitReportRow,
) -> Result<FlatRow, CustomReportError> {
    Ok(FlatRow::new()
        .with("id", row.id)
        .with("reportDate", date(row.report_date))
        .with(
            "salesmanName",
            display_name(
                row.salesman_first_name.as_deref(),
                row.salesman_last_name.as_deref(),
                Some(row.salesman_email.as_str()),
            ),
        )
        .with("visitType", row.visit_type.as_str())
        .with("siteNameConcernedPerson", row.site_name_concerned_person.as_str())
        .with("phoneNo", row.phone_no.as_str())
        .with("emailId", row.email_id.as_deref())
        .with("siteVisitBrandInUse", joined(&row.site_visit_brand_in_use))
        .with(
            "conversionQuantityValue",
            optional_decimal(
                "conversionQuantityValue",
                row.conversion_quantity_value.as_deref(),
            )?,
        )
        .with("clientsRemarks", row.clients_remarks.as_str())
        .with("salespersonRemarks", row.salesperson_remarks.as_str())
        .with("checkInTime", timestamp(row.check_in_time))
        .with("checkOutTime", row.check_out_time.map(timestamp))
        .with("createdAt", timestamp(row.created_at)))
}

pub fn permanent_journey_plan(row: &PermanentJourneyPlanRow) -> FlatRow {
    FlatRow::new()
        .with("id", row.id)
        .with("planDate", date(row.plan_date))
        .with("areaToBeVisited", row.area_to_be_visited.as_str())
        .with("description", row.description.as_deref())
        .with("status", row.status.as_str())
        .with(
            "assignedSalesmanName",
            display_name(
                row.assigned_first_name.as_deref(),
                row.assigned_last_name.as_deref(),
                Some(row.assigned_email.as_str()),
            ),
        )
        .with(
            "createdByName",
            display_name(
                row.created_by_first_name.as_deref(),
                row.created_by_last_name.as_deref(),
                row.created_by_email.as_deref(),
            ),
        )
        .with("createdAt", timestamp(row.created_at))
}

pub fn sales_order(row: &SalesOrderRow) -> Result<FlatRow, CustomReportError> {
    Ok(FlatRow::new()
        .with("id", row.id)
        .with(
            "salesmanName",
            display_name(
                row.salesman_first_name.as_deref(),
                row.salesman_last_name.as_deref(),
                Some(row.salesman_email.as_str()),
            ),
        )
        .with("dealerName", row.dealer_name.as_deref())
        .with("quantity", decimal("quantity", &row.quantity)?)
        .with("unit", row.unit.as_str())
        .with(
            "orderUnitPrice",
            optional_decimal("orderUnitPrice", row.order_unit_price.as_deref())?,
        )
        .with("orderTotal", decimal("orderTotal", &row.order_total)?)
        .with(
            "advancePayment",
            optional_decimal("advancePayment", row.advance_payment.as_deref())?,
        )
        .with("estimatedDelivery", row.estimated_delivery.map(date))
        .with("remarks", row.remarks.as_deref())
        .with("createdAt", timestamp(row.created_at)))
}

pub fn salesman_attendance(row: &SalesmanAttendanceRow) -> FlatRow {
    FlatRow::new()
        .with("id", row.id)
        .with(
            "salesmanName",
            display_name(
                row.salesman_first_name.as_deref(),
                row.salesman_last_name.as_deref(),
                Some(row.salesman_email.as_str()),
            ),
        )
        .with("attendanceDate", date(row.attendance_date))
        .with("locationName", row.location_name.as_str())
        .with("role", row.role.as_str())
        .with("inTimeTimestamp", timestamp(row.in_time_timestamp))
        .with("outTimeTimestamp", row.out_time_timestamp.map(timestamp))
        .with("inTimeLatitude", row.in_time_latitude)
        .with("inTimeLongitude", row.in_time_longitude)
        .with("outTimeLatitude", row.out_time_latitude)
        .with("outTimeLongitude", row.out_time_longitude)
        .with("createdAt", timestamp(row.created_at))
}

pub fn salesman_leave_application(row: &SalesmanLeaveApplicationRow) -> FlatRow {
    FlatRow::new()
        .with("id", row.id)
        .with(
            "salesmanName",
            display_name(
                row.salesman_first_name.as_deref(),
                row.salesman_last_name.as_deref(),
                Some(row.salesman_email.as_str()),
            ),
        )
        .with("leaveType", row.leave_type.as_str())
        .with("startDate", date(row.start_date))
        .with("endDate", date(row.end_date))
        .with("reason", row.reason.as_str())
        .with("status", row.status.as_str())
        .with("adminRemarks", row.admin_remarks.as_deref())
        .with("createdAt", timestamp(row.created_at))
}

pub fn dealer_score(row: &DealerScoreRow) -> Result<FlatRow, CustomReportError> {
    Ok(FlatRow::new()
        .with("id", row.id)
        .with("dealerName", row.dealer_name.as_str())
        .with("dealerScore", decimal("dealerScore", &row.dealer_score)?)
        .with(
            "trustWorthinessScore",
            decimal("trustWorthinessScore", &row.trust_worthiness_score)?,
        )
        .with(
            "creditWorthinessScore",
            decimal("creditWorthinessScore", &row.credit_worthiness_score)?,
        )
        .with(
            "orderHistoryScore",
            decimal("orderHistoryScore", &row.order_history_score)?,
        )
        .with(
            "visitFrequencyScore",
            decimal("visitFrequencyScore", &row.visit_frequency_score)?,
        )
        .with("lastUpdatedDate", timestamp(row.last_updated_date))
        .with("createdAt", timestamp(row.created_at)))
}
