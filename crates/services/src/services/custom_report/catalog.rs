//! Static catalog of reportable tables and their exportable columns.
//!
//! Column names are the camelCase keys produced by the flattening layer. The
//! order here is the order the builder offers them in.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};
use ts_rs::TS;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ReportEntity {
    Users,
    Dealers,
    DailyVisitReports,
    TechnicalVisitReports,
    PermanentJourneyPlans,
    SalesOrders,
    SalesmanAttendance,
    SalesmanLeaveApplications,
    DealerScores,
}

/// Display metadata and column list for one reportable table
#[derive(Debug)]
pub struct ReportTable {
    pub entity: ReportEntity,
    pub title: &'static str,
    pub icon: &'static str,
    pub columns: &'static [&'static str],
}

impl ReportTable {
    /// The catalog's own copy of `column`, if declared
    pub fn column(&self, column: &str) -> Option<&'static str> {
        self.columns.iter().copied().find(|c| *c == column)
    }
}

static USERS: ReportTable = ReportTable {
    entity: ReportEntity::Users,
    title: "Users",
    icon: "users",
    columns: &[
        "id",
        "email",
        "firstName",
        "lastName",
        "fullName",
        "phoneNumber",
        "role",
        "region",
        "area",
        "salesmanLoginId",
        "status",
        "isTechnicalRole",
        "reportsToName",
        "companyName",
        "createdAt",
        "updatedAt",
    ],
};

static DEALERS: ReportTable = ReportTable {
    entity: ReportEntity::Dealers,
    title: "Dealers",
    icon: "store",
    columns: &[
        "id",
        "type",
        "name",
        "region",
        "area",
        "phoneNo",
        "address",
        "pinCode",
        "latitude",
        "longitude",
        "dateOfBirth",
        "anniversaryDate",
        "totalPotential",
        "bestPotential",
        "brandSelling",
        "feedbacks",
        "remarks",
        "salesmanName",
        "parentDealerName",
        "createdAt",
    ],
};

static DAILY_VISIT_REPORTS: ReportTable = ReportTable {
    entity: ReportEntity::DailyVisitReports,
    title: "Daily Visit Reports",
    icon: "clipboard-list",
    columns: &[
        "id",
        "reportDate",
        "salesmanName",
        "dealerType",
        "dealerName",
        "subDealerName",
        "location",
        "latitude",
        "longitude",
        "visitType",
        "dealerTotalPotential",
        "dealerBestPotential",
        "brandSelling",
        "contactPerson",
        "contactPersonPhoneNo",
        "todayOrderMt",
        "todayCollectionRupees",
        "overdueAmount",
        "feedbacks",
        "checkInTime",
        "checkOutTime",
        "createdAt",
    ],
};

static TECHNICAL_VISIT_REPORTS: ReportTable = ReportTable {
    entity: ReportEntity::TechnicalVisitReports,
    title: "Technical Visit Reports",
    icon: "hard-hat",
    columns: &[
        "id",
        "reportDate",
        "salesmanName",
        "visitType",
        "siteNameConcernedPerson",
        "phoneNo",
        "emailId",
        "siteVisitBrandInUse",
        "conversionQuantityValue",
        "clientsRemarks",
        "salespersonRemarks",
        "checkInTime",
        "checkOutTime",
        "createdAt",
    ],
};

static PERMANENT_JOURNEY_PLANS: ReportTable = ReportTable {
    entity: ReportEntity::PermanentJourneyPlans,
    title: "Permanent Journey Plans",
    icon: "map",
    columns: &[
        "id",
        "planDate",
        "areaToBeVisited",
        "description",
        "status",
        "assignedSalesmanName",
        "createdByName",
        "createdAt",
    ],
};

static SALES_ORDERS: ReportTable = ReportTable {
    entity: ReportEntity::SalesOrders,
    title: "Sales Orders",
    icon: "shopping-cart",
    columns: &[
        "id",
        "salesmanName",
        "dealerName",
        "quantity",
        "unit",
        "orderUnitPrice",
        "orderTotal",
        "advancePayment",
        "estimatedDelivery",
        "remarks",
        "createdAt",
    ],
};

static SALESMAN_ATTENDANCE: ReportTable = ReportTable {
    entity: ReportEntity::SalesmanAttendance,
    title: "Salesman Attendance",
    icon: "calendar-check",
    columns: &[
        "id",
        "salesmanName",
        "attendanceDate",
        "locationName",
        "role",
        "inTimeTimestamp",
        "outTimeTimestamp",
        "inTimeLatitude",
        "inTimeLongitude",
        "outTimeLatitude",
        "outTimeLongitude",
        "createdAt",
    ],
};

static SALESMAN_LEAVE_APPLICATIONS: ReportTable = ReportTable {
    entity: ReportEntity::SalesmanLeaveApplications,
    title: "Leave Applications",
    icon: "calendar-x",
    columns: &[
        "id",
        "salesmanName",
        "leaveType",
        "startDate",
        "endDate",
        "reason",
        "status",
        "adminRemarks",
        "createdAt",
    ],
};

static DEALER_SCORES: ReportTable = ReportTable {
    entity: ReportEntity::DealerScores,
    title: "Dealer Scores",
    icon: "star",
    columns: &[
        "id",
        "dealerName",
        "dealerScore",
        "trustWorthinessScore",
        "creditWorthinessScore",
        "orderHistoryScore",
        "visitFrequencyScore",
        "lastUpdatedDate",
        "createdAt",
    ],
};

impl ReportEntity {
    pub fn table(self) -> &'static ReportTable {
        match self {
            Self::Users => &USERS,
            Self::Dealers => &DEALERS,
            Self::DailyVisitReports => &DAILY_VISIT_REPORTS,
            Self::TechnicalVisitReports => &TECHNICAL_VISIT_REPORTS,
            Self::PermanentJourneyPlans => &PERMANENT_JOURNEY_PLANS,
            Self::SalesOrders => &SALES_ORDERS,
            Self::SalesmanAttendance => &SALESMAN_ATTENDANCE,
            Self::SalesmanLeaveApplications => &SALESMAN_LEAVE_APPLICATIONS,
            Self::DealerScores => &DEALER_SCORES,
        }
    }

    /// Wire identifier, e.g. `dailyVisitReports`
    pub fn id(self) -> &'static str {
        self.into()
    }
}

pub fn find(id: &str) -> Option<&'static ReportTable> {
    ReportEntity::from_str(id).ok().map(ReportEntity::table)
}

/// Declared columns for `id`; unknown tables have none
pub fn columns_for(id: &str) -> &'static [&'static str] {
    find(id).map(|table| table.columns).unwrap_or(&[])
}

pub fn all() -> impl Iterator<Item = &'static ReportTable> {
    ReportEntity::iter().map(ReportEntity::table)
}

/// Catalog entry as served to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct ReportTableInfo {
    pub id: String,
    pub title: String,
    pub icon: String,
    pub columns: Vec<String>,
}

impl From<&ReportTable> for ReportTableInfo {
    fn from(table: &ReportTable) -> Self {
        Self {
            id: table.entity.id().to_string(),
            title: table.title.to_string(),
            icon: table.icon.to_string(),
            columns: table.columns.iter().map(|c| c.to_string()).collect(),
        }
    }
}

pub fn table_infos() -> Vec<ReportTableInfo> {
    all().map(ReportTableInfo::from).collect()
}
