//! Read models for the reportable field-sales tables.
//!
//! Every query here is restricted to one company. Rows carry the display
//! columns of their to-one relations (names and emails) so the report layer
//! never issues follow-up queries.

pub mod daily_visit_report;
pub mod dealer;
pub mod dealer_score;
pub mod permanent_journey_plan;
pub mod sales_order;
pub mod salesman_attendance;
pub mod salesman_leave_application;
pub mod technical_visit_report;
pub mod user;
