pub mod custom_report;
