pub mod bonus_report;
pub mod employee;
pub mod kondite;
pub mod kpi;
pub mod kpi_category;
pub mod kpi_evaluation;
