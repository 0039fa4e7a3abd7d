pub mod employee;
pub mod kondite;
pub mod kpi;
pub mod kpi_category;
pub mod kpi_evaluation;
pub mod role;
