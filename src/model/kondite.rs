use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Kondite {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1)]
    pub employee_id: u64,

    #[schema(example = "SP1")]
    pub category: String,

    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub start_date: NaiveDate,

    #[schema(example = "2026-06-30", value_type = String, format = "date")]
    pub end_date: NaiveDate,

    #[schema(example = "Written warning")]
    pub description: String,

    /// Points subtracted from the KPI total during calibration
    #[schema(example = 0.5)]
    pub min_point: f64,
}

/// Kondite joined with the owning employee's name, for listings.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct KonditeWithEmployee {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub kondite: Kondite,

    #[schema(example = "Budi Santoso")]
    pub employee_name: String,
}
