use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct KpiEvaluation {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1)]
    pub employee_id: u64,
    #[schema(example = 3)]
    pub kpi_id: u64,
    #[schema(example = "good 3")]
    pub achievement: String,
    #[schema(example = 3.0)]
    pub point: f64,
}
