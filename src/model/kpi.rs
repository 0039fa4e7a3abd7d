use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Kpi {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1)]
    pub employee_id: u64,

    #[schema(example = "Revenue growth")]
    pub title: String,

    /// `Perusahaan`, `Dept`/`Departemen` or `Individu`; other values are ignored by the bonus report
    #[schema(example = "Perusahaan")]
    pub category: String,

    /// Percentage, 0-100
    #[schema(example = 40.0)]
    pub weight: f64,

    #[schema(example = "10% YoY")]
    pub target: String,

    pub poor: String,
    pub fair: String,
    pub good: String,
    pub outstanding: String,
    pub exceptional: String,

    #[schema(example = 4.0)]
    pub score: f64,

    pub validated: bool,
}
