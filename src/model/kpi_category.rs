use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct KpiCategory {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "KPI Individu")]
    pub name: String,
    #[schema(example = "Individual targets agreed with the line manager")]
    pub description: String,
}
