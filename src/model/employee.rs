use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::role::Role;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Budi Santoso",
        "email": "budi@company.com",
        "role": "user",
        "salary": 4000000.0
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Budi Santoso")]
    pub name: String,

    #[schema(example = "budi@company.com")]
    pub email: String,

    /// argon2 hash, never rendered
    #[serde(skip_serializing, default)]
    #[schema(write_only)]
    pub password: String,

    #[schema(example = "user")]
    pub role: String,

    #[schema(example = 4000000.0)]
    pub salary: f64,
}

impl Employee {
    pub fn role(&self) -> Role {
        Role::from_db(&self.role)
    }
}
