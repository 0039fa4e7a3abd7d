use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::role::Role;

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "admin@admin.com", format = "email")]
    pub email: String,
    #[schema(example = "admin1234")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub employee_id: u64,
    /// employee email
    pub sub: String,
    pub role: Role,
    pub exp: usize,
    pub jti: String,
}
