use crate::{
    auth::auth::AuthUser,
    bonus::{
        addition::NoAddition,
        error::ReportError,
        report::{CalibrationReport, ReportScope, build_reports},
        store::MySqlEmployeeStore,
    },
};
use actix_web::{HttpResponse, web};
use serde::Serialize;
use sqlx::MySqlPool;
use tracing::info;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct BonusReportResponse {
    pub data: Vec<CalibrationReport>,
}

/// KPI calibration and bonus per employee.
///
/// Admins receive every employee; everyone else only their own row.
#[utoipa::path(
    get,
    path = "/api/bonus-report",
    responses(
        (status = 200, description = "Calibration table", body = BonusReportResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Employee not found"),
        (status = 503, description = "Employee data unavailable")
    ),
    tag = "Bonus",
    security(("bearer_auth" = []))
)]
pub async fn bonus_report(
    auth: Option<AuthUser>,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ReportError> {
    let auth = auth.ok_or(ReportError::Unauthorized)?;
    let scope = ReportScope::for_user(&auth);

    let store = MySqlEmployeeStore::new(pool.get_ref());
    let data = build_reports(&store, &NoAddition, scope).await?;

    info!(
        employee_id = auth.employee_id,
        email = %auth.email,
        ?scope,
        rows = data.len(),
        "Bonus report generated"
    );

    Ok(HttpResponse::Ok().json(BonusReportResponse { data }))
}
