use crate::{auth::auth::AuthUser, model::kpi::Kpi};
use actix_web::{
    HttpResponse, Responder,
    error::{ErrorForbidden, ErrorInternalServerError},
    web,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{error, info};
use utoipa::{IntoParams, ToSchema};

const KPI_COLUMNS: &str = "id, employee_id, title, category, weight, target, \
     poor, fair, good, outstanding, exceptional, score, validated";

/// Payload for create and full update.
#[derive(Deserialize, ToSchema)]
pub struct KpiInput {
    #[schema(example = 2)]
    pub employee_id: u64,
    #[schema(example = "Revenue growth")]
    pub title: String,
    #[schema(example = "Perusahaan")]
    pub category: String,
    #[schema(example = 40.0)]
    pub weight: f64,
    #[serde(default)]
    #[schema(example = "10% YoY")]
    pub target: String,
    #[serde(default)]
    pub poor: String,
    #[serde(default)]
    pub fair: String,
    #[serde(default)]
    pub good: String,
    #[serde(default)]
    pub outstanding: String,
    #[serde(default)]
    pub exceptional: String,
    #[serde(default)]
    #[schema(example = 4.0)]
    pub score: f64,
    #[serde(default)]
    pub validated: bool,
}

impl KpiInput {
    fn validate(&self) -> Result<(), &'static str> {
        if !(0.0..=100.0).contains(&self.weight) {
            return Err("weight must be between 0 and 100");
        }
        if !self.score.is_finite() {
            return Err("score must be a number");
        }
        Ok(())
    }

    /// Employees may only write their own KPIs; score and validation are admin-owned.
    fn authorize(&self, auth: &AuthUser, stored: Option<&Kpi>) -> actix_web::Result<()> {
        auth.require_self_or_admin(self.employee_id)?;
        if let Some(kpi) = stored {
            auth.require_self_or_admin(kpi.employee_id)?;
        }
        if auth.role.is_admin() {
            return Ok(());
        }

        let (score, validated) = stored.map_or((0.0, false), |kpi| (kpi.score, kpi.validated));
        if self.score != score || self.validated != validated {
            return Err(ErrorForbidden("Only admins may score or validate a KPI"));
        }
        Ok(())
    }
}

/// Employee filter a caller may use; non-admins only see their own rows.
pub(crate) fn visible_employee(auth: &AuthUser, requested: Option<u64>) -> Option<u64> {
    if auth.role.is_admin() {
        requested
    } else {
        Some(auth.employee_id)
    }
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct KpiQuery {
    /// Only KPIs owned by this employee
    pub employee_id: Option<u64>,
}

async fn fetch_kpi(pool: &MySqlPool, kpi_id: u64) -> actix_web::Result<Option<Kpi>> {
    sqlx::query_as::<_, Kpi>(&format!("SELECT {} FROM kpis WHERE id = ?", KPI_COLUMNS))
        .bind(kpi_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            error!(error = %e, kpi_id, "Failed to fetch KPI");
            ErrorInternalServerError("Internal Server Error")
        })
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "error": "KPI not found" }))
}

#[utoipa::path(
    get,
    path = "/api/kpis",
    params(KpiQuery),
    responses(
        (status = 200, description = "KPI list", body = Object, example = json!({"data": []}))
    ),
    tag = "KPI",
    security(("bearer_auth" = []))
)]
pub async fn list_kpis(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<KpiQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = visible_employee(&auth, query.employee_id);
    let sql = match employee_id {
        Some(_) => format!("SELECT {} FROM kpis WHERE employee_id = ? ORDER BY id", KPI_COLUMNS),
        None => format!("SELECT {} FROM kpis ORDER BY id", KPI_COLUMNS),
    };

    let mut kpi_query = sqlx::query_as::<_, Kpi>(&sql);
    if let Some(employee_id) = employee_id {
        kpi_query = kpi_query.bind(employee_id);
    }

    let kpis = kpi_query
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to list KPIs");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(json!({ "data": kpis })))
}

#[utoipa::path(
    get,
    path = "/api/kpis/{kpi_id}",
    params(("kpi_id", Path, description = "KPI ID")),
    responses(
        (status = 200, description = "KPI found", body = Kpi),
        (status = 403, description = "Another employee's KPI"),
        (status = 404, description = "KPI not found")
    ),
    tag = "KPI",
    security(("bearer_auth" = []))
)]
pub async fn get_kpi(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    match fetch_kpi(pool.get_ref(), path.into_inner()).await? {
        Some(kpi) => {
            auth.require_self_or_admin(kpi.employee_id)?;
            Ok(HttpResponse::Ok().json(json!({ "data": kpi })))
        }
        None => Ok(not_found()),
    }
}

#[utoipa::path(
    post,
    path = "/api/kpis",
    request_body = KpiInput,
    responses(
        (status = 201, description = "KPI created", body = Kpi),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Not allowed to write this KPI")
    ),
    tag = "KPI",
    security(("bearer_auth" = []))
)]
pub async fn create_kpi(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<KpiInput>,
) -> actix_web::Result<impl Responder> {
    payload.authorize(&auth, None)?;

    if let Err(msg) = payload.validate() {
        return Ok(HttpResponse::BadRequest().json(json!({ "error": msg })));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO kpis
            (employee_id, title, category, weight, target,
             poor, fair, good, outstanding, exceptional, score, validated)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.employee_id)
    .bind(&payload.title)
    .bind(&payload.category)
    .bind(payload.weight)
    .bind(&payload.target)
    .bind(&payload.poor)
    .bind(&payload.fair)
    .bind(&payload.good)
    .bind(&payload.outstanding)
    .bind(&payload.exceptional)
    .bind(payload.score)
    .bind(payload.validated)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id = payload.employee_id, "Failed to create KPI");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let kpi_id = result.last_insert_id();
    info!(kpi_id, employee_id = payload.employee_id, "KPI created");

    match fetch_kpi(pool.get_ref(), kpi_id).await? {
        Some(kpi) => Ok(HttpResponse::Created().json(json!({ "data": kpi }))),
        None => Ok(not_found()),
    }
}

#[utoipa::path(
    put,
    path = "/api/kpis/{kpi_id}",
    params(("kpi_id", Path, description = "KPI ID")),
    request_body = KpiInput,
    responses(
        (status = 200, description = "KPI updated", body = Kpi),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Not allowed to write this KPI"),
        (status = 404, description = "KPI not found")
    ),
    tag = "KPI",
    security(("bearer_auth" = []))
)]
pub async fn update_kpi(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<KpiInput>,
) -> actix_web::Result<impl Responder> {
    let kpi_id = path.into_inner();
    auth.require_self_or_admin(payload.employee_id)?;

    if let Err(msg) = payload.validate() {
        return Ok(HttpResponse::BadRequest().json(json!({ "error": msg })));
    }

    let Some(stored) = fetch_kpi(pool.get_ref(), kpi_id).await? else {
        return Ok(not_found());
    };
    payload.authorize(&auth, Some(&stored))?;

    // every editable field is replaced
    sqlx::query(
        r#"
        UPDATE kpis
        SET employee_id = ?, title = ?, category = ?, weight = ?, target = ?,
            poor = ?, fair = ?, good = ?, outstanding = ?, exceptional = ?,
            score = ?, validated = ?
        WHERE id = ?
        "#,
    )
    .bind(payload.employee_id)
    .bind(&payload.title)
    .bind(&payload.category)
    .bind(payload.weight)
    .bind(&payload.target)
    .bind(&payload.poor)
    .bind(&payload.fair)
    .bind(&payload.good)
    .bind(&payload.outstanding)
    .bind(&payload.exceptional)
    .bind(payload.score)
    .bind(payload.validated)
    .bind(kpi_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, kpi_id, "Failed to update KPI");
        ErrorInternalServerError("Internal Server Error")
    })?;

    match fetch_kpi(pool.get_ref(), kpi_id).await? {
        Some(kpi) => Ok(HttpResponse::Ok().json(json!({ "data": kpi }))),
        None => Ok(not_found()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/kpis/{kpi_id}",
    params(("kpi_id", Path, description = "KPI ID")),
    responses(
        (status = 200, description = "KPI deleted", body = Object, example = json!({"data": true})),
        (status = 403, description = "Another employee's KPI"),
        (status = 404, description = "KPI not found")
    ),
    tag = "KPI",
    security(("bearer_auth" = []))
)]
pub async fn delete_kpi(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let kpi_id = path.into_inner();

    let Some(stored) = fetch_kpi(pool.get_ref(), kpi_id).await? else {
        return Ok(not_found());
    };
    auth.require_self_or_admin(stored.employee_id)?;

    let result = sqlx::query("DELETE FROM kpis WHERE id = ?")
        .bind(kpi_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, kpi_id, "Failed to delete KPI");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(not_found());
    }

    Ok(HttpResponse::Ok().json(json!({ "data": true })))
}
