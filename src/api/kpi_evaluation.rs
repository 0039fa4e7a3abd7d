use crate::{
    api::kpi::visible_employee,
    auth::auth::AuthUser,
    bonus::achievement::{ACHIEVEMENT_LEVELS, achievement_to_point},
    model::kpi_evaluation::KpiEvaluation,
};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{error, info, warn};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct KpiEvaluationInput {
    #[schema(example = 2)]
    pub employee_id: u64,
    #[schema(example = 5)]
    pub kpi_id: u64,
    #[schema(example = "good 3")]
    pub achievement: String,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct KpiEvaluationQuery {
    pub employee_id: Option<u64>,
}

/// Achievement levels for the evaluation form
#[utoipa::path(
    get,
    path = "/api/kpi_evaluations/achievements",
    responses(
        (status = 200, description = "Achievement levels", body = Object, example = json!({
            "data": ["poor 1", "fair 2", "good 3", "outstanding 4", "exceptional 5"]
        }))
    ),
    tag = "KPI Evaluation",
    security(("bearer_auth" = []))
)]
pub async fn achievement_levels(_auth: AuthUser) -> impl Responder {
    HttpResponse::Ok().json(json!({ "data": ACHIEVEMENT_LEVELS }))
}

#[utoipa::path(
    get,
    path = "/api/kpi_evaluations",
    params(KpiEvaluationQuery),
    responses(
        (status = 200, description = "KPI evaluations", body = Object, example = json!({"data": []}))
    ),
    tag = "KPI Evaluation",
    security(("bearer_auth" = []))
)]
pub async fn list_kpi_evaluations(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<KpiEvaluationQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = visible_employee(&auth, query.employee_id);
    let sql = match employee_id {
        Some(_) => {
            "SELECT id, employee_id, kpi_id, achievement, point FROM kpi_evaluations \
             WHERE employee_id = ? ORDER BY id"
        }
        None => "SELECT id, employee_id, kpi_id, achievement, point FROM kpi_evaluations ORDER BY id",
    };

    let mut eval_query = sqlx::query_as::<_, KpiEvaluation>(sql);
    if let Some(employee_id) = employee_id {
        eval_query = eval_query.bind(employee_id);
    }

    let evaluations = eval_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to list KPI evaluations");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({ "data": evaluations })))
}

/// Record an evaluation; the achievement literal is stored alongside its point value
#[utoipa::path(
    post,
    path = "/api/kpi_evaluations",
    request_body = KpiEvaluationInput,
    responses(
        (status = 201, description = "Evaluation stored", body = KpiEvaluation),
        (status = 400, description = "Achievement missing"),
        (status = 403, description = "Another employee's evaluation")
    ),
    tag = "KPI Evaluation",
    security(("bearer_auth" = []))
)]
pub async fn create_kpi_evaluation(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<KpiEvaluationInput>,
) -> actix_web::Result<impl Responder> {
    auth.require_self_or_admin(payload.employee_id)?;

    if payload.achievement.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "achievement is required"
        })));
    }

    let point = achievement_to_point(&payload.achievement);
    if point == 0.0 {
        warn!(achievement = %payload.achievement, "Unrecognised achievement, scoring 0");
    }

    let result = sqlx::query(
        r#"
        INSERT INTO kpi_evaluations (employee_id, kpi_id, achievement, point)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(payload.employee_id)
    .bind(payload.kpi_id)
    .bind(&payload.achievement)
    .bind(point)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id = payload.employee_id, kpi_id = payload.kpi_id, "Failed to store KPI evaluation");
        ErrorInternalServerError("Internal Server Error")
    })?;

    info!(
        employee_id = payload.employee_id,
        kpi_id = payload.kpi_id,
        point,
        "KPI evaluation stored"
    );

    Ok(HttpResponse::Created().json(json!({
        "data": KpiEvaluation {
            id: result.last_insert_id(),
            employee_id: payload.employee_id,
            kpi_id: payload.kpi_id,
            achievement: payload.achievement.clone(),
            point,
        }
    })))
}
