use crate::{auth::auth::AuthUser, model::kpi_category::KpiCategory};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct KpiCategoryInput {
    #[schema(example = "KPI Departemen")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "Targets shared by the whole department")]
    pub description: String,
}

fn db_error(e: sqlx::Error, context: &'static str) -> actix_web::Error {
    error!(error = %e, "{}", context);
    ErrorInternalServerError("Internal Server Error")
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "error": "KPI category not found" }))
}

fn name_required() -> HttpResponse {
    HttpResponse::BadRequest().json(json!({ "error": "name is required" }))
}

#[utoipa::path(
    get,
    path = "/api/kpi-categories",
    responses(
        (status = 200, description = "All KPI categories", body = Object, example = json!({"data": []}))
    ),
    tag = "KPI Category",
    security(("bearer_auth" = []))
)]
pub async fn list_kpi_categories(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let categories = sqlx::query_as::<_, KpiCategory>(
        "SELECT id, name, description FROM kpi_categories ORDER BY id",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| db_error(e, "Failed to list KPI categories"))?;

    Ok(HttpResponse::Ok().json(json!({ "data": categories })))
}

#[utoipa::path(
    post,
    path = "/api/kpi-categories",
    request_body = KpiCategoryInput,
    responses(
        (status = 201, description = "KPI category created", body = KpiCategory),
        (status = 400, description = "Name missing"),
        (status = 403, description = "Admin only")
    ),
    tag = "KPI Category",
    security(("bearer_auth" = []))
)]
pub async fn create_kpi_category(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<KpiCategoryInput>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    if payload.name.trim().is_empty() {
        return Ok(name_required());
    }

    let result = sqlx::query("INSERT INTO kpi_categories (name, description) VALUES (?, ?)")
        .bind(payload.name.trim())
        .bind(&payload.description)
        .execute(pool.get_ref())
        .await
        .map_err(|e| db_error(e, "Failed to create KPI category"))?;

    Ok(HttpResponse::Created().json(json!({
        "data": KpiCategory {
            id: result.last_insert_id(),
            name: payload.name.trim().to_string(),
            description: payload.description.clone(),
        }
    })))
}

#[utoipa::path(
    put,
    path = "/api/kpi-categories/{category_id}",
    params(("category_id", Path, description = "KPI category ID")),
    request_body = KpiCategoryInput,
    responses(
        (status = 200, description = "KPI category updated", body = KpiCategory),
        (status = 400, description = "Name missing"),
        (status = 404, description = "KPI category not found")
    ),
    tag = "KPI Category",
    security(("bearer_auth" = []))
)]
pub async fn update_kpi_category(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<KpiCategoryInput>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    let category_id = path.into_inner();

    if payload.name.trim().is_empty() {
        return Ok(name_required());
    }

    let exists = sqlx::query_scalar::<_, u64>("SELECT id FROM kpi_categories WHERE id = ?")
        .bind(category_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| db_error(e, "Failed to fetch KPI category"))?;

    if exists.is_none() {
        return Ok(not_found());
    }

    sqlx::query("UPDATE kpi_categories SET name = ?, description = ? WHERE id = ?")
        .bind(payload.name.trim())
        .bind(&payload.description)
        .bind(category_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| db_error(e, "Failed to update KPI category"))?;

    Ok(HttpResponse::Ok().json(json!({
        "data": KpiCategory {
            id: category_id,
            name: payload.name.trim().to_string(),
            description: payload.description.clone(),
        }
    })))
}

#[utoipa::path(
    delete,
    path = "/api/kpi-categories/{category_id}",
    params(("category_id", Path, description = "KPI category ID")),
    responses(
        (status = 200, description = "KPI category deleted", body = Object, example = json!({"data": true})),
        (status = 404, description = "KPI category not found")
    ),
    tag = "KPI Category",
    security(("bearer_auth" = []))
)]
pub async fn delete_kpi_category(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let result = sqlx::query("DELETE FROM kpi_categories WHERE id = ?")
        .bind(path.into_inner())
        .execute(pool.get_ref())
        .await
        .map_err(|e| db_error(e, "Failed to delete KPI category"))?;

    if result.rows_affected() == 0 {
        return Ok(not_found());
    }

    Ok(HttpResponse::Ok().json(json!({ "data": true })))
}
