use crate::{
    api::kpi::visible_employee,
    auth::auth::AuthUser,
    model::kondite::{Kondite, KonditeWithEmployee},
};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{error, info};
use utoipa::ToSchema;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Deserialize, ToSchema)]
pub struct CreateKondite {
    #[schema(example = 2)]
    pub employee_id: u64,
    #[schema(example = "SP1")]
    pub category: String,
    #[schema(example = "2026-01-01")]
    pub start_date: String,
    #[schema(example = "2026-06-30")]
    pub end_date: String,
    #[serde(default)]
    #[schema(example = "Repeated lateness")]
    pub description: String,
    #[serde(default)]
    #[schema(example = 0.5)]
    pub min_point: f64,
}

/// Partial update: absent or empty fields keep the stored value.
#[derive(Deserialize, Default, ToSchema)]
pub struct UpdateKondite {
    pub employee_id: Option<u64>,
    pub category: Option<String>,
    #[schema(example = "2026-02-01")]
    pub start_date: Option<String>,
    #[schema(example = "2026-07-31")]
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub min_point: Option<f64>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl UpdateKondite {
    /// Unparsable dates are ignored rather than rejected.
    pub fn apply(&self, kondite: &mut Kondite) {
        if let Some(employee_id) = self.employee_id.filter(|id| *id != 0) {
            kondite.employee_id = employee_id;
        }
        if let Some(category) = non_empty(&self.category) {
            kondite.category = category.to_string();
        }
        if let Some(date) =
            non_empty(&self.start_date).and_then(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok())
        {
            kondite.start_date = date;
        }
        if let Some(date) =
            non_empty(&self.end_date).and_then(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok())
        {
            kondite.end_date = date;
        }
        if let Some(description) = non_empty(&self.description) {
            kondite.description = description.to_string();
        }
        if let Some(min_point) = self.min_point {
            kondite.min_point = min_point;
        }
    }
}

fn check_min_point(min_point: f64) -> Result<(), &'static str> {
    if min_point.is_finite() && min_point >= 0.0 {
        Ok(())
    } else {
        Err("min_point must be zero or positive")
    }
}

fn db_error(e: sqlx::Error, context: &'static str) -> actix_web::Error {
    error!(error = %e, "{}", context);
    ErrorInternalServerError("Internal Server Error")
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "error": "Kondite not found" }))
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({ "error": message }))
}

async fn fetch_kondite(pool: &MySqlPool, kondite_id: u64) -> actix_web::Result<Option<Kondite>> {
    sqlx::query_as::<_, Kondite>(
        r#"
        SELECT id, employee_id, category, start_date, end_date, description, min_point
        FROM kondites
        WHERE id = ?
        "#,
    )
    .bind(kondite_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| db_error(e, "Failed to fetch kondite"))
}

#[utoipa::path(
    get,
    path = "/api/kondites",
    responses(
        (status = 200, description = "Kondites with employee names", body = Object, example = json!({"data": []}))
    ),
    tag = "Kondite",
    security(("bearer_auth" = []))
)]
pub async fn list_kondites(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let employee_id = visible_employee(&auth, None);
    let sql = format!(
        r#"
        SELECT k.id, k.employee_id, k.category, k.start_date, k.end_date,
               k.description, k.min_point, e.name AS employee_name
        FROM kondites k
        JOIN employees e ON e.id = k.employee_id
        {}
        ORDER BY k.id
        "#,
        if employee_id.is_some() { "WHERE k.employee_id = ?" } else { "" }
    );

    let mut kondite_query = sqlx::query_as::<_, KonditeWithEmployee>(&sql);
    if let Some(employee_id) = employee_id {
        kondite_query = kondite_query.bind(employee_id);
    }

    let kondites = kondite_query
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| db_error(e, "Failed to list kondites"))?;

    Ok(HttpResponse::Ok().json(json!({ "data": kondites })))
}

#[utoipa::path(
    post,
    path = "/api/kondites",
    request_body = CreateKondite,
    responses(
        (status = 201, description = "Kondite created", body = Kondite),
        (status = 400, description = "Missing field or bad date"),
        (status = 403, description = "Admin only")
    ),
    tag = "Kondite",
    security(("bearer_auth" = []))
)]
pub async fn create_kondite(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateKondite>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    if payload.category.is_empty() {
        return Ok(bad_request("category is required"));
    }
    if let Err(msg) = check_min_point(payload.min_point) {
        return Ok(bad_request(msg));
    }

    let Ok(start_date) = NaiveDate::parse_from_str(&payload.start_date, DATE_FORMAT) else {
        return Ok(bad_request("Invalid start_date format (YYYY-MM-DD)"));
    };
    let Ok(end_date) = NaiveDate::parse_from_str(&payload.end_date, DATE_FORMAT) else {
        return Ok(bad_request("Invalid end_date format (YYYY-MM-DD)"));
    };

    let result = sqlx::query(
        r#"
        INSERT INTO kondites (employee_id, category, start_date, end_date, description, min_point)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.employee_id)
    .bind(&payload.category)
    .bind(start_date)
    .bind(end_date)
    .bind(&payload.description)
    .bind(payload.min_point)
    .execute(pool.get_ref())
    .await
    .map_err(|e| db_error(e, "Failed to create kondite"))?;

    info!(employee_id = payload.employee_id, category = %payload.category, "Kondite created");

    Ok(HttpResponse::Created().json(json!({
        "data": Kondite {
            id: result.last_insert_id(),
            employee_id: payload.employee_id,
            category: payload.category.clone(),
            start_date,
            end_date,
            description: payload.description.clone(),
            min_point: payload.min_point,
        }
    })))
}

#[utoipa::path(
    put,
    path = "/api/kondites/{kondite_id}",
    params(("kondite_id", Path, description = "Kondite ID")),
    request_body = UpdateKondite,
    responses(
        (status = 200, description = "Kondite updated", body = Kondite),
        (status = 400, description = "Negative min_point"),
        (status = 404, description = "Kondite not found")
    ),
    tag = "Kondite",
    security(("bearer_auth" = []))
)]
pub async fn update_kondite(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateKondite>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    let kondite_id = path.into_inner();

    if let Some(Err(msg)) = payload.min_point.map(check_min_point) {
        return Ok(bad_request(msg));
    }

    let Some(mut kondite) = fetch_kondite(pool.get_ref(), kondite_id).await? else {
        return Ok(not_found());
    };

    payload.apply(&mut kondite);

    sqlx::query(
        r#"
        UPDATE kondites
        SET employee_id = ?, category = ?, start_date = ?, end_date = ?,
            description = ?, min_point = ?
        WHERE id = ?
        "#,
    )
    .bind(kondite.employee_id)
    .bind(&kondite.category)
    .bind(kondite.start_date)
    .bind(kondite.end_date)
    .bind(&kondite.description)
    .bind(kondite.min_point)
    .bind(kondite_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| db_error(e, "Failed to update kondite"))?;

    Ok(HttpResponse::Ok().json(json!({ "data": kondite })))
}

#[utoipa::path(
    delete,
    path = "/api/kondites/{kondite_id}",
    params(("kondite_id", Path, description = "Kondite ID")),
    responses(
        (status = 200, description = "Kondite deleted", body = Object, example = json!({"data": "Kondite deleted"})),
        (status = 404, description = "Kondite not found")
    ),
    tag = "Kondite",
    security(("bearer_auth" = []))
)]
pub async fn delete_kondite(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let result = sqlx::query("DELETE FROM kondites WHERE id = ?")
        .bind(path.into_inner())
        .execute(pool.get_ref())
        .await
        .map_err(|e| db_error(e, "Failed to delete kondite"))?;

    if result.rows_affected() == 0 {
        return Ok(not_found());
    }

    Ok(HttpResponse::Ok().json(json!({ "data": "Kondite deleted" })))
}
