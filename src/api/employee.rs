use crate::{
    auth::{auth::AuthUser, handlers::is_email_available, password::hash_password},
    model::{employee::Employee, role::Role},
    utils::{
        db_utils::{build_update_sql, execute_update},
        email_cache, email_filter,
    },
};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use sqlx::MySqlPool;
use tracing::{debug, error, info};
use utoipa::{IntoParams, ToSchema};

/// Columns a partial update may touch.
const UPDATABLE_COLUMNS: [&str; 5] = ["name", "email", "password", "role", "salary"];

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "Budi Santoso")]
    pub name: String,
    #[schema(example = "budi@company.com", format = "email")]
    pub email: String,
    #[schema(example = "secret123")]
    pub password: String,
    #[schema(example = "user")]
    pub role: Option<Role>,
    #[schema(example = 4000000.0)]
    pub salary: f64,
}

/// Partial update body; any subset of fields may be sent.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateEmployee {
    #[schema(example = "Budi S.")]
    pub name: Option<String>,
    #[schema(format = "email")]
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    #[schema(example = 4500000.0)]
    pub salary: Option<f64>,
}

impl UpdateEmployee {
    fn validate(&self) -> Result<(), &'static str> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err("name must not be empty");
        }
        if self
            .email
            .as_deref()
            .is_some_and(|e| email_filter::normalize(e).is_empty())
        {
            return Err("email must not be empty");
        }
        if self.password.as_deref().is_some_and(str::is_empty) {
            return Err("password must not be empty");
        }
        if self.salary.is_some_and(|s| !s.is_finite() || s < 0.0) {
            return Err("salary must be zero or positive");
        }
        Ok(())
    }

    /// Column values for `build_update_sql`; `hashed_password` replaces the plain one.
    fn columns(&self, hashed_password: Option<String>) -> Value {
        let mut fields = Map::new();
        if let Some(name) = &self.name {
            fields.insert("name".into(), json!(name.trim()));
        }
        if let Some(email) = &self.email {
            fields.insert("email".into(), json!(email_filter::normalize(email)));
        }
        if let Some(hashed) = hashed_password {
            fields.insert("password".into(), json!(hashed));
        }
        if let Some(role) = self.role {
            fields.insert("role".into(), json!(role.as_ref()));
        }
        if let Some(salary) = self.salary {
            fields.insert("salary".into(), json!(salary));
        }
        Value::Object(fields)
    }
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct EmployeeQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// `admin` or `user`
    pub role: Option<String>,
    /// Matches name or email
    pub search: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<Employee>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 42)]
    pub total: i64,
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = Object, example = json!({
            "data": {"id": 2, "name": "Budi Santoso", "email": "budi@company.com", "role": "user", "salary": 4000000.0}
        })),
        (status = 400, description = "Missing fields"),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn create_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let name = payload.name.trim();
    let email = email_filter::normalize(&payload.email);

    if name.is_empty() || email.is_empty() || payload.password.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "name, email and password are required"
        })));
    }

    if !is_email_available(&email, pool.get_ref()).await {
        return Ok(HttpResponse::Conflict().json(json!({
            "error": "Email already registered"
        })));
    }

    let hashed = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "Failed to hash password");
        ErrorInternalServerError("Internal Server Error")
    })?;
    let role = payload.role.unwrap_or(Role::User);

    let result = sqlx::query(
        r#"
        INSERT INTO employees (name, email, password, role, salary)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(name)
    .bind(&email)
    .bind(&hashed)
    .bind(role.as_ref())
    .bind(payload.salary)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(res) => {
            email_filter::insert(&email);
            email_cache::mark_taken(&email).await;
            info!(employee_id = res.last_insert_id(), "Employee created");

            Ok(HttpResponse::Created().json(json!({
                "data": Employee {
                    id: res.last_insert_id(),
                    name: name.to_string(),
                    email,
                    password: hashed,
                    role: role.to_string(),
                    salary: payload.salary,
                }
            })))
        }
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::Conflict().json(json!({
                        "error": "Email already registered"
                    })));
                }
            }

            error!(error = %e, "Failed to create employee");
            Err(ErrorInternalServerError("Internal Server Error"))
        }
    }
}

/// List employees (admin)
#[utoipa::path(
    get,
    path = "/api/employees",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Paginated employee list", body = EmployeeListResponse),
        (status = 403, description = "Admin only")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn list_employees(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<EmployeeQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    // ---------- build WHERE clause dynamically ----------
    let mut conditions = Vec::new();
    let mut bindings: Vec<String> = Vec::new();

    if let Some(role) = &query.role {
        conditions.push("role = ?");
        bindings.push(role.clone());
    }

    if let Some(search) = &query.search {
        conditions.push("(name LIKE ? OR email LIKE ?)");
        let like = format!("%{}%", search);
        bindings.push(like.clone());
        bindings.push(like);
    }

    let where_clause = if conditions.is_empty() {
        "".to_string()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    // ---------- total count ----------
    let count_sql = format!("SELECT COUNT(*) AS total FROM employees {}", where_clause);
    debug!(sql = %count_sql, bindings = ?bindings, "Counting employees");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = count_query.bind(b);
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %count_sql, "Failed to count employees");
        ErrorInternalServerError("Database error")
    })?;

    // ---------- data query ----------
    let data_sql = format!(
        "SELECT id, name, email, password, role, salary FROM employees {} ORDER BY id LIMIT ? OFFSET ?",
        where_clause
    );
    debug!(sql = %data_sql, page, per_page, offset, "Fetching employees");

    let mut data_query = sqlx::query_as::<_, Employee>(&data_sql);
    for b in &bindings {
        data_query = data_query.bind(b);
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let employees = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch employees");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        data: employees,
        page,
        per_page,
        total,
    }))
}

async fn fetch_email(pool: &MySqlPool, employee_id: u64) -> actix_web::Result<Option<String>> {
    sqlx::query_scalar::<_, String>("SELECT email FROM employees WHERE id = ?")
        .bind(employee_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to fetch employee email");
            ErrorInternalServerError("Internal Server Error")
        })
}

/// Update Employee (partial)
#[utoipa::path(
    put,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated", body = Object, example = json!({
            "message": "Employee updated successfully"
        })),
        (status = 400, description = "Unknown or invalid field"),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn update_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateEmployee>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let employee_id = path.into_inner();
    if let Err(msg) = payload.validate() {
        return Ok(HttpResponse::BadRequest().json(json!({ "error": msg })));
    }

    let hashed_password = match payload.password.as_deref() {
        Some(password) => Some(hash_password(password).map_err(|e| {
            error!(error = %e, "Failed to hash password");
            ErrorInternalServerError("Internal Server Error")
        })?),
        None => None,
    };
    let body = payload.columns(hashed_password);

    let update = build_update_sql("employees", &body, &UPDATABLE_COLUMNS, "id", employee_id)?;

    let previous_email = fetch_email(pool.get_ref(), employee_id).await?;
    let Some(previous_email) = previous_email else {
        return Ok(HttpResponse::NotFound().json(json!({
            "error": "Employee not found"
        })));
    };

    if let Err(e) = execute_update(pool.get_ref(), update).await {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.code().as_deref() == Some("23000") {
                return Ok(HttpResponse::Conflict().json(json!({
                    "error": "Email already registered"
                })));
            }
        }

        error!(error = %e, employee_id, "Failed to update employee");
        return Err(ErrorInternalServerError("Internal Server Error"));
    }

    if let Some(Value::String(email)) = body.get("email") {
        if *email != previous_email {
            email_filter::remove(&previous_email);
            email_cache::release(&previous_email).await;
            email_filter::insert(email);
            email_cache::mark_taken(email).await;
        }
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee updated successfully"
    })))
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Successfully deleted"
        })),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn delete_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let employee_id = path.into_inner();

    let Some(email) = fetch_email(pool.get_ref(), employee_id).await? else {
        return Ok(HttpResponse::NotFound().json(json!({
            "error": "Employee not found"
        })));
    };

    let result = sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(employee_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to delete employee");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "error": "Employee not found"
        })));
    }

    email_filter::remove(&email);
    email_cache::release(&email).await;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}

/// Get Employee by ID (admin, or the employee themselves)
#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 403, description = "Not allowed"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn get_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    auth.require_self_or_admin(employee_id)?;

    let employee = sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, name, email, password, role, salary
        FROM employees
        WHERE id = ?
        "#,
    )
    .bind(employee_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to fetch employee");
        ErrorInternalServerError("Internal Server Error")
    })?;

    match employee {
        Some(emp) => Ok(HttpResponse::Ok().json(json!({ "data": emp }))),
        None => Ok(HttpResponse::NotFound().json(json!({
            "error": "Employee not found"
        }))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::kpi::tests::{bearer, test_config};
    use actix_web::{App, http::StatusCode, test};
    use sqlx::mysql::MySqlPoolOptions;

    #[::core::prelude::v1::test]
    fn columns_carry_typed_values() {
        let update = UpdateEmployee {
            email: Some("  Budi@Company.com ".into()),
            password: Some("secret123".into()),
            role: Some(Role::Admin),
            salary: Some(4_500_000.0),
            ..Default::default()
        };
        assert!(update.validate().is_ok());

        let columns = update.columns(Some("$argon2id$hashed".into()));
        assert_eq!(columns["email"], "budi@company.com");
        assert_eq!(columns["password"], "$argon2id$hashed");
        assert_eq!(columns["role"], "admin");
        assert_eq!(columns["salary"], 4_500_000.0);
        assert!(columns.get("name").is_none());
    }

    #[::core::prelude::v1::test]
    fn blank_fields_are_rejected() {
        let blank_email = UpdateEmployee {
            email: Some("   ".into()),
            ..Default::default()
        };
        assert!(blank_email.validate().is_err());

        let blank_name = UpdateEmployee {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(blank_name.validate().is_err());

        let negative_salary = UpdateEmployee {
            salary: Some(-1.0),
            ..Default::default()
        };
        assert!(negative_salary.validate().is_err());
    }

    #[::core::prelude::v1::test]
    fn untyped_values_do_not_deserialize() {
        assert!(serde_json::from_value::<UpdateEmployee>(json!({"password": 1234})).is_err());
        assert!(serde_json::from_value::<UpdateEmployee>(json!({"role": "superuser"})).is_err());
        assert!(serde_json::from_value::<UpdateEmployee>(json!({"salary": "lots"})).is_err());
        assert!(serde_json::from_value::<UpdateEmployee>(json!({"hire_date": "2026-01-01"})).is_err());
    }

    #[actix_web::test]
    async fn update_rejects_invalid_bodies_before_touching_db() {
        let config = test_config();
        let pool = MySqlPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(config))
                .app_data(web::Data::new(pool))
                .route("/api/employees/{id}", web::put().to(update_employee)),
        )
        .await;

        for body in [
            json!({"password": 1234, "role": "superuser", "salary": "lots", "email": ""}),
            json!({"email": ""}),
            json!({"name": "  "}),
        ] {
            let req = test::TestRequest::put()
                .uri("/api/employees/1")
                .insert_header(("Authorization", bearer(1, Role::Admin)))
                .set_json(body)
                .to_request();
            let resp = test::call_service(&app, req).await;

            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        }
    }
}
