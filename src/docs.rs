use crate::api::bonus_report::BonusReportResponse;
use crate::api::employee::{CreateEmployee, EmployeeListResponse, EmployeeQuery, UpdateEmployee};
use crate::api::kondite::{CreateKondite, UpdateKondite};
use crate::api::kpi::KpiInput;
use crate::api::kpi_category::KpiCategoryInput;
use crate::api::kpi_evaluation::KpiEvaluationInput;
use crate::auth::handlers::LoginResponse;
use crate::bonus::calculator::Tier;
use crate::bonus::report::CalibrationReport;
use crate::model::{
    employee::Employee,
    kondite::{Kondite, KonditeWithEmployee},
    kpi::Kpi,
    kpi_category::KpiCategory,
    kpi_evaluation::KpiEvaluation,
    role::Role,
};
use crate::models::LoginReqDto;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "KPI Bonus API",
        version = "1.0.0",
        description = r#"
## KPI & Bonus Calibration

Internal API for recording employee KPIs and disciplinary records (kondite) and
turning them into a calibrated bonus.

### Calibration
1. KPI contributions (`score * weight / 100`) are summed per category:
   `Perusahaan`, `Dept`/`Departemen`, `Individu`. Other categories are ignored.
2. Kondite points are subtracted, reward points added; the result never drops below 0.
3. The final score selects a tier (Poor x1, Fair x2, Good x3, Outstanding x4, Exceptional x5).
4. `bonus = salary * multiplier`.

### Security
All endpoints except `/api/login` need a **JWT Bearer** token.
Only admins can manage employees, categories and kondites, and see everyone's bonus.
"#,
    ),
    paths(
        crate::auth::handlers::login,

        crate::api::bonus_report::bonus_report,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::kpi::list_kpis,
        crate::api::kpi::get_kpi,
        crate::api::kpi::create_kpi,
        crate::api::kpi::update_kpi,
        crate::api::kpi::delete_kpi,

        crate::api::kpi_category::list_kpi_categories,
        crate::api::kpi_category::create_kpi_category,
        crate::api::kpi_category::update_kpi_category,
        crate::api::kpi_category::delete_kpi_category,

        crate::api::kpi_evaluation::achievement_levels,
        crate::api::kpi_evaluation::list_kpi_evaluations,
        crate::api::kpi_evaluation::create_kpi_evaluation,

        crate::api::kondite::list_kondites,
        crate::api::kondite::create_kondite,
        crate::api::kondite::update_kondite,
        crate::api::kondite::delete_kondite
    ),
    components(
        schemas(
            LoginReqDto,
            LoginResponse,
            Role,
            Employee,
            CreateEmployee,
            UpdateEmployee,
            EmployeeQuery,
            EmployeeListResponse,
            Kpi,
            KpiInput,
            KpiCategory,
            KpiCategoryInput,
            KpiEvaluation,
            KpiEvaluationInput,
            Kondite,
            KonditeWithEmployee,
            CreateKondite,
            UpdateKondite,
            Tier,
            CalibrationReport,
            BonusReportResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login"),
        (name = "Bonus", description = "KPI calibration and bonus report"),
        (name = "Employee", description = "Employee management"),
        (name = "KPI", description = "KPI records"),
        (name = "KPI Category", description = "KPI category reference list"),
        (name = "KPI Evaluation", description = "Achievement-based KPI evaluations"),
        (name = "Kondite", description = "Disciplinary records"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_documents_bonus_report_and_bearer_auth() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/api/bonus-report"));
        assert!(doc.paths.paths.contains_key("/api/kondites/{kondite_id}"));
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(components.schemas.contains_key("CalibrationReport"));
    }
}
