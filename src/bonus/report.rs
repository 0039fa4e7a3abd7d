use serde::Serialize;
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::{
    auth::auth::AuthUser,
    bonus::{
        addition::AdditionSource,
        calculator::{Calibration, SCORE_PRECISION, Tier, calibrate, round_to},
        error::ReportError,
        store::EmployeeStore,
    },
    model::employee::Employee,
};

/// One row of the calibration table.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CalibrationReport {
    #[schema(example = 1)]
    pub no: usize,
    #[schema(example = "Budi Santoso")]
    pub name: String,
    #[schema(example = 2.0)]
    pub kpi_perusahaan: f64,
    #[schema(example = 1.5)]
    pub kpi_depart: f64,
    #[schema(example = 1.0)]
    pub kpi_individu: f64,
    #[schema(example = 4.5)]
    pub total_kpi: f64,
    #[schema(example = 0.0)]
    pub pengurang_poin: f64,
    #[schema(example = 0.0)]
    pub penambah_poin: f64,
    #[schema(example = 4.5)]
    pub kpi_setelah_kalibrasi: f64,
    #[serde(rename = "skala")]
    #[schema(example = "Outstanding")]
    pub tier: Tier,
    #[serde(rename = "gaji")]
    #[schema(example = 4000000.0)]
    pub salary: f64,
    #[schema(example = 16000000.0)]
    pub bonus: f64,
}

impl CalibrationReport {
    pub fn new(no: usize, name: String, calibration: &Calibration) -> Self {
        let round = |v: f64| round_to(v, SCORE_PRECISION);
        Self {
            no,
            name,
            kpi_perusahaan: round(calibration.totals.perusahaan),
            kpi_depart: round(calibration.totals.dept),
            kpi_individu: round(calibration.totals.individu),
            total_kpi: round(calibration.total_kpi),
            pengurang_poin: round(calibration.deduction),
            penambah_poin: round(calibration.addition),
            kpi_setelah_kalibrasi: round(calibration.final_score),
            tier: calibration.tier,
            salary: calibration.salary,
            bonus: calibration.bonus,
        }
    }
}

/// Which employees a caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportScope {
    All,
    Employee(u64),
}

impl ReportScope {
    pub fn for_user(auth: &AuthUser) -> Self {
        if auth.role.is_admin() {
            ReportScope::All
        } else {
            ReportScope::Employee(auth.employee_id)
        }
    }
}

fn store_failure(employee_id: Option<u64>, e: sqlx::Error) -> ReportError {
    error!(error = %e, employee_id, "Employee store failed during bonus report");
    ReportError::StoreUnavailable
}

/// Calibrate a single employee. Any store failure aborts.
pub async fn compute_report<S, A>(
    store: &S,
    additions: &A,
    employee: &Employee,
    no: usize,
) -> Result<CalibrationReport, ReportError>
where
    S: EmployeeStore,
    A: AdditionSource,
{
    let kpis = store
        .find_kpis(employee.id)
        .await
        .map_err(|e| store_failure(Some(employee.id), e))?;

    let kondites = store
        .find_kondites(employee.id)
        .await
        .map_err(|e| store_failure(Some(employee.id), e))?;

    let addition = additions
        .addition_points(employee)
        .await
        .map_err(|e| store_failure(Some(employee.id), e))?;

    let calibration = calibrate(&kpis, &kondites, addition, employee.salary);
    debug!(
        employee_id = employee.id,
        kpis = kpis.len(),
        kondites = kondites.len(),
        final_score = calibration.final_score,
        tier = %calibration.tier,
        "Employee calibrated"
    );

    Ok(CalibrationReport::new(no, employee.name.clone(), &calibration))
}

/// Build the calibration table for `scope`, numbered from 1 in store order.
///
/// A failure for any employee fails the whole batch rather than dropping the row.
pub async fn build_reports<S, A>(
    store: &S,
    additions: &A,
    scope: ReportScope,
) -> Result<Vec<CalibrationReport>, ReportError>
where
    S: EmployeeStore,
    A: AdditionSource,
{
    let employees = match scope {
        ReportScope::All => store
            .list_employees()
            .await
            .map_err(|e| store_failure(None, e))?,
        ReportScope::Employee(id) => match store
            .find_employee(id)
            .await
            .map_err(|e| store_failure(Some(id), e))?
        {
            Some(employee) => vec![employee],
            None => return Err(ReportError::NotFound),
        },
    };

    let mut reports = Vec::with_capacity(employees.len());
    for (idx, employee) in employees.iter().enumerate() {
        reports.push(compute_report(store, additions, employee, idx + 1).await?);
    }

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bonus::{
        addition::NoAddition,
        calculator::tests::{kondite, kpi},
    };
    use crate::model::{kondite::Kondite, kpi::Kpi, role::Role};
    use std::collections::HashSet;

    #[derive(Default)]
    struct InMemoryStore {
        employees: Vec<Employee>,
        kpis: Vec<Kpi>,
        kondites: Vec<Kondite>,
        failing_kpis: HashSet<u64>,
        failing_kondites: HashSet<u64>,
        list_fails: bool,
    }

    impl EmployeeStore for InMemoryStore {
        async fn find_employee(&self, id: u64) -> Result<Option<Employee>, sqlx::Error> {
            Ok(self.employees.iter().find(|e| e.id == id).cloned())
        }

        async fn list_employees(&self) -> Result<Vec<Employee>, sqlx::Error> {
            if self.list_fails {
                return Err(sqlx::Error::PoolTimedOut);
            }
            Ok(self.employees.clone())
        }

        async fn find_kpis(&self, employee_id: u64) -> Result<Vec<Kpi>, sqlx::Error> {
            if self.failing_kpis.contains(&employee_id) {
                return Err(sqlx::Error::PoolTimedOut);
            }
            Ok(self
                .kpis
                .iter()
                .filter(|k| k.employee_id == employee_id)
                .cloned()
                .collect())
        }

        async fn find_kondites(&self, employee_id: u64) -> Result<Vec<Kondite>, sqlx::Error> {
            if self.failing_kondites.contains(&employee_id) {
                return Err(sqlx::Error::PoolTimedOut);
            }
            Ok(self
                .kondites
                .iter()
                .filter(|k| k.employee_id == employee_id)
                .cloned()
                .collect())
        }
    }

    struct FixedAddition(f64);

    impl AdditionSource for FixedAddition {
        async fn addition_points(&self, _employee: &Employee) -> Result<f64, sqlx::Error> {
            Ok(self.0)
        }
    }

    fn employee(id: u64, name: &str, role: &str, salary: f64) -> Employee {
        Employee {
            id,
            name: name.to_string(),
            email: format!("{}@company.com", name.to_lowercase()),
            password: String::new(),
            role: role.to_string(),
            salary,
        }
    }

    fn auth(employee_id: u64, role: Role) -> AuthUser {
        AuthUser {
            employee_id,
            email: format!("{employee_id}@company.com"),
            role,
        }
    }

    fn sample_store() -> InMemoryStore {
        InMemoryStore {
            employees: vec![
                employee(1, "Admin", "admin", 4_000_000.0),
                employee(2, "Budi", "user", 4_000_000.0),
                employee(3, "Sari", "user", 6_000_000.0),
            ],
            kpis: vec![
                kpi(2, "Perusahaan", 2.0, 100.0),
                kpi(2, "Dept", 1.5, 100.0),
                kpi(2, "Individu", 1.0, 100.0),
                kpi(3, "Departemen", 4.0, 50.0),
                kpi(3, "Individu", 4.44, 25.0),
                kpi(3, "Lainnya", 5.0, 100.0),
            ],
            kondites: vec![kondite(3, 0.25)],
            ..Default::default()
        }
    }

    #[test]
    fn scope_follows_role() {
        assert_eq!(ReportScope::for_user(&auth(1, Role::Admin)), ReportScope::All);
        assert_eq!(
            ReportScope::for_user(&auth(2, Role::User)),
            ReportScope::Employee(2)
        );
    }

    #[actix_web::test]
    async fn admin_sees_every_employee_in_order() {
        let store = sample_store();
        let reports = build_reports(&store, &NoAddition, ReportScope::All)
            .await
            .unwrap();

        assert_eq!(reports.len(), 3);
        assert_eq!(
            reports.iter().map(|r| r.no).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(reports[0].name, "Admin");
        assert_eq!(reports[0].total_kpi, 0.0);
        assert_eq!(reports[0].tier, Tier::Poor);
        assert_eq!(reports[0].bonus, 4_000_000.0);
    }

    #[actix_web::test]
    async fn outstanding_scenario_pays_four_salaries() {
        let store = sample_store();
        let reports = build_reports(&store, &NoAddition, ReportScope::Employee(2))
            .await
            .unwrap();

        assert_eq!(reports.len(), 1);
        let row = &reports[0];
        assert_eq!(row.no, 1);
        assert_eq!(row.kpi_perusahaan, 2.0);
        assert_eq!(row.kpi_depart, 1.5);
        assert_eq!(row.kpi_individu, 1.0);
        assert_eq!(row.total_kpi, 4.5);
        assert_eq!(row.pengurang_poin, 0.0);
        assert_eq!(row.penambah_poin, 0.0);
        assert_eq!(row.kpi_setelah_kalibrasi, 4.5);
        assert_eq!(row.tier, Tier::Outstanding);
        assert_eq!(row.salary, 4_000_000.0);
        assert_eq!(row.bonus, 16_000_000.0);
    }

    #[actix_web::test]
    async fn deduction_beyond_total_clamps_to_poor() {
        let mut store = sample_store();
        store.kondites.push(kondite(2, 5.0));

        let reports = build_reports(&store, &NoAddition, ReportScope::Employee(2))
            .await
            .unwrap();
        let row = &reports[0];
        assert_eq!(row.pengurang_poin, 5.0);
        assert_eq!(row.kpi_setelah_kalibrasi, 0.0);
        assert_eq!(row.tier, Tier::Poor);
        assert_eq!(row.bonus, 4_000_000.0);
    }

    #[actix_web::test]
    async fn scores_are_rounded_but_money_is_not() {
        let store = sample_store();
        let reports = build_reports(&store, &NoAddition, ReportScope::Employee(3))
            .await
            .unwrap();
        let row = &reports[0];

        // 4.0 * 0.5 = 2.0, 4.44 * 0.25 = 1.11, "Lainnya" ignored
        assert_eq!(row.kpi_perusahaan, 0.0);
        assert_eq!(row.kpi_depart, 2.0);
        assert_eq!(row.kpi_individu, 1.1);
        assert_eq!(row.total_kpi, 3.1);
        assert_eq!(row.pengurang_poin, 0.3);
        assert_eq!(row.kpi_setelah_kalibrasi, 2.9);
        assert_eq!(row.tier, Tier::Fair);
        assert_eq!(row.bonus, 12_000_000.0);
    }

    #[actix_web::test]
    async fn addition_source_raises_final_score() {
        let store = sample_store();
        let reports = build_reports(&store, &FixedAddition(0.5), ReportScope::Employee(2))
            .await
            .unwrap();
        let row = &reports[0];

        assert_eq!(row.penambah_poin, 0.5);
        assert_eq!(row.kpi_setelah_kalibrasi, 5.0);
        assert_eq!(row.tier, Tier::Exceptional);
        assert_eq!(row.bonus, 20_000_000.0);
    }

    #[actix_web::test]
    async fn missing_self_record_is_not_found() {
        let store = sample_store();
        let err = build_reports(&store, &NoAddition, ReportScope::Employee(99))
            .await
            .unwrap_err();
        assert_eq!(err, ReportError::NotFound);
    }

    #[actix_web::test]
    async fn one_failing_employee_fails_the_batch() {
        let mut store = sample_store();
        store.failing_kpis.insert(3);

        let err = build_reports(&store, &NoAddition, ReportScope::All)
            .await
            .unwrap_err();
        assert_eq!(err, ReportError::StoreUnavailable);
    }

    #[actix_web::test]
    async fn kondite_fetch_failure_aborts() {
        let mut store = sample_store();
        store.failing_kondites.insert(2);

        let err = build_reports(&store, &NoAddition, ReportScope::Employee(2))
            .await
            .unwrap_err();
        assert_eq!(err, ReportError::StoreUnavailable);
    }

    #[actix_web::test]
    async fn employee_listing_failure_is_store_unavailable() {
        let store = InMemoryStore {
            list_fails: true,
            ..sample_store()
        };

        let err = build_reports(&store, &NoAddition, ReportScope::All)
            .await
            .unwrap_err();
        assert_eq!(err, ReportError::StoreUnavailable);
    }

    #[test]
    fn report_serializes_with_calibration_keys() {
        let row = CalibrationReport::new(
            1,
            "Budi".into(),
            &calibrate(&[kpi(2, "Individu", 3.0, 100.0)], &[], 0.0, 1_000.0),
        );
        let value = serde_json::to_value(&row).unwrap();

        assert_eq!(value["no"], 1);
        assert_eq!(value["skala"], "Good");
        assert_eq!(value["gaji"], 1_000.0);
        assert_eq!(value["bonus"], 3_000.0);
        assert_eq!(value["kpi_setelah_kalibrasi"], 3.0);
    }
}
