use sqlx::MySqlPool;

use crate::model::{employee::Employee, kondite::Kondite, kpi::Kpi};

/// Read access to everything the bonus report needs.
#[allow(async_fn_in_trait)]
pub trait EmployeeStore {
    async fn find_employee(&self, id: u64) -> Result<Option<Employee>, sqlx::Error>;

    async fn list_employees(&self) -> Result<Vec<Employee>, sqlx::Error>;

    async fn find_kpis(&self, employee_id: u64) -> Result<Vec<Kpi>, sqlx::Error>;

    async fn find_kondites(&self, employee_id: u64) -> Result<Vec<Kondite>, sqlx::Error>;
}

pub struct MySqlEmployeeStore<'a> {
    pool: &'a MySqlPool,
}

impl<'a> MySqlEmployeeStore<'a> {
    pub fn new(pool: &'a MySqlPool) -> Self {
        Self { pool }
    }
}

impl EmployeeStore for MySqlEmployeeStore<'_> {
    async fn find_employee(&self, id: u64) -> Result<Option<Employee>, sqlx::Error> {
        sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, name, email, password, role, salary
            FROM employees
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, sqlx::Error> {
        sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, name, email, password, role, salary
            FROM employees
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool)
        .await
    }

    async fn find_kpis(&self, employee_id: u64) -> Result<Vec<Kpi>, sqlx::Error> {
        sqlx::query_as::<_, Kpi>(
            r#"
            SELECT id, employee_id, title, category, weight, target,
                   poor, fair, good, outstanding, exceptional, score, validated
            FROM kpis
            WHERE employee_id = ?
            "#,
        )
        .bind(employee_id)
        .fetch_all(self.pool)
        .await
    }

    async fn find_kondites(&self, employee_id: u64) -> Result<Vec<Kondite>, sqlx::Error> {
        sqlx::query_as::<_, Kondite>(
            r#"
            SELECT id, employee_id, category, start_date, end_date, description, min_point
            FROM kondites
            WHERE employee_id = ?
            "#,
        )
        .bind(employee_id)
        .fetch_all(self.pool)
        .await
    }
}
