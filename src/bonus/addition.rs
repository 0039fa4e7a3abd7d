use crate::model::employee::Employee;

/// Source of bonus points added during calibration (rewards, commendations).
#[allow(async_fn_in_trait)]
pub trait AdditionSource {
    async fn addition_points(&self, employee: &Employee) -> Result<f64, sqlx::Error>;
}

/// No reward programme wired in yet; every employee gets zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAddition;

impl AdditionSource for NoAddition {
    async fn addition_points(&self, _employee: &Employee) -> Result<f64, sqlx::Error> {
        Ok(0.0)
    }
}
