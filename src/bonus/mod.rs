//! KPI calibration and bonus computation.
//!
//! `calculator` holds the pure arithmetic, `report` walks employees through an
//! [`store::EmployeeStore`] and produces one [`report::CalibrationReport`] each.

pub mod achievement;
pub mod addition;
pub mod calculator;
pub mod error;
pub mod report;
pub mod store;
