use serde::Serialize;
use strum_macros::Display;
use utoipa::ToSchema;

use crate::model::{kondite::Kondite, kpi::Kpi};

/// Decimal places used for every reported score.
pub const SCORE_PRECISION: i32 = 1;

/// The three KPI buckets that feed the calibration total.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KpiBucket {
    Perusahaan,
    Dept,
    Individu,
}

impl KpiBucket {
    /// Exact, case-sensitive match on the stored category tag.
    pub fn from_category(category: &str) -> Option<Self> {
        match category {
            "Perusahaan" => Some(KpiBucket::Perusahaan),
            "Dept" | "Departemen" => Some(KpiBucket::Dept),
            "Individu" => Some(KpiBucket::Individu),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct KpiTotals {
    pub perusahaan: f64,
    pub dept: f64,
    pub individu: f64,
}

impl KpiTotals {
    pub fn add(&mut self, bucket: KpiBucket, value: f64) {
        match bucket {
            KpiBucket::Perusahaan => self.perusahaan += value,
            KpiBucket::Dept => self.dept += value,
            KpiBucket::Individu => self.individu += value,
        }
    }

    pub fn total(&self) -> f64 {
        self.perusahaan + self.dept + self.individu
    }
}

/// Weighted contribution of a single KPI: `score * weight / 100`.
pub fn contribution(kpi: &Kpi) -> f64 {
    kpi.score * (kpi.weight / 100.0)
}

/// Partition KPIs into buckets. Unknown categories are dropped.
pub fn sum_kpis(kpis: &[Kpi]) -> KpiTotals {
    let mut totals = KpiTotals::default();
    for kpi in kpis {
        if let Some(bucket) = KpiBucket::from_category(&kpi.category) {
            totals.add(bucket, contribution(kpi));
        }
    }
    totals
}

/// Sum of `min_point` over every kondite, whatever its date range.
pub fn sum_deductions(kondites: &[Kondite]) -> f64 {
    kondites.iter().map(|k| k.min_point).sum()
}

/// Calibrated score, never below zero.
pub fn final_score(total_kpi: f64, deduction: f64, addition: f64) -> f64 {
    (total_kpi - deduction + addition).max(0.0)
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Display, ToSchema)]
pub enum Tier {
    Poor,
    Fair,
    Good,
    Outstanding,
    Exceptional,
}

impl Tier {
    /// Half-open intervals: [0,2) Poor, [2,3) Fair, [3,4) Good, [4,5) Outstanding, [5,inf) Exceptional.
    pub fn from_score(score: f64) -> Self {
        if score < 2.0 {
            Tier::Poor
        } else if score < 3.0 {
            Tier::Fair
        } else if score < 4.0 {
            Tier::Good
        } else if score < 5.0 {
            Tier::Outstanding
        } else {
            Tier::Exceptional
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            Tier::Poor => 1.0,
            Tier::Fair => 2.0,
            Tier::Good => 3.0,
            Tier::Outstanding => 4.0,
            Tier::Exceptional => 5.0,
        }
    }
}

/// Round half away from zero to `places` decimals. Negative `places` is a no-op.
pub fn round_to(value: f64, places: i32) -> f64 {
    if places < 0 {
        return value;
    }
    let shift = 10f64.powi(places);
    (value * shift).round() / shift
}

/// Unrounded outcome of calibrating one employee.
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    pub totals: KpiTotals,
    pub total_kpi: f64,
    pub deduction: f64,
    pub addition: f64,
    pub final_score: f64,
    pub tier: Tier,
    pub salary: f64,
    pub bonus: f64,
}

pub fn calibrate(kpis: &[Kpi], kondites: &[Kondite], addition: f64, salary: f64) -> Calibration {
    let totals = sum_kpis(kpis);
    let total_kpi = totals.total();
    let deduction = sum_deductions(kondites);
    let final_score = final_score(total_kpi, deduction, addition);
    let tier = Tier::from_score(final_score);

    Calibration {
        totals,
        total_kpi,
        deduction,
        addition,
        final_score,
        tier,
        salary,
        bonus: salary * tier.multiplier(),
    }
}
