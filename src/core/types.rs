use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_REINVEST_THRESHOLD: f64 = 1_000_000.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("invalid parameter {field}: {reason}")]
    InvalidParameter { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionParameters {
    pub initial_capital: f64,
    pub annual_interest_rate_percent: f64,
    /// Added to capital at the start of every month. Zero disables contributions.
    pub monthly_contribution: f64,
    pub reinvest_threshold: f64,
    pub horizon_months: u32,
}

impl ProjectionParameters {
    pub fn new(initial_capital: f64, annual_interest_rate_percent: f64, horizon_months: u32) -> Self {
        Self {
            initial_capital,
            annual_interest_rate_percent,
            monthly_contribution: 0.0,
            reinvest_threshold: DEFAULT_REINVEST_THRESHOLD,
            horizon_months,
        }
    }

    pub fn with_monthly_contribution(mut self, amount: f64) -> Self {
        self.monthly_contribution = amount;
        self
    }

    pub fn with_reinvest_threshold(mut self, threshold: f64) -> Self {
        self.reinvest_threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<(), ProjectionError> {
        for (field, value) in [
            ("initial_capital", self.initial_capital),
            ("monthly_contribution", self.monthly_contribution),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ProjectionError::InvalidParameter {
                    field,
                    reason: format!("must be a finite amount >= 0, got {value}"),
                });
            }
        }

        if !self.annual_interest_rate_percent.is_finite() {
            return Err(ProjectionError::InvalidParameter {
                field: "annual_interest_rate_percent",
                reason: format!("must be finite, got {}", self.annual_interest_rate_percent),
            });
        }

        if !self.reinvest_threshold.is_finite() || self.reinvest_threshold <= 0.0 {
            return Err(ProjectionError::InvalidParameter {
                field: "reinvest_threshold",
                reason: format!("must be a finite amount > 0, got {}", self.reinvest_threshold),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRecord {
    pub month: u32,
    pub contribution: f64,
    pub interest_earned: f64,
    /// Whole threshold units moved from the accumulator into capital this month.
    pub reinvested: f64,
    pub capital_after: f64,
    pub accumulated_unreinvested_interest: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub month: u32,
    pub capital: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub months: u32,
    pub initial_capital: f64,
    pub final_capital: f64,
    pub remaining_accumulated_interest: f64,
    pub total_interest_earned: f64,
    pub total_contributions: f64,
    pub total_reinvested: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionResult {
    initial_capital: f64,
    records: Vec<MonthlyRecord>,
}

impl ProjectionResult {
    pub(crate) fn new(initial_capital: f64, records: Vec<MonthlyRecord>) -> Self {
        Self {
            initial_capital,
            records,
        }
    }

    pub fn records(&self) -> &[MonthlyRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<MonthlyRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capital_series(&self) -> Vec<ChartPoint> {
        self.records
            .iter()
            .map(|r| ChartPoint {
                month: r.month,
                capital: r.capital_after,
            })
            .collect()
    }

    pub fn summary(&self) -> ProjectionSummary {
        let (final_capital, remaining) = self
            .records
            .last()
            .map(|r| (r.capital_after, r.accumulated_unreinvested_interest))
            .unwrap_or((self.initial_capital, 0.0));

        ProjectionSummary {
            months: self.records.len() as u32,
            initial_capital: self.initial_capital,
            final_capital,
            remaining_accumulated_interest: remaining,
            total_interest_earned: self.records.iter().map(|r| r.interest_earned).sum(),
            total_contributions: self.records.iter().map(|r| r.contribution).sum(),
            total_reinvested: self.records.iter().map(|r| r.reinvested).sum(),
        }
    }
}
