use log::{debug, trace};

use super::types::{MonthlyRecord, ProjectionError, ProjectionParameters, ProjectionResult};

const MAX_PREALLOCATED_MONTHS: usize = 1_200;

/// Runs the month-by-month projection.
///
/// Each month the contribution lands first, interest accrues on the new
/// capital, and whole multiples of the reinvestment threshold are then moved
/// from the interest accumulator into capital. Nothing is rounded here.
pub fn project(params: &ProjectionParameters) -> Result<ProjectionResult, ProjectionError> {
    params.validate()?;

    let rate = monthly_rate(params.annual_interest_rate_percent);
    let threshold = params.reinvest_threshold;
    let mut capital = params.initial_capital;
    let mut accumulated = 0.0;
    let mut records = Vec::with_capacity((params.horizon_months as usize).min(MAX_PREALLOCATED_MONTHS));

    for month in 1..=params.horizon_months {
        capital += params.monthly_contribution;

        let interest = capital * rate;
        accumulated += interest;

        if !interest.is_finite() || !capital.is_finite() {
            return Err(overflow_error(month));
        }

        let reinvested = reinvest_whole_units(&mut capital, &mut accumulated, threshold);
        if !capital.is_finite() || !accumulated.is_finite() {
            return Err(overflow_error(month));
        }
        if reinvested > 0.0 {
            trace!("month {month}: reinvested {reinvested} into capital {capital}");
        }

        records.push(MonthlyRecord {
            month,
            contribution: params.monthly_contribution,
            interest_earned: interest,
            reinvested,
            capital_after: capital,
            accumulated_unreinvested_interest: accumulated,
        });
    }

    let result = ProjectionResult::new(params.initial_capital, records);
    if let Some(last) = result.records().last() {
        debug!(
            "projected {} months: final capital {}, accumulated {}",
            last.month, last.capital_after, last.accumulated_unreinvested_interest
        );
    }
    Ok(result)
}

fn overflow_error(month: u32) -> ProjectionError {
    ProjectionError::InvalidParameter {
        field: "initial_capital",
        reason: format!("capital or interest is no longer finite at month {month}"),
    }
}

/// Negative annual rates accrue nothing.
fn monthly_rate(annual_rate_percent: f64) -> f64 {
    (annual_rate_percent / 12.0 / 100.0).max(0.0)
}

fn reinvest_whole_units(capital: &mut f64, accumulated: &mut f64, threshold: f64) -> f64 {
    if *accumulated < threshold {
        return 0.0;
    }

    let mut units = (*accumulated / threshold).floor();
    // Division can round up to a unit count the accumulator does not cover.
    if units * threshold > *accumulated {
        units -= 1.0;
    }

    let amount = units * threshold;
    *capital += amount;
    *accumulated -= amount;
    amount
}
