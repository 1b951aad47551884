pub mod aggregate;
pub mod calculator;
pub mod engine;

pub use engine::{EmployeeFailure, PayrollEngine, PayrollRunSummary};

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::PayrollError;

/// Round to 2 decimal places, half up. Applied at every step the payslip
/// arithmetic defines, not only at the end.
pub(crate) fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub(crate) fn validate_period(month: u32, year: i32) -> Result<(), PayrollError> {
    if (1..=12).contains(&month) && (2000..=2100).contains(&year) {
        Ok(())
    } else {
        Err(PayrollError::InvalidPeriod { month, year })
    }
}
