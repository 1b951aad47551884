use thiserror::Error;

/// Errors that can come out of payroll calculation and storage.
#[derive(Debug, Error)]
pub enum PayrollError {
    /// The employee row cannot be paid as stored (missing or non-positive salary).
    #[error("employee {employee_id} cannot be processed: {reason}")]
    InvalidEmployeeState { employee_id: u64, reason: String },

    #[error("invalid pay period {month}-{year}")]
    InvalidPeriod { month: u32, year: i32 },

    #[error("employee not found: {0}")]
    EmployeeNotFound(u64),

    /// A payslip was requested for a period that was never generated.
    #[error("no payslip for employee {employee_id} in {month}-{year}")]
    PayslipNotFound {
        employee_id: u64,
        month: u32,
        year: i32,
    },

    #[error("payslip not found: {0}")]
    PayslipIdNotFound(u64),

    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for PayrollError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
