use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Computed monthly compensation record, exactly one per
/// (employee_id, month, year). Recomputing a period overwrites the existing
/// row in place; only `generated_at` tells two computations apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Payslip {
    pub id: u64,
    pub employee_id: u64,
    pub month: u32,
    pub year: i32,
    pub base_monthly_salary: Decimal,
    /// Calendar-derived working days of the month, stored for transparency.
    /// Not an input to any deduction formula.
    pub total_working_days_in_month: u32,
    pub days_present: u32,
    pub days_absent: u32,
    pub days_half_day: u32,
    /// Informational; approved leave does not change any deduction.
    pub days_on_approved_leave: u32,
    pub attendance_deduction: Decimal,
    pub tax_deduction: Decimal,
    pub pf_deduction: Decimal,
    pub other_deductions: Decimal,
    pub bonus_amount: Decimal,
    pub gross_salary: Decimal,
    pub net_salary: Decimal,
    pub generated_at: NaiveDateTime,
    pub generated_by: String,
}
