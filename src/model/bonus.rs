use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Bonus entry for an employee in a given pay period. Multiple rows may
/// exist for the same (employee, month, year); payroll sums them all.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bonus {
    pub id: u64,
    pub employee_id: u64,
    pub amount: Decimal,
    pub month: u32,
    pub year: i32,
    pub description: Option<String>,
    pub added_by: String,
    pub added_at: NaiveDateTime,
}
