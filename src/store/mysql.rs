//! MySQL backend. Runtime-bound sqlx queries; enum columns are stored as
//! their SCREAMING_SNAKE_CASE names and parsed on the way out.

use chrono::NaiveDate;
use sqlx::MySqlPool;

use crate::error::PayrollError;
use crate::model::{
    AttendanceRecord, AttendanceStatus, Bonus, Employee, LeaveApplication, LeaveStatus, Payslip,
};

#[derive(sqlx::FromRow)]
struct AttendanceRow {
    id: u64,
    employee_id: u64,
    date: NaiveDate,
    status: String,
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = PayrollError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        let status: AttendanceStatus = row
            .status
            .parse()
            .map_err(|_| PayrollError::Storage(format!("bad attendance status: {}", row.status)))?;
        Ok(Self {
            id: row.id,
            employee_id: row.employee_id,
            date: row.date,
            status,
        })
    }
}

#[derive(sqlx::FromRow)]
struct LeaveRow {
    id: u64,
    employee_id: u64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    status: String,
}

impl TryFrom<LeaveRow> for LeaveApplication {
    type Error = PayrollError;

    fn try_from(row: LeaveRow) -> Result<Self, Self::Error> {
        let status: LeaveStatus = row
            .status
            .parse()
            .map_err(|_| PayrollError::Storage(format!("bad leave status: {}", row.status)))?;
        Ok(Self {
            id: row.id,
            employee_id: row.employee_id,
            start_date: row.start_date,
            end_date: row.end_date,
            status,
        })
    }
}

pub(super) async fn list_employees(pool: &MySqlPool) -> Result<Vec<Employee>, PayrollError> {
    let employees = sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, employee_code, first_name, last_name, email, annual_salary, join_date
        FROM employees
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(employees)
}

pub(super) async fn employee_by_id(
    pool: &MySqlPool,
    employee_id: u64,
) -> Result<Option<Employee>, PayrollError> {
    let employee = sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, employee_code, first_name, last_name, email, annual_salary, join_date
        FROM employees
        WHERE id = ?
        "#,
    )
    .bind(employee_id)
    .fetch_optional(pool)
    .await?;

    Ok(employee)
}

pub(super) async fn attendance_for_period(
    pool: &MySqlPool,
    employee_id: u64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<AttendanceRecord>, PayrollError> {
    let rows = sqlx::query_as::<_, AttendanceRow>(
        r#"
        SELECT id, employee_id, date, status
        FROM attendance
        WHERE employee_id = ? AND date BETWEEN ? AND ?
        "#,
    )
    .bind(employee_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(AttendanceRecord::try_from).collect()
}

pub(super) async fn approved_leave_overlapping(
    pool: &MySqlPool,
    employee_id: u64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<LeaveApplication>, PayrollError> {
    // Overlap is intersection, not containment: span starts on or before the
    // period end and ends on or after the period start.
    let rows = sqlx::query_as::<_, LeaveRow>(
        r#"
        SELECT id, employee_id, start_date, end_date, status
        FROM leave_applications
        WHERE employee_id = ? AND status = 'APPROVED' AND start_date <= ? AND end_date >= ?
        "#,
    )
    .bind(employee_id)
    .bind(to)
    .bind(from)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(LeaveApplication::try_from).collect()
}

pub(super) async fn bonuses_for_period(
    pool: &MySqlPool,
    employee_id: u64,
    month: u32,
    year: i32,
) -> Result<Vec<Bonus>, PayrollError> {
    let bonuses = sqlx::query_as::<_, Bonus>(
        r#"
        SELECT id, employee_id, amount, month, year, description, added_by, added_at
        FROM bonuses
        WHERE employee_id = ? AND month = ? AND year = ?
        "#,
    )
    .bind(employee_id)
    .bind(month)
    .bind(year)
    .fetch_all(pool)
    .await?;

    Ok(bonuses)
}

pub(super) async fn insert_bonus(pool: &MySqlPool, bonus: &Bonus) -> Result<u64, PayrollError> {
    let result = sqlx::query(
        r#"
        INSERT INTO bonuses (employee_id, amount, month, year, description, added_by, added_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(bonus.employee_id)
    .bind(bonus.amount)
    .bind(bonus.month)
    .bind(bonus.year)
    .bind(bonus.description.as_deref())
    .bind(&bonus.added_by)
    .bind(bonus.added_at)
    .execute(pool)
    .await?;

    Ok(result.last_insert_id())
}

pub(super) async fn upsert_payslip(
    pool: &MySqlPool,
    payslip: &Payslip,
) -> Result<Payslip, PayrollError> {
    // The unique key on (employee_id, month, year) serializes concurrent
    // upserts for the same period at the row level; last writer wins.
    sqlx::query(
        r#"
        INSERT INTO payslips
        (employee_id, month, year, base_monthly_salary, total_working_days_in_month,
         days_present, days_absent, days_half_day, days_on_approved_leave,
         attendance_deduction, tax_deduction, pf_deduction, other_deductions,
         bonus_amount, gross_salary, net_salary, generated_at, generated_by)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON DUPLICATE KEY UPDATE
            base_monthly_salary = VALUES(base_monthly_salary),
            total_working_days_in_month = VALUES(total_working_days_in_month),
            days_present = VALUES(days_present),
            days_absent = VALUES(days_absent),
            days_half_day = VALUES(days_half_day),
            days_on_approved_leave = VALUES(days_on_approved_leave),
            attendance_deduction = VALUES(attendance_deduction),
            tax_deduction = VALUES(tax_deduction),
            pf_deduction = VALUES(pf_deduction),
            other_deductions = VALUES(other_deductions),
            bonus_amount = VALUES(bonus_amount),
            gross_salary = VALUES(gross_salary),
            net_salary = VALUES(net_salary),
            generated_at = VALUES(generated_at),
            generated_by = VALUES(generated_by)
        "#,
    )
    .bind(payslip.employee_id)
    .bind(payslip.month)
    .bind(payslip.year)
    .bind(payslip.base_monthly_salary)
    .bind(payslip.total_working_days_in_month)
    .bind(payslip.days_present)
    .bind(payslip.days_absent)
    .bind(payslip.days_half_day)
    .bind(payslip.days_on_approved_leave)
    .bind(payslip.attendance_deduction)
    .bind(payslip.tax_deduction)
    .bind(payslip.pf_deduction)
    .bind(payslip.other_deductions)
    .bind(payslip.bonus_amount)
    .bind(payslip.gross_salary)
    .bind(payslip.net_salary)
    .bind(payslip.generated_at)
    .bind(&payslip.generated_by)
    .execute(pool)
    .await?;

    let stored = sqlx::query_as::<_, Payslip>(
        r#"
        SELECT id, employee_id, month, year, base_monthly_salary, total_working_days_in_month,
               days_present, days_absent, days_half_day, days_on_approved_leave,
               attendance_deduction, tax_deduction, pf_deduction, other_deductions,
               bonus_amount, gross_salary, net_salary, generated_at, generated_by
        FROM payslips
        WHERE employee_id = ? AND month = ? AND year = ?
        "#,
    )
    .bind(payslip.employee_id)
    .bind(payslip.month)
    .bind(payslip.year)
    .fetch_one(pool)
    .await?;

    Ok(stored)
}

pub(super) async fn payslips_for_period(
    pool: &MySqlPool,
    month: u32,
    year: i32,
) -> Result<Vec<Payslip>, PayrollError> {
    let payslips = sqlx::query_as::<_, Payslip>(
        r#"
        SELECT id, employee_id, month, year, base_monthly_salary, total_working_days_in_month,
               days_present, days_absent, days_half_day, days_on_approved_leave,
               attendance_deduction, tax_deduction, pf_deduction, other_deductions,
               bonus_amount, gross_salary, net_salary, generated_at, generated_by
        FROM payslips
        WHERE month = ? AND year = ?
        ORDER BY employee_id
        "#,
    )
    .bind(month)
    .bind(year)
    .fetch_all(pool)
    .await?;

    Ok(payslips)
}

pub(super) async fn payslip_for_employee(
    pool: &MySqlPool,
    employee_id: u64,
    month: u32,
    year: i32,
) -> Result<Option<Payslip>, PayrollError> {
    let payslip = sqlx::query_as::<_, Payslip>(
        r#"
        SELECT id, employee_id, month, year, base_monthly_salary, total_working_days_in_month,
               days_present, days_absent, days_half_day, days_on_approved_leave,
               attendance_deduction, tax_deduction, pf_deduction, other_deductions,
               bonus_amount, gross_salary, net_salary, generated_at, generated_by
        FROM payslips
        WHERE employee_id = ? AND month = ? AND year = ?
        "#,
    )
    .bind(employee_id)
    .bind(month)
    .bind(year)
    .fetch_optional(pool)
    .await?;

    Ok(payslip)
}

pub(super) async fn payslip_by_id(
    pool: &MySqlPool,
    payslip_id: u64,
) -> Result<Option<Payslip>, PayrollError> {
    let payslip = sqlx::query_as::<_, Payslip>(
        r#"
        SELECT id, employee_id, month, year, base_monthly_salary, total_working_days_in_month,
               days_present, days_absent, days_half_day, days_on_approved_leave,
               attendance_deduction, tax_deduction, pf_deduction, other_deductions,
               bonus_amount, gross_salary, net_salary, generated_at, generated_by
        FROM payslips
        WHERE id = ?
        "#,
    )
    .bind(payslip_id)
    .fetch_optional(pool)
    .await?;

    Ok(payslip)
}
