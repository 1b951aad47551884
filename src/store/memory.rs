//! In-memory backend. Keeps the same contract as the MySQL backend behind
//! a single mutex, which also serializes concurrent upserts per payslip
//! key. Used by unit tests and local experiments; no external
//! infrastructure required.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;

use crate::error::PayrollError;
use crate::model::{AttendanceRecord, Bonus, Employee, LeaveApplication, LeaveStatus, Payslip};

#[derive(Default)]
struct Tables {
    employees: Vec<Employee>,
    attendance: Vec<AttendanceRecord>,
    leaves: Vec<LeaveApplication>,
    bonuses: Vec<Bonus>,
    payslips: Vec<Payslip>,
    next_id: u64,
}

impl Tables {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // A poisoned lock only means another test thread panicked while
        // holding it; the tables themselves are still usable.
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // Seeding. The engine itself never creates employees, attendance, or
    // leave; these exist for the collaborators the engine reads from.

    pub fn insert_employee(&self, mut employee: Employee) -> u64 {
        let mut tables = self.lock();
        employee.id = tables.next_id();
        let id = employee.id;
        tables.employees.push(employee);
        id
    }

    pub fn insert_attendance(&self, mut record: AttendanceRecord) -> u64 {
        let mut tables = self.lock();
        record.id = tables.next_id();
        let id = record.id;
        tables.attendance.push(record);
        id
    }

    pub fn insert_leave(&self, mut leave: LeaveApplication) -> u64 {
        let mut tables = self.lock();
        leave.id = tables.next_id();
        let id = leave.id;
        tables.leaves.push(leave);
        id
    }

    // Reads, mirroring the MySQL queries.

    pub fn list_employees(&self) -> Result<Vec<Employee>, PayrollError> {
        let tables = self.lock();
        let mut employees = tables.employees.clone();
        employees.sort_by_key(|e| e.id);
        Ok(employees)
    }

    pub fn employee_by_id(&self, employee_id: u64) -> Result<Option<Employee>, PayrollError> {
        let tables = self.lock();
        Ok(tables.employees.iter().find(|e| e.id == employee_id).cloned())
    }

    pub fn attendance_for_period(
        &self,
        employee_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, PayrollError> {
        let tables = self.lock();
        Ok(tables
            .attendance
            .iter()
            .filter(|r| r.employee_id == employee_id && r.date >= from && r.date <= to)
            .cloned()
            .collect())
    }

    pub fn approved_leave_overlapping(
        &self,
        employee_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<LeaveApplication>, PayrollError> {
        let tables = self.lock();
        Ok(tables
            .leaves
            .iter()
            .filter(|l| {
                l.employee_id == employee_id
                    && l.status == LeaveStatus::Approved
                    && l.start_date <= to
                    && l.end_date >= from
            })
            .cloned()
            .collect())
    }

    pub fn bonuses_for_period(
        &self,
        employee_id: u64,
        month: u32,
        year: i32,
    ) -> Result<Vec<Bonus>, PayrollError> {
        let tables = self.lock();
        Ok(tables
            .bonuses
            .iter()
            .filter(|b| b.employee_id == employee_id && b.month == month && b.year == year)
            .cloned()
            .collect())
    }

    pub fn insert_bonus(&self, mut bonus: Bonus) -> Result<u64, PayrollError> {
        let mut tables = self.lock();
        bonus.id = tables.next_id();
        let id = bonus.id;
        tables.bonuses.push(bonus);
        Ok(id)
    }

    /// Find-or-create-then-overwrite keyed by (employee_id, month, year).
    /// An existing row keeps its identity and gets all computed fields
    /// replaced.
    pub fn upsert_payslip(&self, payslip: &Payslip) -> Result<Payslip, PayrollError> {
        let mut tables = self.lock();
        if let Some(existing) = tables.payslips.iter_mut().find(|p| {
            p.employee_id == payslip.employee_id
                && p.month == payslip.month
                && p.year == payslip.year
        }) {
            let id = existing.id;
            *existing = payslip.clone();
            existing.id = id;
            return Ok(existing.clone());
        }
        let mut stored = payslip.clone();
        stored.id = tables.next_id();
        tables.payslips.push(stored.clone());
        Ok(stored)
    }

    pub fn payslips_for_period(&self, month: u32, year: i32) -> Result<Vec<Payslip>, PayrollError> {
        let tables = self.lock();
        let mut payslips: Vec<Payslip> = tables
            .payslips
            .iter()
            .filter(|p| p.month == month && p.year == year)
            .cloned()
            .collect();
        payslips.sort_by_key(|p| p.employee_id);
        Ok(payslips)
    }

    pub fn payslip_for_employee(
        &self,
        employee_id: u64,
        month: u32,
        year: i32,
    ) -> Result<Option<Payslip>, PayrollError> {
        let tables = self.lock();
        Ok(tables
            .payslips
            .iter()
            .find(|p| p.employee_id == employee_id && p.month == month && p.year == year)
            .cloned())
    }

    pub fn payslip_by_id(&self, payslip_id: u64) -> Result<Option<Payslip>, PayrollError> {
        let tables = self.lock();
        Ok(tables.payslips.iter().find(|p| p.id == payslip_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn payslip(employee_id: u64, month: u32, year: i32, net: Decimal) -> Payslip {
        Payslip {
            id: 0,
            employee_id,
            month,
            year,
            base_monthly_salary: Decimal::from(50_000),
            total_working_days_in_month: 20,
            days_present: 20,
            days_absent: 0,
            days_half_day: 0,
            days_on_approved_leave: 0,
            attendance_deduction: Decimal::ZERO,
            tax_deduction: Decimal::from(5_000),
            pf_deduction: Decimal::from(6_000),
            other_deductions: Decimal::ZERO,
            bonus_amount: Decimal::ZERO,
            gross_salary: Decimal::from(50_000),
            net_salary: net,
            generated_at: Utc::now().naive_utc(),
            generated_by: "Admin System".to_string(),
        }
    }

    #[test]
    fn upsert_replaces_in_place_and_keeps_identity() {
        let store = MemoryStore::new();

        let first = store
            .upsert_payslip(&payslip(1, 6, 2024, Decimal::from(39_000)))
            .unwrap();
        let second = store
            .upsert_payslip(&payslip(1, 6, 2024, Decimal::from(40_000)))
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.net_salary, Decimal::from(40_000));
        assert_eq!(store.payslips_for_period(6, 2024).unwrap().len(), 1);
    }

    #[test]
    fn upsert_keeps_distinct_periods_apart() {
        let store = MemoryStore::new();

        store
            .upsert_payslip(&payslip(1, 6, 2024, Decimal::from(39_000)))
            .unwrap();
        store
            .upsert_payslip(&payslip(1, 7, 2024, Decimal::from(39_000)))
            .unwrap();

        assert_eq!(store.payslips_for_period(6, 2024).unwrap().len(), 1);
        assert_eq!(store.payslips_for_period(7, 2024).unwrap().len(), 1);
    }
}
