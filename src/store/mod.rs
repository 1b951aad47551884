//! Storage adapter for the payroll engine. Backend selection happens once
//! at construction; callers see a single API. MySQL is the production
//! backend, the in-memory store backs tests and local runs.

mod memory;
mod mysql;

pub use memory::MemoryStore;

use chrono::NaiveDate;
use sqlx::MySqlPool;

use crate::error::PayrollError;
use crate::model::{AttendanceRecord, Bonus, Employee, LeaveApplication, Payslip};

enum Backend {
    MySql(MySqlPool),
    Memory(MemoryStore),
}

pub struct Storage {
    backend: Backend,
}

impl Storage {
    pub fn mysql(pool: MySqlPool) -> Self {
        Self {
            backend: Backend::MySql(pool),
        }
    }

    pub fn memory(store: MemoryStore) -> Self {
        Self {
            backend: Backend::Memory(store),
        }
    }

    pub async fn list_employees(&self) -> Result<Vec<Employee>, PayrollError> {
        match &self.backend {
            Backend::MySql(pool) => mysql::list_employees(pool).await,
            Backend::Memory(store) => store.list_employees(),
        }
    }

    pub async fn employee_by_id(&self, employee_id: u64) -> Result<Option<Employee>, PayrollError> {
        match &self.backend {
            Backend::MySql(pool) => mysql::employee_by_id(pool, employee_id).await,
            Backend::Memory(store) => store.employee_by_id(employee_id),
        }
    }

    /// Attendance records with `date` inside the inclusive range.
    pub async fn attendance_for_period(
        &self,
        employee_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, PayrollError> {
        match &self.backend {
            Backend::MySql(pool) => mysql::attendance_for_period(pool, employee_id, from, to).await,
            Backend::Memory(store) => store.attendance_for_period(employee_id, from, to),
        }
    }

    /// APPROVED leave applications whose span intersects the inclusive range.
    pub async fn approved_leave_overlapping(
        &self,
        employee_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<LeaveApplication>, PayrollError> {
        match &self.backend {
            Backend::MySql(pool) => {
                mysql::approved_leave_overlapping(pool, employee_id, from, to).await
            }
            Backend::Memory(store) => store.approved_leave_overlapping(employee_id, from, to),
        }
    }

    pub async fn bonuses_for_period(
        &self,
        employee_id: u64,
        month: u32,
        year: i32,
    ) -> Result<Vec<Bonus>, PayrollError> {
        match &self.backend {
            Backend::MySql(pool) => mysql::bonuses_for_period(pool, employee_id, month, year).await,
            Backend::Memory(store) => store.bonuses_for_period(employee_id, month, year),
        }
    }

    pub async fn insert_bonus(&self, bonus: &Bonus) -> Result<u64, PayrollError> {
        match &self.backend {
            Backend::MySql(pool) => mysql::insert_bonus(pool, bonus).await,
            Backend::Memory(store) => store.insert_bonus(bonus.clone()),
        }
    }

    /// Idempotent write keyed by (employee_id, month, year): the first call
    /// inserts, every later call overwrites the same row. Returns the row as
    /// stored.
    pub async fn upsert_payslip(&self, payslip: &Payslip) -> Result<Payslip, PayrollError> {
        match &self.backend {
            Backend::MySql(pool) => mysql::upsert_payslip(pool, payslip).await,
            Backend::Memory(store) => store.upsert_payslip(payslip),
        }
    }

    pub async fn payslips_for_period(
        &self,
        month: u32,
        year: i32,
    ) -> Result<Vec<Payslip>, PayrollError> {
        match &self.backend {
            Backend::MySql(pool) => mysql::payslips_for_period(pool, month, year).await,
            Backend::Memory(store) => store.payslips_for_period(month, year),
        }
    }

    pub async fn payslip_for_employee(
        &self,
        employee_id: u64,
        month: u32,
        year: i32,
    ) -> Result<Option<Payslip>, PayrollError> {
        match &self.backend {
            Backend::MySql(pool) => {
                mysql::payslip_for_employee(pool, employee_id, month, year).await
            }
            Backend::Memory(store) => store.payslip_for_employee(employee_id, month, year),
        }
    }

    pub async fn payslip_by_id(&self, payslip_id: u64) -> Result<Option<Payslip>, PayrollError> {
        match &self.backend {
            Backend::MySql(pool) => mysql::payslip_by_id(pool, payslip_id).await,
            Backend::Memory(store) => store.payslip_by_id(payslip_id),
        }
    }
}
