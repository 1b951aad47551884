//! Batch orchestration: the monthly payroll run, single-employee
//! recomputation, and the bonus-entry trigger that refreshes an affected
//! payslip.

use chrono::Utc;
use futures_util::{StreamExt, stream};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use crate::actor::Actor;
use crate::config::PayrollPolicy;
use crate::error::PayrollError;
use crate::model::{Bonus, Employee, Payslip};
use crate::payroll::aggregate::{self, AttendanceTotals};
use crate::payroll::{calculator, validate_period};
use crate::store::Storage;
use crate::utils::calendar;

#[derive(Debug, Serialize)]
pub struct EmployeeFailure {
    pub employee_id: u64,
    pub reason: String,
}

/// Outcome of a monthly run. Failures never abort the batch; they are
/// collected here next to the payslips that did go through.
#[derive(Debug, Serialize)]
pub struct PayrollRunSummary {
    pub month: u32,
    pub year: i32,
    pub payslips: Vec<Payslip>,
    pub failures: Vec<EmployeeFailure>,
}

pub struct PayrollEngine {
    storage: Storage,
    policy: PayrollPolicy,
    batch_workers: usize,
}

impl PayrollEngine {
    pub fn new(storage: Storage, policy: PayrollPolicy, batch_workers: usize) -> Self {
        Self {
            storage,
            policy,
            batch_workers: batch_workers.max(1),
        }
    }

    /// Runs payroll for every employee. Re-running a period that was
    /// already processed is allowed and overwrites the stored payslips:
    /// payroll is a recomputable view, not an append-only ledger.
    pub async fn run_monthly_payroll(
        &self,
        month: u32,
        year: i32,
        actor: &Actor,
    ) -> Result<PayrollRunSummary, PayrollError> {
        validate_period(month, year)?;
        info!(month, year, "starting monthly payroll run");

        let existing = self.storage.payslips_for_period(month, year).await?;
        if !existing.is_empty() {
            warn!(
                month,
                year,
                count = existing.len(),
                "payroll already processed for this period, re-processing overwrites it"
            );
        }

        let employees = self.storage.list_employees().await?;
        if employees.is_empty() {
            warn!(month, year, "no employees to process");
        }

        let results: Vec<(u64, Result<Payslip, PayrollError>)> = stream::iter(employees)
            .map(|employee| async move {
                let outcome = self.process_employee(&employee, month, year, actor).await;
                (employee.id, outcome)
            })
            .buffer_unordered(self.batch_workers)
            .collect()
            .await;

        let mut payslips = Vec::new();
        let mut failures = Vec::new();
        for (employee_id, outcome) in results {
            match outcome {
                Ok(payslip) => payslips.push(payslip),
                Err(error) => {
                    tracing::error!(error = %error, employee_id, "payslip generation failed");
                    failures.push(EmployeeFailure {
                        employee_id,
                        reason: error.to_string(),
                    });
                }
            }
        }
        payslips.sort_by_key(|p| p.employee_id);

        info!(
            month,
            year,
            succeeded = payslips.len(),
            failed = failures.len(),
            "monthly payroll run finished"
        );

        Ok(PayrollRunSummary {
            month,
            year,
            payslips,
            failures,
        })
    }

    /// Recomputes and overwrites one employee's payslip for the period.
    pub async fn recompute_employee(
        &self,
        employee_id: u64,
        month: u32,
        year: i32,
        actor: &Actor,
    ) -> Result<Payslip, PayrollError> {
        validate_period(month, year)?;
        let employee = self
            .storage
            .employee_by_id(employee_id)
            .await?
            .ok_or(PayrollError::EmployeeNotFound(employee_id))?;
        self.process_employee(&employee, month, year, actor).await
    }

    /// Records a bonus row and immediately recomputes the affected payslip
    /// so a period that was already paid out reflects the new bonus.
    pub async fn add_bonus(
        &self,
        employee_id: u64,
        amount: Decimal,
        month: u32,
        year: i32,
        description: Option<String>,
        actor: &Actor,
    ) -> Result<Payslip, PayrollError> {
        validate_period(month, year)?;
        let employee = self
            .storage
            .employee_by_id(employee_id)
            .await?
            .ok_or(PayrollError::EmployeeNotFound(employee_id))?;

        let bonus = Bonus {
            id: 0,
            employee_id,
            amount,
            month,
            year,
            description,
            added_by: actor.label().to_string(),
            added_at: Utc::now().naive_utc(),
        };
        self.storage.insert_bonus(&bonus).await?;
        info!(employee_id, month, year, amount = %amount, "bonus recorded, refreshing payslip");

        self.process_employee(&employee, month, year, actor).await
    }

    pub async fn payslips_for_period(
        &self,
        month: u32,
        year: i32,
    ) -> Result<Vec<Payslip>, PayrollError> {
        self.storage.payslips_for_period(month, year).await
    }

    pub async fn payslip_for_employee(
        &self,
        employee_id: u64,
        month: u32,
        year: i32,
    ) -> Result<Payslip, PayrollError> {
        self.storage
            .payslip_for_employee(employee_id, month, year)
            .await?
            .ok_or(PayrollError::PayslipNotFound {
                employee_id,
                month,
                year,
            })
    }

    pub async fn payslip_by_id(&self, payslip_id: u64) -> Result<Payslip, PayrollError> {
        self.storage
            .payslip_by_id(payslip_id)
            .await?
            .ok_or(PayrollError::PayslipIdNotFound(payslip_id))
    }

    /// Calculate and upsert one payslip. A storage failure on the upsert is
    /// retried once; it is the write most likely to hit transient
    /// contention.
    async fn process_employee(
        &self,
        employee: &Employee,
        month: u32,
        year: i32,
        actor: &Actor,
    ) -> Result<Payslip, PayrollError> {
        let payslip = self.calculate(employee, month, year, actor).await?;
        match self.storage.upsert_payslip(&payslip).await {
            Ok(stored) => Ok(stored),
            Err(PayrollError::Storage(first)) => {
                warn!(
                    employee_id = employee.id,
                    error = %first,
                    "payslip upsert failed, retrying once"
                );
                self.storage.upsert_payslip(&payslip).await
            }
            Err(other) => Err(other),
        }
    }

    /// Pulls the period's attendance, approved leave, and bonuses and runs
    /// the payslip arithmetic. No writes.
    async fn calculate(
        &self,
        employee: &Employee,
        month: u32,
        year: i32,
        actor: &Actor,
    ) -> Result<Payslip, PayrollError> {
        let (month_start, month_end) = calendar::month_bounds(year, month)
            .ok_or(PayrollError::InvalidPeriod { month, year })?;

        let attendance = self
            .storage
            .attendance_for_period(employee.id, month_start, month_end)
            .await?;
        let leaves = self
            .storage
            .approved_leave_overlapping(employee.id, month_start, month_end)
            .await?;
        let bonuses = self
            .storage
            .bonuses_for_period(employee.id, month, year)
            .await?;

        calculator::build_payslip(
            employee,
            month,
            year,
            &self.policy,
            AttendanceTotals::tally(&attendance),
            aggregate::approved_leave_working_days(&leaves, year, month),
            aggregate::bonus_total(&bonuses),
            actor,
        )
    }
}
