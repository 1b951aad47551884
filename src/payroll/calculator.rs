//! Payslip arithmetic. Every monetary step is rounded to 2dp half-up at
//! the point it is produced, so recomputation over the same inputs is
//! reproducible to the cent.

use chrono::Utc;
use rust_decimal::Decimal;

use crate::actor::Actor;
use crate::config::PayrollPolicy;
use crate::error::PayrollError;
use crate::model::{Employee, Payslip};
use crate::payroll::aggregate::AttendanceTotals;
use crate::payroll::{round2, validate_period};
use crate::utils::calendar;

const FALLBACK_STANDARD_WORKING_DAYS: u32 = 25;

/// Builds the payslip value for one employee and period from the already
/// aggregated attendance, leave, and bonus figures. Pure arithmetic plus a
/// generation stamp; persistence belongs to the store.
pub fn build_payslip(
    employee: &Employee,
    month: u32,
    year: i32,
    policy: &PayrollPolicy,
    attendance: AttendanceTotals,
    days_on_approved_leave: u32,
    bonus_total: Decimal,
    actor: &Actor,
) -> Result<Payslip, PayrollError> {
    validate_period(month, year)?;

    if employee.annual_salary <= Decimal::ZERO {
        return Err(PayrollError::InvalidEmployeeState {
            employee_id: employee.id,
            reason: "annual salary must be positive".to_string(),
        });
    }

    let standard_working_days = if policy.standard_working_days_per_month == 0 {
        tracing::warn!(
            employee_id = employee.id,
            "standard working days per month is 0, falling back to {}",
            FALLBACK_STANDARD_WORKING_DAYS
        );
        FALLBACK_STANDARD_WORKING_DAYS
    } else {
        policy.standard_working_days_per_month
    };

    // validate_period already bounds the month, so the bounds exist.
    let (month_start, month_end) = calendar::month_bounds(year, month)
        .ok_or(PayrollError::InvalidPeriod { month, year })?;
    let total_working_days_in_month =
        calendar::count_working_days_in_range(month_start, month_end);

    let base_monthly_salary = round2(employee.annual_salary / Decimal::from(12));
    let daily_rate = round2(base_monthly_salary / Decimal::from(standard_working_days));

    // Half-day deduction is rounded on its own before being added to the
    // absence deduction; the combined figure is then rounded again.
    let half_day_deduction =
        round2(daily_rate * Decimal::from(attendance.half_day) / Decimal::from(2));
    let attendance_deduction =
        round2(daily_rate * Decimal::from(attendance.absent) + half_day_deduction);

    let tax_deduction = round2(base_monthly_salary * policy.tax_rate);
    let pf_deduction = round2(base_monthly_salary * policy.pf_rate);
    let other_deductions = Decimal::ZERO;

    let bonus_amount = round2(bonus_total);
    let gross_salary = round2(base_monthly_salary + bonus_amount);
    let net_salary = round2(
        gross_salary - attendance_deduction - tax_deduction - pf_deduction - other_deductions,
    );

    Ok(Payslip {
        id: 0,
        employee_id: employee.id,
        month,
        year,
        base_monthly_salary,
        total_working_days_in_month,
        days_present: attendance.present,
        days_absent: attendance.absent,
        days_half_day: attendance.half_day,
        days_on_approved_leave,
        attendance_deduction,
        tax_deduction,
        pf_deduction,
        other_deductions,
        bonus_amount,
        gross_salary,
        net_salary,
        generated_at: Utc::now().naive_utc(),
        generated_by: actor.label().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn employee(annual_salary: Decimal) -> Employee {
        Employee {
            id: 7,
            employee_code: "EMP-007".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane.doe@company.com".to_string(),
            annual_salary,
            join_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        }
    }

    fn actor() -> Actor {
        Actor::system("Admin System")
    }

    #[test]
    fn end_to_end_scenario() {
        let attendance = AttendanceTotals {
            present: 18,
            absent: 2,
            half_day: 0,
        };
        let payslip = build_payslip(
            &employee(Decimal::from(600_000)),
            6,
            2024,
            &PayrollPolicy::default(),
            attendance,
            0,
            Decimal::from(5_000),
            &actor(),
        )
        .unwrap();

        assert_eq!(payslip.base_monthly_salary, Decimal::from(50_000));
        assert_eq!(payslip.attendance_deduction, Decimal::from(4_000));
        assert_eq!(payslip.tax_deduction, Decimal::from(5_000));
        assert_eq!(payslip.pf_deduction, Decimal::from(6_000));
        assert_eq!(payslip.other_deductions, Decimal::ZERO);
        assert_eq!(payslip.gross_salary, Decimal::from(55_000));
        assert_eq!(payslip.net_salary, Decimal::from(40_000));
        assert_eq!(payslip.total_working_days_in_month, 20);
        assert_eq!(payslip.generated_by, "Admin System");
    }

    #[test]
    fn half_day_deduction_is_rounded_before_adding() {
        // Annual 300000 -> monthly 25000 -> daily rate 1000 at 25 standard
        // days. Three half days: round(1000 * 3 / 2) = 1500.
        let attendance = AttendanceTotals {
            present: 17,
            absent: 0,
            half_day: 3,
        };
        let payslip = build_payslip(
            &employee(Decimal::from(300_000)),
            6,
            2024,
            &PayrollPolicy::default(),
            attendance,
            0,
            Decimal::ZERO,
            &actor(),
        )
        .unwrap();

        assert_eq!(payslip.attendance_deduction, Decimal::from(1_500));
    }

    #[test]
    fn fractional_daily_rate_rounds_half_up_at_each_stage() {
        // Annual 100000 -> monthly 8333.33 -> daily 333.33. One half day:
        // round(333.33 / 2) = round(166.665) = 166.67, then one absence on
        // top: round(333.33 + 166.67) = 500.00.
        let attendance = AttendanceTotals {
            present: 18,
            absent: 1,
            half_day: 1,
        };
        let payslip = build_payslip(
            &employee(Decimal::from(100_000)),
            6,
            2024,
            &PayrollPolicy::default(),
            attendance,
            0,
            Decimal::ZERO,
            &actor(),
        )
        .unwrap();

        assert_eq!(payslip.base_monthly_salary, Decimal::new(833_333, 2));
        assert_eq!(payslip.attendance_deduction, Decimal::new(50_000, 2));
    }

    #[test]
    fn net_salary_identity_holds() {
        let attendance = AttendanceTotals {
            present: 15,
            absent: 3,
            half_day: 2,
        };
        let payslip = build_payslip(
            &employee(Decimal::new(77_777_777, 2)),
            2,
            2024,
            &PayrollPolicy::default(),
            attendance,
            4,
            Decimal::new(123_456, 2),
            &actor(),
        )
        .unwrap();

        assert_eq!(
            payslip.net_salary,
            payslip.gross_salary
                - payslip.attendance_deduction
                - payslip.tax_deduction
                - payslip.pf_deduction
                - payslip.other_deductions
        );
        assert_eq!(payslip.days_on_approved_leave, 4);
        assert_eq!(payslip.total_working_days_in_month, 21);
    }

    #[test]
    fn leave_days_do_not_change_deductions() {
        let attendance = AttendanceTotals {
            present: 20,
            absent: 0,
            half_day: 0,
        };
        let with_leave = build_payslip(
            &employee(Decimal::from(600_000)),
            6,
            2024,
            &PayrollPolicy::default(),
            attendance,
            5,
            Decimal::ZERO,
            &actor(),
        )
        .unwrap();
        let without_leave = build_payslip(
            &employee(Decimal::from(600_000)),
            6,
            2024,
            &PayrollPolicy::default(),
            attendance,
            0,
            Decimal::ZERO,
            &actor(),
        )
        .unwrap();

        assert_eq!(with_leave.attendance_deduction, without_leave.attendance_deduction);
        assert_eq!(with_leave.net_salary, without_leave.net_salary);
        assert_eq!(with_leave.days_on_approved_leave, 5);
    }

    #[test]
    fn non_positive_salary_is_rejected() {
        let result = build_payslip(
            &employee(Decimal::ZERO),
            6,
            2024,
            &PayrollPolicy::default(),
            AttendanceTotals::default(),
            0,
            Decimal::ZERO,
            &actor(),
        );
        assert!(matches!(
            result,
            Err(PayrollError::InvalidEmployeeState { employee_id: 7, .. })
        ));
    }

    #[test]
    fn out_of_range_period_is_rejected() {
        let result = build_payslip(
            &employee(Decimal::from(600_000)),
            13,
            2024,
            &PayrollPolicy::default(),
            AttendanceTotals::default(),
            0,
            Decimal::ZERO,
            &actor(),
        );
        assert!(matches!(
            result,
            Err(PayrollError::InvalidPeriod { month: 13, year: 2024 })
        ));
    }
}
