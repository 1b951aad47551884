//! Per-period aggregation over the record sets payroll reads: attendance
//! by status, approved-leave working days, and bonus totals.

use rust_decimal::Decimal;

use crate::model::{AttendanceRecord, AttendanceStatus, Bonus, LeaveApplication, LeaveStatus};
use crate::payroll::round2;
use crate::utils::calendar;

/// Attendance counts for one employee in one month. Days with no record at
/// all appear in no counter: the three fields may sum to less than the
/// month's working days, and the gap is neither present nor deducted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceTotals {
    pub present: u32,
    pub absent: u32,
    pub half_day: u32,
}

impl AttendanceTotals {
    pub fn tally(records: &[AttendanceRecord]) -> Self {
        let mut totals = Self::default();
        for record in records {
            match record.status {
                AttendanceStatus::Present => totals.present += 1,
                AttendanceStatus::Absent => totals.absent += 1,
                AttendanceStatus::HalfDay => totals.half_day += 1,
                // Other markers contribute to no counter.
                _ => {}
            }
        }
        totals
    }
}

/// Working days of approved leave overlapping the month: each span is
/// clamped to the month bounds, weekends excluded, then summed across
/// applications. Leave is not reconciled against attendance records of the
/// same dates.
pub fn approved_leave_working_days(
    leaves: &[LeaveApplication],
    year: i32,
    month: u32,
) -> u32 {
    let Some((month_start, month_end)) = calendar::month_bounds(year, month) else {
        return 0;
    };
    leaves
        .iter()
        .filter(|leave| leave.status == LeaveStatus::Approved)
        .filter_map(|leave| {
            calendar::clamp_to_month(leave.start_date, leave.end_date, month_start, month_end)
        })
        .map(|(start, end)| calendar::count_working_days_in_range(start, end))
        .sum()
}

/// Sum of all bonus rows for the period, 2dp.
pub fn bonus_total(bonuses: &[Bonus]) -> Decimal {
    round2(bonuses.iter().map(|b| b.amount).sum())
}
